//! Ordered collections of signal slots.
//!
//! A [`SignalBus`] is the fixed-length, positionally-indexed set of a
//! component's current inputs or outputs. Slot order is load-bearing:
//! node code addresses inputs and outputs by index, and the index order is
//! the declared order from the node's
//! [`SlotSpec`](crate::processor::SlotSpec) lists.
//!
//! Buses are sized once at component construction and only ever resized by
//! a global buffer-count change. Values are cleared at the start of each
//! tick cycle and repopulated during processing.

use crate::signal::{Signal, SignalPayload, SignalValue};

/// An ordered, fixed-length collection of [`Signal`] slots.
#[derive(Clone, Debug, Default)]
pub struct SignalBus {
    signals: Vec<Signal>,
}

impl SignalBus {
    /// Creates an empty bus with zero slots.
    pub const fn new() -> Self {
        Self {
            signals: Vec::new(),
        }
    }

    /// Creates a bus with `count` empty slots.
    pub fn with_count(count: usize) -> Self {
        Self {
            signals: vec![Signal::new(); count],
        }
    }

    /// Resizes the bus to exactly `count` empty-or-existing slots.
    ///
    /// Growing appends empty slots; shrinking drops (and invalidates) every
    /// index at `count` and beyond.
    pub fn set_signal_count(&mut self, count: usize) {
        self.signals.resize_with(count, Signal::new);
    }

    /// Returns the number of slots.
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// Returns `true` if slot `index` exists and holds a value.
    pub fn has_value(&self, index: usize) -> bool {
        self.signals.get(index).is_some_and(Signal::has_value)
    }

    /// Borrows the payload at `index` if present and of `T`'s kind.
    ///
    /// Out-of-range index, empty slot, and kind mismatch all yield `None`.
    pub fn value<T: SignalPayload>(&self, index: usize) -> Option<&T> {
        self.signals.get(index).and_then(Signal::value_as::<T>)
    }

    /// Borrows the raw [`SignalValue`] at `index`, if any.
    pub fn value_raw(&self, index: usize) -> Option<&SignalValue> {
        self.signals.get(index).and_then(Signal::value)
    }

    /// Stores a value at `index` by copy-in.
    ///
    /// Returns `false` (storing nothing) if `index` is out of range.
    pub fn set_value(&mut self, index: usize, value: impl Into<SignalValue>) -> bool {
        match self.signals.get_mut(index) {
            Some(slot) => {
                slot.set(value.into());
                true
            }
            None => false,
        }
    }

    /// Takes the value out of slot `index`, leaving it empty.
    pub fn take_value(&mut self, index: usize) -> Option<SignalValue> {
        self.signals.get_mut(index).and_then(Signal::take)
    }

    /// Moves the value out of `from` into slot `to`, leaving `from` empty.
    ///
    /// No-op if `to` is out of range.
    pub fn move_signal(&mut self, to: usize, from: &mut Signal) {
        if let Some(slot) = self.signals.get_mut(to) {
            from.take_into(slot);
        }
    }

    /// Copies the value of `from` into slot `to`, keeping `from` intact.
    ///
    /// No-op if `to` is out of range.
    pub fn copy_signal(&mut self, to: usize, from: &Signal) {
        if let Some(slot) = self.signals.get_mut(to) {
            from.clone_into_signal(slot);
        }
    }

    /// Empties every slot without resizing. Called once per tick cycle.
    pub fn clear_all_values(&mut self) {
        for signal in &mut self.signals {
            signal.clear();
        }
    }

    /// Borrows the slot at `index`.
    pub fn signal(&self, index: usize) -> Option<&Signal> {
        self.signals.get(index)
    }

    /// Mutably borrows the slot at `index`.
    pub fn signal_mut(&mut self, index: usize) -> Option<&mut Signal> {
        self.signals.get_mut(index)
    }
}
