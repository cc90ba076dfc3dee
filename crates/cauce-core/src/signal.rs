//! Typed, type-erased signal values.
//!
//! A [`Signal`] is a single value slot on a wire. The value itself is a
//! [`SignalValue`] — a closed tagged union over the fixed set of kinds the
//! engine transports. The kind set is deliberately small and closed: a
//! tagged enum gives exhaustive matching and cheap kind checks, where
//! open-ended type erasure (`dyn Any`) would give neither.
//!
//! Reading a slot with the wrong kind yields `None`. It never panics and
//! never converts implicitly; a node that finds `None` on an input treats
//! it as "input not ready this tick".

use serde::{Deserialize, Serialize};

/// The kind tag of a [`SignalValue`].
///
/// Slot declarations ([`SlotSpec`](crate::processor::SlotSpec)) and runtime
/// values share this tag set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Boolean flag.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit float.
    Float,
    /// UTF-8 string.
    Str,
    /// Structured JSON-like data.
    Json,
    /// Opaque image buffer.
    Image,
    /// Homogeneous array of booleans.
    BoolArray,
    /// Homogeneous array of integers.
    IntArray,
    /// Homogeneous array of floats.
    FloatArray,
    /// Homogeneous array of strings.
    StrArray,
}

impl SignalKind {
    /// Returns a human-readable name for the kind.
    pub const fn name(&self) -> &'static str {
        match self {
            SignalKind::Bool => "bool",
            SignalKind::Int => "int",
            SignalKind::Float => "float",
            SignalKind::Str => "str",
            SignalKind::Json => "json",
            SignalKind::Image => "image",
            SignalKind::BoolArray => "bool[]",
            SignalKind::IntArray => "int[]",
            SignalKind::FloatArray => "float[]",
            SignalKind::StrArray => "str[]",
        }
    }
}

/// An opaque image buffer payload.
///
/// The engine moves these around without inspecting pixels; image-aware
/// nodes interpret `data` as `width × height × channels` bytes in row-major
/// order. Cloning is a deep copy — this is the payload the move-over-copy
/// hand-off exists for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channels per pixel (1 = gray, 3 = RGB, 4 = RGBA).
    pub channels: u8,
    /// Row-major pixel bytes, `width * height * channels` long.
    pub data: Vec<u8>,
}

impl ImageFrame {
    /// Creates a zero-filled frame of the given dimensions.
    pub fn new(width: u32, height: u32, channels: u8) -> Self {
        let len = width as usize * height as usize * channels as usize;
        Self {
            width,
            height,
            channels,
            data: vec![0; len],
        }
    }

    /// Wraps existing pixel data, or `None` if `data` has the wrong length.
    pub fn from_data(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            channels,
            data,
        })
    }
}

/// A type-erased signal value: exactly one value of exactly one kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SignalValue {
    /// Boolean flag.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// Structured JSON-like data.
    Json(serde_json::Value),
    /// Opaque image buffer.
    Image(ImageFrame),
    /// Homogeneous array of booleans.
    BoolArray(Vec<bool>),
    /// Homogeneous array of integers.
    IntArray(Vec<i64>),
    /// Homogeneous array of floats.
    FloatArray(Vec<f64>),
    /// Homogeneous array of strings.
    StrArray(Vec<String>),
}

impl SignalValue {
    /// Returns the kind tag of this value.
    pub const fn kind(&self) -> SignalKind {
        match self {
            SignalValue::Bool(_) => SignalKind::Bool,
            SignalValue::Int(_) => SignalKind::Int,
            SignalValue::Float(_) => SignalKind::Float,
            SignalValue::Str(_) => SignalKind::Str,
            SignalValue::Json(_) => SignalKind::Json,
            SignalValue::Image(_) => SignalKind::Image,
            SignalValue::BoolArray(_) => SignalKind::BoolArray,
            SignalValue::IntArray(_) => SignalKind::IntArray,
            SignalValue::FloatArray(_) => SignalKind::FloatArray,
            SignalValue::StrArray(_) => SignalKind::StrArray,
        }
    }
}

/// Rust types that map onto one [`SignalKind`].
///
/// Implemented for the closed set of payload types; gives
/// [`SignalBus::value`](crate::bus::SignalBus::value) its typed access
/// without any dynamic typing.
pub trait SignalPayload: Sized {
    /// The kind this payload type maps to.
    const KIND: SignalKind;

    /// Borrows the payload out of a value of the matching kind.
    fn from_value(value: &SignalValue) -> Option<&Self>;

    /// Wraps the payload into a [`SignalValue`].
    fn into_value(self) -> SignalValue;
}

macro_rules! impl_signal_payload {
    ($ty:ty, $kind:ident, $variant:ident) => {
        impl SignalPayload for $ty {
            const KIND: SignalKind = SignalKind::$kind;

            fn from_value(value: &SignalValue) -> Option<&Self> {
                match value {
                    SignalValue::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn into_value(self) -> SignalValue {
                SignalValue::$variant(self)
            }
        }

        impl From<$ty> for SignalValue {
            fn from(v: $ty) -> Self {
                SignalValue::$variant(v)
            }
        }
    };
}

impl_signal_payload!(bool, Bool, Bool);
impl_signal_payload!(i64, Int, Int);
impl_signal_payload!(f64, Float, Float);
impl_signal_payload!(String, Str, Str);
impl_signal_payload!(serde_json::Value, Json, Json);
impl_signal_payload!(ImageFrame, Image, Image);
impl_signal_payload!(Vec<bool>, BoolArray, BoolArray);
impl_signal_payload!(Vec<i64>, IntArray, IntArray);
impl_signal_payload!(Vec<f64>, FloatArray, FloatArray);
impl_signal_payload!(Vec<String>, StrArray, StrArray);

impl From<&str> for SignalValue {
    fn from(v: &str) -> Self {
        SignalValue::Str(v.to_string())
    }
}

/// A single value slot: empty, or holding one [`SignalValue`].
///
/// Signals are owned exclusively by the bus slot containing them. Transfer
/// between slots is explicit: [`take_into`](Self::take_into) moves (source
/// becomes empty), [`clone_into_signal`](Self::clone_into_signal) copies
/// (source keeps its value). The component hand-off picks between the two based on how
/// many downstream consumers still need the value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Signal {
    value: Option<SignalValue>,
}

impl Signal {
    /// Creates an empty signal.
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Returns `true` if the slot holds a value.
    pub const fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the kind of the held value, or `None` if empty.
    pub fn kind(&self) -> Option<SignalKind> {
        self.value.as_ref().map(SignalValue::kind)
    }

    /// Stores a value, replacing any previous one.
    pub fn set(&mut self, value: SignalValue) {
        self.value = Some(value);
    }

    /// Empties the slot.
    pub fn clear(&mut self) {
        self.value = None;
    }

    /// Borrows the raw value, if any.
    pub fn value(&self) -> Option<&SignalValue> {
        self.value.as_ref()
    }

    /// Borrows the payload if the slot holds a value of `T`'s kind.
    ///
    /// Wrong kind or empty slot both yield `None`.
    pub fn value_as<T: SignalPayload>(&self) -> Option<&T> {
        self.value.as_ref().and_then(T::from_value)
    }

    /// Takes the value out, leaving the slot empty.
    pub fn take(&mut self) -> Option<SignalValue> {
        self.value.take()
    }

    /// Moves this signal's value into `dest`. This slot ends up empty;
    /// `dest` ends up with whatever this slot held (possibly nothing).
    pub fn take_into(&mut self, dest: &mut Signal) {
        dest.value = self.value.take();
    }

    /// Copies this signal's value into `dest`, keeping the original.
    pub fn clone_into_signal(&self, dest: &mut Signal) {
        dest.value.clone_from(&self.value);
    }
}
