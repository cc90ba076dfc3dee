//! Property-based tests for the cauce-core circuit.
//!
//! Tests reference-count consistency under randomized wiring churn,
//! fan-out delivery, and series/parallel equivalence using proptest for
//! randomized input generation.

use proptest::prelude::*;
use std::sync::{Arc, Mutex};

use cauce_core::{
    Circuit, ComponentId, NodeCategory, Processor, ProcessorInfo, SignalBus, SignalKind,
    SignalValue, SlotSpec, TickMode,
};

/// Two-in, two-out pass-through node used as generic wiring fodder.
struct Junction;

impl Processor for Junction {
    fn info(&self) -> ProcessorInfo {
        ProcessorInfo {
            name: "Junction",
            category: NodeCategory::Utility,
            author: "tests",
            version: "1.0",
        }
    }

    fn inputs(&self) -> Vec<SlotSpec> {
        vec![SlotSpec::untyped("a"), SlotSpec::untyped("b")]
    }

    fn outputs(&self) -> Vec<SlotSpec> {
        vec![SlotSpec::untyped("a"), SlotSpec::untyped("b")]
    }

    fn process(&self, inputs: &mut SignalBus, outputs: &mut SignalBus) {
        for i in 0..2 {
            if let Some(v) = inputs.take_value(i) {
                outputs.set_value(i, v);
            }
        }
    }
}

struct Emit(i64);

impl Processor for Emit {
    fn info(&self) -> ProcessorInfo {
        ProcessorInfo {
            name: "Emit",
            category: NodeCategory::Source,
            author: "tests",
            version: "1.0",
        }
    }

    fn inputs(&self) -> Vec<SlotSpec> {
        vec![]
    }

    fn outputs(&self) -> Vec<SlotSpec> {
        vec![SlotSpec::new("out", SignalKind::Int)]
    }

    fn process(&self, _inputs: &mut SignalBus, outputs: &mut SignalBus) {
        outputs.set_value(0, self.0);
    }
}

struct Collect {
    seen: Mutex<Vec<i64>>,
}

impl Processor for Collect {
    fn info(&self) -> ProcessorInfo {
        ProcessorInfo {
            name: "Collect",
            category: NodeCategory::Sink,
            author: "tests",
            version: "1.0",
        }
    }

    fn inputs(&self) -> Vec<SlotSpec> {
        vec![SlotSpec::new("in", SignalKind::Int)]
    }

    fn outputs(&self) -> Vec<SlotSpec> {
        vec![]
    }

    fn process(&self, inputs: &mut SignalBus, _outputs: &mut SignalBus) {
        if let Some(&v) = inputs.value::<i64>(0) {
            self.seen.lock().unwrap().push(v);
        }
    }
}

struct AddOne;

impl Processor for AddOne {
    fn info(&self) -> ProcessorInfo {
        ProcessorInfo {
            name: "AddOne",
            category: NodeCategory::Transform,
            author: "tests",
            version: "1.0",
        }
    }

    fn inputs(&self) -> Vec<SlotSpec> {
        vec![SlotSpec::new("in", SignalKind::Int)]
    }

    fn outputs(&self) -> Vec<SlotSpec> {
        vec![SlotSpec::new("out", SignalKind::Int)]
    }

    fn process(&self, inputs: &mut SignalBus, outputs: &mut SignalBus) {
        if let Some(&v) = inputs.value::<i64>(0) {
            outputs.set_value(0, v + 1);
        }
    }
}

/// Sums, over every node, the wires drawing from `(id, output)`.
fn wire_fan_out(circuit: &Circuit, id: ComponentId, output: usize) -> usize {
    circuit
        .node_ids()
        .iter()
        .filter_map(|&n| circuit.wires_of(n))
        .flatten()
        .filter(|w| w.from == id && w.from_output == output)
        .count()
}

#[derive(Clone, Debug)]
enum WiringOp {
    Connect {
        from: usize,
        from_output: usize,
        to: usize,
        to_input: usize,
    },
    DisconnectInput {
        to: usize,
        to_input: usize,
    },
    DisconnectAll {
        to: usize,
    },
}

fn wiring_op() -> impl Strategy<Value = WiringOp> {
    prop_oneof![
        (0usize..4, 0usize..2, 0usize..4, 0usize..2).prop_map(
            |(from, from_output, to, to_input)| WiringOp::Connect {
                from,
                from_output,
                to,
                to_input,
            }
        ),
        (0usize..4, 0usize..2).prop_map(|(to, to_input)| WiringOp::DisconnectInput {
            to,
            to_input
        }),
        (0usize..4).prop_map(|to| WiringOp::DisconnectAll { to }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// After any sequence of connect/disconnect operations, every output's
    /// reference count equals the number of wires actually drawing from it.
    #[test]
    fn fan_out_matches_wire_count(ops in prop::collection::vec(wiring_op(), 0..40)) {
        let mut circuit = Circuit::new();
        let nodes: Vec<ComponentId> =
            (0..4).map(|_| circuit.add_node(Arc::new(Junction))).collect();

        for op in ops {
            match op {
                WiringOp::Connect { from, from_output, to, to_input } => {
                    circuit
                        .connect(nodes[from], from_output, nodes[to], to_input)
                        .unwrap();
                }
                WiringOp::DisconnectInput { to, to_input } => {
                    // Missing wires are a legitimate outcome here.
                    let _ = circuit.disconnect_input(nodes[to], to_input);
                }
                WiringOp::DisconnectAll { to } => {
                    circuit.disconnect_all_inputs(nodes[to]).unwrap();
                }
            }
        }

        for &node in &nodes {
            for output in 0..2 {
                prop_assert_eq!(
                    circuit.fan_out(node, output),
                    Some(wire_fan_out(&circuit, node, output)),
                    "count drifted for {} output {}", node, output
                );
            }
        }

        // Ticking an arbitrarily rewired (possibly cyclic) graph completes.
        circuit.tick(TickMode::Series);
        circuit.tick(TickMode::Parallel);
    }

    /// Every consumer of a fanned-out output observes the value each
    /// cycle, whatever the fan-out.
    #[test]
    fn fan_out_delivers_to_all_consumers(consumers in 1usize..6, value in any::<i64>()) {
        let mut circuit = Circuit::new();
        let src = circuit.add_node(Arc::new(Emit(value)));
        let sinks: Vec<Arc<Collect>> = (0..consumers)
            .map(|_| Arc::new(Collect { seen: Mutex::new(Vec::new()) }))
            .collect();
        for sink in &sinks {
            let id = circuit.add_node(Arc::clone(sink) as Arc<dyn Processor>);
            circuit.connect(src, 0, id, 0).unwrap();
        }

        for _ in 0..3 {
            circuit.tick(TickMode::Parallel);
        }
        for sink in &sinks {
            prop_assert_eq!(&*sink.seen.lock().unwrap(), &vec![value; 3]);
        }
    }

    /// A linear chain produces identical results in series mode, parallel
    /// mode, and pipelined parallel mode.
    #[test]
    fn chain_is_mode_invariant(
        length in 1usize..6,
        seed in -1000i64..1000,
        buffers in 1usize..4,
    ) {
        let run = |mode: TickMode, buffers: usize| {
            let mut circuit = Circuit::new();
            let src = circuit.add_node(Arc::new(Emit(seed)));
            let mut prev = src;
            for _ in 0..length {
                let node = circuit.add_node(Arc::new(AddOne));
                circuit.connect(prev, 0, node, 0).unwrap();
                prev = node;
            }
            let sink = Arc::new(Collect { seen: Mutex::new(Vec::new()) });
            let id = circuit.add_node(Arc::clone(&sink) as Arc<dyn Processor>);
            circuit.connect(prev, 0, id, 0).unwrap();

            circuit.set_buffer_count(buffers);
            for _ in 0..5 {
                circuit.tick(mode);
            }
            circuit.sync();
            sink.seen.lock().unwrap().clone()
        };

        let expected = vec![seed + length as i64; 5];
        prop_assert_eq!(run(TickMode::Series, 1), expected.clone());
        prop_assert_eq!(run(TickMode::Parallel, 1), expected.clone());
        prop_assert_eq!(run(TickMode::Parallel, buffers), expected);
    }

    /// Signal values survive a serde round trip unchanged.
    #[test]
    fn signal_value_serde_round_trip(v in any::<i64>(), f in any::<f64>(), s in ".*") {
        for value in [
            SignalValue::Int(v),
            SignalValue::Float(f),
            SignalValue::Str(s.clone()),
            SignalValue::Bool(v % 2 == 0),
        ] {
            let json = serde_json::to_string(&value).unwrap();
            let back: SignalValue = serde_json::from_str(&json).unwrap();
            match (&value, &back) {
                (SignalValue::Float(a), SignalValue::Float(b)) => {
                    prop_assert!(a == b || (a.is_nan() && b.is_nan()));
                }
                _ => prop_assert_eq!(&value, &back),
            }
        }
    }
}
