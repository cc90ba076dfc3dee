//! Graph execution command.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{Args, ValueEnum};

use cauce_config::{instantiate, GraphFile, NodeRegistry};
use cauce_core::{AutoTick, Processor, TickMode};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Tick every node on one thread
    Series,
    /// One worker thread per node
    Parallel,
}

impl From<Mode> for TickMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Series => TickMode::Series,
            Mode::Parallel => TickMode::Parallel,
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Graph file to run
    #[arg(value_name = "GRAPH")]
    graph: PathBuf,

    /// Number of ticks to run; 0 or omitted free-runs until Ctrl+C
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Tick mode
    #[arg(long, value_enum, default_value = "parallel")]
    mode: Mode,

    /// Override the graph file's buffer slot count
    #[arg(long)]
    buffers: Option<usize>,

    /// Throttle free-running to this many ticks per second
    #[arg(long)]
    rate: Option<u64>,

    /// Print every node's state after the run (probes always print)
    #[arg(long)]
    state: bool,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let graph = GraphFile::load(&args.graph)?;
    let mut registry = NodeRegistry::with_builtins();
    let live = instantiate(&graph, &mut registry)?;
    let mode = TickMode::from(args.mode);

    tracing::info!(
        "running '{}': {} nodes, {} wires, {} buffer slots",
        args.graph.display(),
        graph.nodes.len(),
        graph.wires.len(),
        args.buffers.unwrap_or(graph.buffer_count)
    );

    // Keep name→processor access for the state dump after ticking.
    let processors: Vec<(String, String, Arc<dyn Processor>)> = graph
        .nodes
        .iter()
        .filter_map(|n| {
            live.processor(&n.name)
                .map(|p| (n.name.clone(), n.kind.clone(), Arc::clone(p)))
        })
        .collect();
    let mut circuit = live.circuit;
    if let Some(buffers) = args.buffers {
        circuit.set_buffer_count(buffers);
    }

    match args.ticks {
        Some(ticks) if ticks > 0 => {
            for _ in 0..ticks {
                circuit.tick(mode);
                throttle(args.rate);
            }
            circuit.sync();
            println!("Ran {ticks} ticks.");
        }
        _ => {
            println!("Free-running; press Ctrl+C to stop...");
            let running = Arc::new(AtomicBool::new(true));
            let r = Arc::clone(&running);
            ctrlc::set_handler(move || {
                println!("\nStopping...");
                r.store(false, Ordering::SeqCst);
            })?;

            let circuit = Arc::new(Mutex::new(circuit));
            if let Some(rate) = args.rate {
                // Paced loop: one tick per interval on this thread.
                let interval = Duration::from_micros(1_000_000 / rate.max(1));
                while running.load(Ordering::SeqCst) {
                    circuit.lock().unwrap().tick(mode);
                    std::thread::sleep(interval);
                }
            } else {
                let mut auto = AutoTick::new(Arc::clone(&circuit), mode);
                auto.start();
                while running.load(Ordering::SeqCst) {
                    std::thread::sleep(Duration::from_millis(50));
                }
                auto.stop();
            }
            circuit.lock().unwrap().sync();
        }
    }

    print_states(args.state, &processors);
    Ok(())
}

fn throttle(rate: Option<u64>) {
    if let Some(rate) = rate {
        std::thread::sleep(Duration::from_micros(1_000_000 / rate.max(1)));
    }
}

/// Probe values always print; `--state` extends the dump to every node.
fn print_states(all: bool, processors: &[(String, String, Arc<dyn Processor>)]) {
    let shown: Vec<_> = processors
        .iter()
        .filter(|(_, kind, _)| all || kind == "probe")
        .collect();
    if shown.is_empty() {
        return;
    }
    println!();
    println!("Node state:");
    for (name, _, processor) in shown {
        let blob = processor.save_state();
        let text = if blob.is_empty() { "(stateless)" } else { &blob };
        println!("  {name}: {text}");
    }
}
