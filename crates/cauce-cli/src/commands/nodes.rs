//! Node type listing command.

use clap::Args;

use cauce_config::NodeRegistry;

#[derive(Args)]
pub struct NodesArgs {
    /// Show details for a specific node type
    #[arg(value_name = "TYPE")]
    kind: Option<String>,
}

pub fn run(args: NodesArgs) -> anyhow::Result<()> {
    let mut registry = NodeRegistry::with_builtins();

    if let Some(kind) = &args.kind {
        let descriptor = registry
            .descriptor(kind)
            .ok_or_else(|| anyhow::anyhow!("Unknown node type: {}", kind))?
            .clone();

        println!("{}", descriptor.name);
        println!("{}", "=".repeat(descriptor.name.len()));
        println!();
        println!("{}", descriptor.description);
        println!("Category: {}", descriptor.category.name());
        println!();

        // Instantiate one to read its slot layout.
        let (processor, _) = registry
            .create(kind)
            .ok_or_else(|| anyhow::anyhow!("Unknown node type: {}", kind))?;
        println!("Inputs:");
        for (i, slot) in processor.inputs().iter().enumerate() {
            println!("  [{i}] {} {}", slot.name, kind_label(slot.kind));
        }
        println!("Outputs:");
        for (i, slot) in processor.outputs().iter().enumerate() {
            println!("  [{i}] {} {}", slot.name, kind_label(slot.kind));
        }
        return Ok(());
    }

    println!("{:14}  {:10}  {}", "Type", "Category", "Description");
    println!("{:14}  {:10}  {}", "----", "--------", "-----------");
    for descriptor in registry.all_nodes() {
        println!(
            "{:14}  {:10}  {}",
            descriptor.id,
            descriptor.category.name(),
            descriptor.description
        );
    }
    Ok(())
}

fn kind_label(kind: Option<cauce_core::SignalKind>) -> String {
    match kind {
        Some(kind) => format!("({kind:?})"),
        None => "(any)".to_string(),
    }
}
