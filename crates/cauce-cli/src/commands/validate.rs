//! Graph validation command.

use std::path::PathBuf;

use clap::Args;

use cauce_config::{validate, GraphFile, NodeRegistry};

#[derive(Args)]
pub struct ValidateArgs {
    /// Graph file to validate
    #[arg(value_name = "GRAPH")]
    graph: PathBuf,
}

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let graph = GraphFile::load(&args.graph)?;
    let registry = NodeRegistry::with_builtins();
    validate(&graph, &registry)?;

    println!(
        "{}: OK ({} nodes, {} wires, {} buffer slots)",
        args.graph.display(),
        graph.nodes.len(),
        graph.wires.len(),
        graph.buffer_count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_graph(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("graph.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn accepts_a_valid_graph() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_graph(
            &dir,
            r#"
            [[nodes]]
            name = "src"
            kind = "counter"

            [[nodes]]
            name = "sink"
            kind = "probe"

            [[wires]]
            from = "src"
            output = 0
            to = "sink"
            input = 0
            "#,
        );
        assert!(run(ValidateArgs { graph: path }).is_ok());
    }

    #[test]
    fn rejects_unknown_node_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_graph(
            &dir,
            r#"
            [[nodes]]
            name = "x"
            kind = "warp-drive"
            "#,
        );
        let err = run(ValidateArgs { graph: path }).unwrap_err();
        assert!(err.to_string().contains("warp-drive"));
    }

    #[test]
    fn rejects_missing_files() {
        let args = ValidateArgs {
            graph: PathBuf::from("/nonexistent/graph.toml"),
        };
        assert!(run(args).is_err());
    }
}
