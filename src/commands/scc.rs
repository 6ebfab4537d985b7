use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use digraph_scc::config::Config;
use digraph_scc::graph::{Digraph, Vertex};
use digraph_scc::scc::SccPartition;
use digraph_scc::script::ScriptRunner;

#[derive(Serialize)]
struct SccJsonOutput<'a> {
    graph: &'a Digraph,
    component_count: usize,
    partition: &'a SccPartition,
}

pub fn run(input: &Path, json: bool, config: Config) -> Result<()> {
    let header = super::read_header(input)?;
    let graph = ScriptRunner::new(config)
        .build_graph(&header)
        .with_context(|| format!("Invalid graph header in {}", input.display()))?;
    let partition = graph.scc();

    if json {
        let output = SccJsonOutput {
            graph: &graph,
            component_count: partition.len(),
            partition,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Components: {}", partition.len());
    for (i, members) in partition.components().iter().enumerate() {
        let marker = if partition.is_cyclic(i) { " (cyclic)" } else { "" };
        println!("  {}{}", format_members(members), marker);
    }
    Ok(())
}

fn format_members(members: &[Vertex]) -> String {
    let mut sorted = members.to_vec();
    sorted.sort_unstable();
    let joined: Vec<String> = sorted.iter().map(ToString::to_string).collect();
    format!("{{{}}}", joined.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_members_sorted() {
        assert_eq!(format_members(&[3, 1, 2]), "{1 2 3}");
        assert_eq!(format_members(&[4]), "{4}");
    }
}
