pub mod adjacency;
pub mod config;
pub mod dfs;
pub mod graph;
pub mod interop;
pub mod render;
pub mod scc;
pub mod script;

pub use adjacency::AdjacencyList;
pub use config::Config;
pub use dfs::{Mark, Time, Traversal};
pub use graph::{AddEdge, DeleteEdge, Digraph, GraphError, Vertex};
pub use render::{render_digraph, write_digraph};
pub use scc::{SccPartition, kosaraju_scc};
pub use script::{Command, RunSummary, ScriptError, ScriptRunner, parse_header};
