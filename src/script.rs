//! Line-oriented command scripts over a [`Digraph`].
//!
//! A script's first line is a graph header, `<order>` followed by
//! `, <u> <v>` groups. Each following line is one [`Command`]. The runner
//! writes a transcript: the canonical command echo and its answer, or the
//! raw line and the error marker when the line is rejected.
//!
//! Input:
//!
//! ```text
//! 4, 1 2, 2 3, 3 1, 3 4
//! GetCountSCC
//! AddEdge 4 9
//! ```
//!
//! Transcript:
//!
//! ```text
//! GetCountSCC
//! 2
//! AddEdge 4 9
//! ERROR
//! ```

use log::{debug, info, warn};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

use crate::config::{Config, OutputConfig};
use crate::graph::{AddEdge, DeleteEdge, Digraph, GraphError, Vertex};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("empty graph header")]
    EmptyHeader,
    #[error("invalid vertex count: {0:?}")]
    InvalidVertexCount(String),
    #[error("vertex count {order} exceeds the limit of {max}")]
    TooManyVertices { order: usize, max: usize },
    #[error("malformed edge: {0:?}")]
    MalformedEdge(String),
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
    #[error("{command} expects {expected} argument(s), got {got}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("not a vertex number: {0:?}")]
    BadNumber(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Header
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a graph from a header line such as `4, 1 2, 2 3`.
///
/// Empty groups (a trailing comma) are ignored. Repeated edges are inserted
/// once. An order of zero or above `max_vertices` is rejected before any
/// vertex storage is allocated.
pub fn parse_header(line: &str, max_vertices: usize) -> Result<Digraph, ScriptError> {
    let mut groups = line.split(',');
    let order_text = groups.next().map(str::trim).unwrap_or_default();
    if order_text.is_empty() {
        return Err(ScriptError::EmptyHeader);
    }
    let order: usize = order_text
        .parse()
        .map_err(|_| ScriptError::InvalidVertexCount(order_text.to_string()))?;
    if order == 0 {
        return Err(ScriptError::InvalidVertexCount(order_text.to_string()));
    }
    if order > max_vertices {
        return Err(ScriptError::TooManyVertices {
            order,
            max: max_vertices,
        });
    }

    let mut graph = Digraph::try_new(order)?;
    for group in groups {
        let group = group.trim();
        if group.is_empty() {
            continue;
        }
        let (u, v) = match group.split_whitespace().collect::<Vec<_>>()[..] {
            [u, v] => (parse_vertex(u), parse_vertex(v)),
            _ => return Err(ScriptError::MalformedEdge(group.to_string())),
        };
        match (u, v) {
            (Ok(u), Ok(v)) => graph.add_edge(u, v)?,
            _ => return Err(ScriptError::MalformedEdge(group.to_string())),
        };
    }
    Ok(graph)
}

fn parse_vertex(token: &str) -> Result<Vertex, ScriptError> {
    token
        .parse()
        .map_err(|_| ScriptError::BadNumber(token.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// One script command with its vertex arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PrintDigraph,
    GetOrder,
    GetSize,
    GetOutDegree(Vertex),
    AddEdge(Vertex, Vertex),
    DeleteEdge(Vertex, Vertex),
    GetCountScc,
    GetNumSccVertices(Vertex),
    InSameScc(Vertex, Vertex),
}

impl Command {
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::PrintDigraph => "PrintDigraph",
            Command::GetOrder => "GetOrder",
            Command::GetSize => "GetSize",
            Command::GetOutDegree(_) => "GetOutDegree",
            Command::AddEdge(..) => "AddEdge",
            Command::DeleteEdge(..) => "DeleteEdge",
            Command::GetCountScc => "GetCountSCC",
            Command::GetNumSccVertices(_) => "GetNumSCCVertices",
            Command::InSameScc(..) => "InSameSCC",
        }
    }

    /// Runs the command and returns its answer text.
    ///
    /// Vertex range errors come back from the graph unchanged; the graph is
    /// not modified when they occur.
    pub fn execute(
        &self,
        graph: &mut Digraph,
        output: &OutputConfig,
    ) -> Result<String, GraphError> {
        let answer = match *self {
            Command::PrintDigraph => graph.to_string(),
            Command::GetOrder => graph.order().to_string(),
            Command::GetSize => graph.size().to_string(),
            Command::GetOutDegree(u) => graph.out_degree(u)?.to_string(),
            Command::AddEdge(u, v) => match graph.add_edge(u, v)? {
                AddEdge::Inserted => "0".to_string(),
                AddEdge::AlreadyExists => "1".to_string(),
            },
            Command::DeleteEdge(u, v) => match graph.delete_edge(u, v)? {
                DeleteEdge::Deleted => "0".to_string(),
                DeleteEdge::NotFound => "1".to_string(),
            },
            Command::GetCountScc => graph.count_scc().to_string(),
            Command::GetNumSccVertices(u) => graph.scc_size(u)?.to_string(),
            Command::InSameScc(u, v) => {
                if graph.same_scc(u, v)? {
                    output.same_marker.clone()
                } else {
                    output.different_marker.clone()
                }
            }
        };
        Ok(answer)
    }
}

impl FromStr for Command {
    type Err = ScriptError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or_default();
        let args = tokens.map(parse_vertex).collect::<Result<Vec<_>, _>>();

        let arity = |command: &'static str, expected: usize| -> Result<Vec<Vertex>, ScriptError> {
            let args = args.clone()?;
            if args.len() != expected {
                return Err(ScriptError::WrongArity {
                    command,
                    expected,
                    got: args.len(),
                });
            }
            Ok(args)
        };

        let command = match keyword {
            "PrintDigraph" => {
                arity("PrintDigraph", 0)?;
                Command::PrintDigraph
            }
            "GetOrder" => {
                arity("GetOrder", 0)?;
                Command::GetOrder
            }
            "GetSize" => {
                arity("GetSize", 0)?;
                Command::GetSize
            }
            "GetOutDegree" => Command::GetOutDegree(arity("GetOutDegree", 1)?[0]),
            "AddEdge" => {
                let a = arity("AddEdge", 2)?;
                Command::AddEdge(a[0], a[1])
            }
            "DeleteEdge" => {
                let a = arity("DeleteEdge", 2)?;
                Command::DeleteEdge(a[0], a[1])
            }
            "GetCountSCC" => {
                arity("GetCountSCC", 0)?;
                Command::GetCountScc
            }
            "GetNumSCCVertices" => Command::GetNumSccVertices(arity("GetNumSCCVertices", 1)?[0]),
            "InSameSCC" => {
                let a = arity("InSameSCC", 2)?;
                Command::InSameScc(a[0], a[1])
            }
            other => return Err(ScriptError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())?;
        match *self {
            Command::GetOutDegree(u) | Command::GetNumSccVertices(u) => write!(f, " {}", u),
            Command::AddEdge(u, v) | Command::DeleteEdge(u, v) | Command::InSameScc(u, v) => {
                write!(f, " {} {}", u, v)
            }
            _ => Ok(()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Runner
// ─────────────────────────────────────────────────────────────────────────────

/// Counts of what a script run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands that produced an answer
    pub executed: usize,
    /// Lines answered with the error marker, header included
    pub rejected: usize,
    /// The graph after the last command, or `None` if the header was missing
    /// or rejected
    pub graph: Option<Digraph>,
}

pub struct ScriptRunner {
    config: Config,
}

impl ScriptRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parses a header line, applying the configured vertex limit.
    pub fn build_graph(&self, header: &str) -> Result<Digraph, ScriptError> {
        parse_header(header, self.config.limits.max_vertices)
    }

    /// Runs a whole script from `input`, writing the transcript to `out`.
    ///
    /// Only I/O failures are returned as errors. A rejected header stops the
    /// run after its error marker; a rejected command does not.
    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> io::Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut lines = input.lines();

        let Some(header) = lines.next().transpose()? else {
            warn!("script is empty, no graph header");
            return Ok(summary);
        };
        let header = header.trim_end_matches('\r');
        let mut graph = match self.build_graph(header) {
            Ok(graph) => graph,
            Err(e) => {
                warn!("rejecting graph header {:?}: {}", header, e);
                self.reject(out, header)?;
                summary.rejected += 1;
                return Ok(summary);
            }
        };
        info!(
            "built graph with {} vertices and {} edges",
            graph.order(),
            graph.size()
        );

        for line in lines {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let result = line.parse::<Command>().and_then(|command| {
                let answer = command.execute(&mut graph, &self.config.output)?;
                Ok((command, answer))
            });
            match result {
                Ok((command, answer)) => {
                    writeln!(out, "{}", command)?;
                    writeln!(out, "{}", answer)?;
                    summary.executed += 1;
                }
                Err(e) => {
                    debug!("rejecting {:?}: {}", line, e);
                    self.reject(out, line)?;
                    summary.rejected += 1;
                }
            }
        }

        summary.graph = Some(graph);
        Ok(summary)
    }

    fn reject<W: Write>(&self, out: &mut W, line: &str) -> io::Result<()> {
        writeln!(out, "{}", line)?;
        writeln!(out, "{}", self.config.output.error_marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(script: &str) -> (String, RunSummary) {
        let runner = ScriptRunner::new(Config::default());
        let mut out = Vec::new();
        let summary = runner.run(script.as_bytes(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_parse_header_with_edges() {
        let g = parse_header("4, 1 2, 2 3, 3 1, 3 4", 100).unwrap();
        assert_eq!(g.order(), 4);
        assert_eq!(g.size(), 4);
    }

    #[test]
    fn test_parse_header_order_only() {
        let g = parse_header("7", 100).unwrap();
        assert_eq!(g.order(), 7);
        assert_eq!(g.size(), 0);
    }

    #[test]
    fn test_parse_header_tolerates_spacing_and_trailing_comma() {
        let g = parse_header("  3 ,1  2,  2 3 ,", 100).unwrap();
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(1, 2), (2, 3)]);
    }

    #[test]
    fn test_parse_header_rejections() {
        assert_eq!(parse_header("", 100), Err(ScriptError::EmptyHeader));
        assert_eq!(
            parse_header("0", 100),
            Err(ScriptError::InvalidVertexCount("0".to_string()))
        );
        assert_eq!(
            parse_header("x, 1 2", 100),
            Err(ScriptError::InvalidVertexCount("x".to_string()))
        );
        assert_eq!(
            parse_header("3, 1", 100),
            Err(ScriptError::MalformedEdge("1".to_string()))
        );
        assert_eq!(
            parse_header("3, 1 2 3", 100),
            Err(ScriptError::MalformedEdge("1 2 3".to_string()))
        );
        assert_eq!(
            parse_header("3, 1 4", 100),
            Err(ScriptError::Graph(GraphError::InvalidVertex { vertex: 4, order: 3 }))
        );
        assert_eq!(
            parse_header("3, 0 1", 100),
            Err(ScriptError::Graph(GraphError::InvalidVertex { vertex: 0, order: 3 }))
        );
    }

    #[test]
    fn test_parse_header_checks_limit_before_allocating() {
        assert_eq!(
            parse_header("101", 100),
            Err(ScriptError::TooManyVertices { order: 101, max: 100 })
        );
        assert_eq!(
            parse_header("18446744073709551615", usize::MAX),
            Err(ScriptError::Graph(GraphError::CapacityExceeded {
                order: usize::MAX
            }))
        );
    }

    #[test]
    fn test_command_parse_and_echo() {
        for line in [
            "PrintDigraph",
            "GetOrder",
            "GetSize",
            "GetOutDegree 3",
            "AddEdge 1 2",
            "DeleteEdge 2 1",
            "GetCountSCC",
            "GetNumSCCVertices 4",
            "InSameSCC 1 3",
        ] {
            let command: Command = line.parse().unwrap();
            assert_eq!(command.to_string(), line);
        }
    }

    #[test]
    fn test_command_parse_rejections() {
        assert_eq!(
            "Frobnicate".parse::<Command>(),
            Err(ScriptError::UnknownCommand("Frobnicate".to_string()))
        );
        assert_eq!(
            "GetOrder 1".parse::<Command>(),
            Err(ScriptError::WrongArity {
                command: "GetOrder",
                expected: 0,
                got: 1
            })
        );
        assert_eq!(
            "AddEdge 1".parse::<Command>(),
            Err(ScriptError::WrongArity {
                command: "AddEdge",
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            "AddEdge 1 -2".parse::<Command>(),
            Err(ScriptError::BadNumber("-2".to_string()))
        );
        // Keywords match exactly.
        assert!("getorder".parse::<Command>().is_err());
        assert!("GetOrderX".parse::<Command>().is_err());
    }

    #[test]
    fn test_execute_reports_invalid_vertex() {
        let mut g = Digraph::new(2);
        let output = OutputConfig::default();
        assert_eq!(
            Command::AddEdge(1, 3).execute(&mut g, &output),
            Err(GraphError::InvalidVertex { vertex: 3, order: 2 })
        );
        assert_eq!(g.size(), 0);
    }

    #[test]
    fn test_run_transcript() {
        let (out, summary) = run_script(
            "4, 1 2, 2 3, 3 1, 3 4\n\
             GetCountSCC\n\
             GetNumSCCVertices 1\n\
             InSameSCC 1 3\n\
             InSameSCC 1 4\n\
             AddEdge 4 1\n\
             AddEdge 4 1\n\
             GetCountSCC\n\
             DeleteEdge 4 1\n\
             DeleteEdge 4 1\n\
             PrintDigraph\n",
        );
        insta::assert_snapshot!(out.trim_end(), @r"
        GetCountSCC
        2
        GetNumSCCVertices 1
        3
        InSameSCC 1 3
        YES
        InSameSCC 1 4
        NO
        AddEdge 4 1
        0
        AddEdge 4 1
        1
        GetCountSCC
        1
        DeleteEdge 4 1
        0
        DeleteEdge 4 1
        1
        PrintDigraph
        4, 1 2, 2 3, 3 1, 3 4
        ");
        assert_eq!(summary.executed, 10);
        assert_eq!(summary.rejected, 0);
        assert_eq!(summary.graph.map(|g| g.size()), Some(4));
    }

    #[test]
    fn test_run_rejects_bad_lines_and_continues() {
        let (out, summary) = run_script(
            "3, 1 2\n\
             \n\
             GetOutDegree 9\n\
             Bogus\n\
             GetSize 1\n\
             GetSize\n",
        );
        assert_eq!(
            out,
            "GetOutDegree 9\nERROR\nBogus\nERROR\nGetSize 1\nERROR\nGetSize\n1\n"
        );
        assert_eq!(summary.executed, 1);
        assert_eq!(summary.rejected, 3);
    }

    #[test]
    fn test_run_stops_on_bad_header() {
        let (out, summary) = run_script("3, 1 5\nGetOrder\n");
        assert_eq!(out, "3, 1 5\nERROR\n");
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.executed, 0);
        assert!(summary.graph.is_none());
    }

    #[test]
    fn test_run_rejects_oversized_header() {
        for header in ["18446744073709551615", "100000000000, 1 2"] {
            let (out, summary) = run_script(&format!("{}\nGetOrder\n", header));
            assert_eq!(out, format!("{}\nERROR\n", header));
            assert_eq!(summary.rejected, 1);
            assert!(summary.graph.is_none());
        }

        let mut config = Config::default();
        config.limits.max_vertices = usize::MAX;
        let mut out = Vec::new();
        ScriptRunner::new(config)
            .run("18446744073709551615\nGetOrder\n".as_bytes(), &mut out)
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "18446744073709551615\nERROR\n"
        );
    }

    #[test]
    fn test_run_empty_input() {
        let (out, summary) = run_script("");
        assert!(out.is_empty());
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn test_run_handles_crlf() {
        let (out, _) = run_script("2, 1 2\r\nGetSize\r\n");
        assert_eq!(out, "GetSize\n1\n");
    }

    #[test]
    fn test_custom_markers_and_limit() {
        let mut config = Config::default();
        config.output.error_marker = "ERR".to_string();
        config.output.same_marker = "same".to_string();
        config.limits.max_vertices = 3;
        let runner = ScriptRunner::new(config);

        let mut out = Vec::new();
        runner
            .run("2, 1 2, 2 1\nInSameSCC 1 2\nAddEdge 0 1\n".as_bytes(), &mut out)
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "InSameSCC 1 2\nsame\nAddEdge 0 1\nERR\n"
        );

        assert_eq!(
            runner.build_graph("4"),
            Err(ScriptError::TooManyVertices { order: 4, max: 3 })
        );
    }
}
