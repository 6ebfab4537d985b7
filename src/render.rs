//! Text rendering of a [`Digraph`].
//!
//! The format mirrors the header line the script driver reads:
//! `<order>` followed by `, <u> <v>` per edge, ascending by `(u, v)`.

use std::fmt;
use std::io::{self, Write};

use crate::graph::Digraph;

impl fmt::Display for Digraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.order())?;
        for (u, v) in self.edges() {
            write!(f, ", {} {}", u, v)?;
        }
        Ok(())
    }
}

/// Renders `graph` as a single newline-terminated line.
pub fn render_digraph(graph: &Digraph) -> String {
    format!("{}\n", graph)
}

/// Writes the rendering of `graph` to `out`.
pub fn write_digraph<W: Write>(out: &mut W, graph: &Digraph) -> io::Result<()> {
    writeln!(out, "{}", graph)
}
