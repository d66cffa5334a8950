//! Plain-text edge list output.
//!
//! The format is the vertex count, the edge count, and then one
//! `"<from> <to>"` line per edge. Edges are enumerated in ascending internal
//! order and printed through a [`LabelMapping`].

use std::io::{self, Write};

use crate::{graph::AdjacencyMatrix, labels::LabelMapping};

/// Writes `graph` to `writer`, printing vertices through `labels`.
///
/// # Errors
/// Returns [`io::Error`] if writing fails, or an
/// [`io::ErrorKind::InvalidInput`] error when `labels` does not cover every
/// vertex of `graph`.
///
/// # Examples
/// ```
/// use digraphgen_core::{AdjacencyMatrix, LabelMapping, write_edge_list};
///
/// let mut graph = AdjacencyMatrix::new(3);
/// graph.add_edge(0, 1);
/// graph.add_edge(1, 2);
/// let mut buffer = Vec::new();
/// write_edge_list(&graph, &LabelMapping::identity(3), &mut buffer)?;
/// assert_eq!(String::from_utf8_lossy(&buffer), "3\n2\n0 1\n1 2\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_edge_list(
    graph: &AdjacencyMatrix,
    labels: &LabelMapping,
    mut writer: impl Write,
) -> io::Result<()> {
    if labels.len() != graph.vertex_count() as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "label mapping covers {} vertices but the graph has {}",
                labels.len(),
                graph.vertex_count()
            ),
        ));
    }

    writeln!(writer, "{}", graph.vertex_count())?;
    writeln!(writer, "{}", graph.edge_count())?;
    for (from, to) in graph.edges() {
        let (Some(from_label), Some(to_label)) = (labels.label(from), labels.label(to)) else {
            continue;
        };
        writeln!(writer, "{from_label} {to_label}")?;
    }
    Ok(())
}
