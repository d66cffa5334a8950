//! Parsing and structural checks for serialized edge lists.
//!
//! Tests read generator output back through [`EdgeList::parse`], which
//! enforces the file format, and then assert graph properties with the
//! helper methods.

use std::collections::{BTreeSet, HashMap, HashSet};

use thiserror::Error;

/// Errors raised when serialized output does not match the edge list format.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EdgeListError {
    /// The vertex or edge count header line is missing.
    #[error("missing `{what}` header line")]
    MissingHeader {
        /// Which header was missing.
        what: &'static str,
    },
    /// A header or edge line held something other than decimal integers.
    #[error("line {line}: expected {expected}, found `{found}`")]
    Malformed {
        /// One-based line number.
        line: usize,
        /// Description of the expected content.
        expected: &'static str,
        /// Offending line content.
        found: String,
    },
    /// An edge endpoint is not a valid vertex label.
    #[error("line {line}: label {label} is outside 0..{vertex_count}")]
    LabelOutOfRange {
        /// One-based line number.
        line: usize,
        /// Offending label.
        label: u32,
        /// Declared vertex count.
        vertex_count: u32,
    },
    /// The number of edge lines differs from the declared edge count.
    #[error("declared {declared} edges but found {found} edge lines")]
    EdgeCountMismatch {
        /// Edge count from the header.
        declared: u32,
        /// Edge lines present.
        found: usize,
    },
}

/// A parsed edge list, edges kept in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeList {
    /// Declared vertex count.
    pub vertex_count: u32,
    /// Edges as `(from, to)` labels in file order.
    pub edges: Vec<(u32, u32)>,
}

impl EdgeList {
    /// Parses `text` and validates header counts and label ranges.
    ///
    /// # Errors
    /// Returns [`EdgeListError`] describing the first format violation.
    ///
    /// # Examples
    /// ```
    /// use digraphgen_test_support::edge_list::EdgeList;
    ///
    /// let list = EdgeList::parse("3\n1\n2 0\n")?;
    /// assert_eq!(list.edges, vec![(2, 0)]);
    /// # Ok::<(), digraphgen_test_support::edge_list::EdgeListError>(())
    /// ```
    pub fn parse(text: &str) -> Result<Self, EdgeListError> {
        let mut lines = text.lines().enumerate().map(|(index, line)| (index + 1, line));
        let vertex_count = parse_header(lines.next(), "vertex count")?;
        let declared = parse_header(lines.next(), "edge count")?;

        let edges = lines
            .map(|(line, content)| parse_edge(line, content, vertex_count))
            .collect::<Result<Vec<_>, _>>()?;

        if edges.len() != declared as usize {
            return Err(EdgeListError::EdgeCountMismatch {
                declared,
                found: edges.len(),
            });
        }
        Ok(Self {
            vertex_count,
            edges,
        })
    }

    /// Returns `true` if `from → to` is listed.
    #[must_use]
    pub fn contains(&self, from: u32, to: u32) -> bool {
        self.edges.contains(&(from, to))
    }

    /// Returns `true` if any edge starts and ends at the same vertex.
    #[must_use]
    pub fn has_self_loops(&self) -> bool {
        self.edges.iter().any(|(from, to)| from == to)
    }

    /// Returns `true` if any edge is listed more than once.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.edges.len());
        !self.edges.iter().all(|edge| seen.insert(*edge))
    }

    /// Returns `true` if every edge points to a higher label.
    #[must_use]
    pub fn is_forward_only(&self) -> bool {
        self.edges.iter().all(|(from, to)| from < to)
    }

    /// Edges as an ordered set.
    #[must_use]
    pub fn edge_set(&self) -> BTreeSet<(u32, u32)> {
        self.edges.iter().copied().collect()
    }

    /// Returns `true` if a single label bijection maps each edge of `other`
    /// onto the edge at the same position in `self`.
    ///
    /// # Examples
    /// ```
    /// use digraphgen_test_support::edge_list::EdgeList;
    ///
    /// let plain = EdgeList::parse("3\n2\n0 1\n1 2\n")?;
    /// let renamed = EdgeList::parse("3\n2\n2 0\n0 1\n")?;
    /// assert!(renamed.is_relabelling_of(&plain));
    /// # Ok::<(), digraphgen_test_support::edge_list::EdgeListError>(())
    /// ```
    #[must_use]
    pub fn is_relabelling_of(&self, other: &Self) -> bool {
        if self.vertex_count != other.vertex_count || self.edges.len() != other.edges.len() {
            return false;
        }
        let mut forward: HashMap<u32, u32> = HashMap::new();
        let mut backward: HashMap<u32, u32> = HashMap::new();
        let mut bind = |original: u32, renamed: u32| {
            *forward.entry(original).or_insert(renamed) == renamed
                && *backward.entry(renamed).or_insert(original) == original
        };
        other
            .edges
            .iter()
            .zip(&self.edges)
            .all(|(&(from, to), &(new_from, new_to))| bind(from, new_from) && bind(to, new_to))
    }
}

fn parse_header(line: Option<(usize, &str)>, what: &'static str) -> Result<u32, EdgeListError> {
    let (number, content) = line.ok_or(EdgeListError::MissingHeader { what })?;
    content.parse().map_err(|_| EdgeListError::Malformed {
        line: number,
        expected: what,
        found: content.to_owned(),
    })
}

fn parse_edge(line: usize, content: &str, vertex_count: u32) -> Result<(u32, u32), EdgeListError> {
    let malformed = || EdgeListError::Malformed {
        line,
        expected: "`<from> <to>`",
        found: content.to_owned(),
    };
    let (from, to) = content.split_once(' ').ok_or_else(malformed)?;
    let from: u32 = from.parse().map_err(|_| malformed())?;
    let to: u32 = to.parse().map_err(|_| malformed())?;
    for label in [from, to] {
        if label >= vertex_count {
            return Err(EdgeListError::LabelOutOfRange {
                line,
                label,
                vertex_count,
            });
        }
    }
    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::empty("", EdgeListError::MissingHeader { what: "vertex count" })]
    #[case::no_edge_count("4\n", EdgeListError::MissingHeader { what: "edge count" })]
    #[case::too_few_lines("4\n2\n0 1\n", EdgeListError::EdgeCountMismatch { declared: 2, found: 1 })]
    #[case::out_of_range("2\n1\n0 2\n", EdgeListError::LabelOutOfRange { line: 3, label: 2, vertex_count: 2 })]
    #[case::double_space("3\n1\n0  1\n", EdgeListError::Malformed { line: 3, expected: "`<from> <to>`", found: "0  1".to_owned() })]
    fn parse_rejects_format_violations(#[case] text: &str, #[case] expected: EdgeListError) {
        assert_eq!(EdgeList::parse(text), Err(expected));
    }

    #[test]
    fn structural_checks_report_violations() {
        let list = EdgeList::parse("3\n3\n0 1\n0 1\n2 2\n").expect("format is valid");
        assert!(list.has_duplicates());
        assert!(list.has_self_loops());
        assert!(!list.is_forward_only());
    }

    #[test]
    fn relabelling_must_be_consistent() {
        let plain = EdgeList::parse("3\n2\n0 1\n1 2\n").expect("format is valid");
        let inconsistent = EdgeList::parse("3\n2\n2 0\n1 2\n").expect("format is valid");
        assert!(!inconsistent.is_relabelling_of(&plain));
    }
}
