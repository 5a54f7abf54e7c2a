use crate::datastructures::BitSet;
use crate::graph::{BaseGraph, BitGraph};
use crate::tree_decomposition::TreeDecomposition;
use std::convert::TryFrom;
use std::io;
use std::io::{BufRead, ErrorKind, Write};

fn invalid_input(message: &str) -> io::Error {
    io::Error::new(ErrorKind::InvalidInput, message.to_string())
}

fn parse_pair(tokens: &[&str]) -> Option<(usize, usize)> {
    match tokens {
        [u, v] => Some((u.parse().ok()?, v.parse().ok()?)),
        _ => None,
    }
}

/// Parses a `p tw <n> <m>` header line.
pub fn pace_p(line: &str) -> Result<(usize, usize), io::Error> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["p", "tw", rest @ ..] => parse_pair(rest).ok_or_else(|| invalid_input("Invalid header")),
        _ => Err(invalid_input("Invalid header")),
    }
}

/// Parses a 1-based edge line `<u> <v>` into 0-based vertices.
pub fn pace_e(line: &str) -> Result<(usize, usize), io::Error> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match parse_pair(&tokens) {
        Some((u, v)) if u > 0 && v > 0 => Ok((u - 1, v - 1)),
        _ => Err(invalid_input("Invalid edge")),
    }
}

/// Graph input in the format of the PACE challenge.
pub struct PaceReader<T: BufRead>(pub T);

impl<T: BufRead> TryFrom<PaceReader<T>> for BitGraph {
    type Error = io::Error;

    fn try_from(reader: PaceReader<T>) -> Result<Self, Self::Error> {
        let reader = reader.0;

        let mut graph: Option<Vec<BitSet>> = None;
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            match line.chars().next() {
                None | Some('c') => {}
                Some('p') => {
                    if graph.is_some() {
                        return Err(invalid_input("Duplicate header"));
                    }
                    let (n, _) = pace_p(line)?;
                    graph = Some(vec![BitSet::new(n); n]);
                }
                _ => {
                    let graph = graph.as_mut().ok_or_else(|| invalid_input("Missing header"))?;
                    let (u, v) = pace_e(line)?;
                    if u >= graph.len() || v >= graph.len() {
                        return Err(invalid_input("Vertex out of range"));
                    }
                    if u != v {
                        graph[u].set_bit(v);
                        graph[v].set_bit(u);
                    }
                }
            };
        }

        graph
            .map(BitGraph::from)
            .ok_or_else(|| invalid_input("Missing header"))
    }
}

/// Writes a tree decomposition as a PACE `.td` file. Bags and vertices are 1-based.
pub struct PaceWriter<'a, 'b, G: BaseGraph, W: Write> {
    td: &'a TreeDecomposition,
    graph: &'b G,
    writer: W,
}

impl<'a, 'b, G: BaseGraph, W: Write> PaceWriter<'a, 'b, G, W> {
    pub fn new(td: &'a TreeDecomposition, graph: &'b G, writer: W) -> Self {
        Self { td, graph, writer }
    }

    pub fn output(mut self) -> io::Result<()> {
        writeln!(
            self.writer,
            "s td {} {} {}",
            self.td.bags.len(),
            self.td.max_bag_size,
            self.graph.order()
        )?;
        for bag in &self.td.bags {
            let mut vertices: Vec<usize> = bag.vertex_set.iter().map(|v| v + 1).collect();
            vertices.sort_unstable();
            let vertices: Vec<String> = vertices.iter().map(|v| v.to_string()).collect();
            if vertices.is_empty() {
                writeln!(self.writer, "b {}", bag.id + 1)?;
            } else {
                writeln!(self.writer, "b {} {}", bag.id + 1, vertices.join(" "))?;
            }
        }
        for bag in &self.td.bags {
            let mut neighbors: Vec<usize> = bag
                .neighbors
                .iter()
                .copied()
                .filter(|n| bag.id < *n)
                .collect();
            neighbors.sort_unstable();
            for n in neighbors {
                writeln!(self.writer, "{} {}", bag.id + 1, n + 1)?;
            }
        }
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{BaseGraph, BitGraph};
    use crate::io::{PaceReader, PaceWriter};
    use crate::tree_decomposition::TreeDecomposition;
    use std::convert::TryFrom;
    use std::io::{BufReader, ErrorKind};

    fn read(input: &str) -> std::io::Result<BitGraph> {
        BitGraph::try_from(PaceReader(BufReader::new(input.as_bytes())))
    }

    #[test]
    fn reads_graph_with_comments() {
        let graph = read("c a triangle\np tw 4 3\n1 2\nc in between\n2 3\n1 3\n").unwrap();
        assert_eq!(graph.order(), 4);
        assert!(graph.has_edge(0, 1));
        assert!(graph.has_edge(1, 2));
        assert!(graph.has_edge(0, 2));
        assert!(!graph.has_edge(0, 3));
        assert_eq!(graph.degree(3), 0);
    }

    #[test]
    fn rejects_malformed_input() {
        for input in &[
            "1 2\n",
            "p tw 3\n",
            "p td 3 1\n1 2\n",
            "p tw 3 1\n1 x\n",
            "p tw 3 1\n1 2 3\n",
            "p tw 3 1\n0 1\n",
            "p tw 3 1\n1 4\n",
            "c only a comment\n",
        ] {
            let err = read(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "input {:?}", input);
        }
    }

    #[test]
    fn writes_decomposition() {
        let graph = BitGraph::from_edges(3, &[(0, 1), (1, 2)]);
        let mut td = TreeDecomposition::default();
        let a = td.add_bag([0, 1].iter().copied().collect());
        let b = td.add_bag([2, 1].iter().copied().collect());
        td.add_edge(a, b);

        let mut buffer = Vec::new();
        PaceWriter::new(&td, &graph, &mut buffer).output().unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, "s td 2 2 3\nb 1 1 2\nb 2 2 3\n1 2\n");
    }
}
