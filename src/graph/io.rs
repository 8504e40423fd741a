use std::fs::File;
use std::io::Read;

use super::error::{GraphErr, GraphResult};
use super::{Graph, VertexI};

/// Parses the plain edge-list format: the first significant line holds the
/// number of vertices, every further line is either a `//` comment or a
/// pair `u v` of endpoint indices.
pub fn parse_graph(input: &str) -> GraphResult<Graph> {
    let mut lines = input
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with("//"));

    let header = match lines.next() {
        Some(line) => line,
        None => return GraphErr::new_err("Graph input is empty"),
    };
    let n = header
        .parse::<usize>()
        .map_err(|_| GraphErr::new(&format!("Invalid vertex count line '{}'", header)))?;

    let mut graph = Graph::new(n);
    for line in lines {
        let mut fields = line.split_whitespace();
        let endpoints = (fields.next(), fields.next());
        if let (Some(u), Some(v)) = endpoints {
            let u = u
                .parse::<usize>()
                .map_err(|_| GraphErr::new(&format!("Invalid edge line '{}'", line)))?;
            let v = v
                .parse::<usize>()
                .map_err(|_| GraphErr::new(&format!("Invalid edge line '{}'", line)))?;
            graph.add_edge(VertexI(u), VertexI(v))?;
        } else {
            return GraphErr::new_err(&format!("Invalid edge line '{}'", line));
        }
    }
    Ok(graph)
}

pub fn read_graph(r: &mut dyn Read) -> GraphResult<Graph> {
    let mut input = String::new();
    r.read_to_string(&mut input)
        .map_err(|e| GraphErr::new(&format!("Problem reading from stream: {}", e)))?;
    parse_graph(&input)
}

pub fn load_graph(path: &str) -> GraphResult<Graph> {
    let mut file =
        File::open(path).map_err(|e| GraphErr::new(&format!("Cannot open '{}': {}", path, e)))?;
    read_graph(&mut file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_graph() {
        let g = parse_graph("4\n// a square\n0 1\n1 2\n2 3\n3 0\n").expect("valid input");
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert!(g.has_edge(VertexI(3), VertexI(0)));
    }

    #[test]
    fn test_parse_graph_rejects_garbage() {
        assert!(parse_graph("").is_err());
        assert!(parse_graph("three\n0 1\n").is_err());
        assert!(parse_graph("3\n0\n").is_err());
        assert!(parse_graph("3\n0 7\n").is_err());
        assert!(parse_graph("3\n0 1\n0 1\n").is_err());
    }
}
