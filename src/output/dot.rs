//! Graphviz DOT generation.

use std::fmt::{self, Display};

use crate::call_graph::CallGraph;

/// A directed graph in the DOT language.
#[derive(Debug, Clone)]
pub struct DotGraph {
    name: String,
    nodes: Vec<DotNode>,
    edges: Vec<DotEdge>,
}

impl DotGraph {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Lay out a call graph.
    ///
    /// Defined functions carry their location, signature and docstring summary
    /// as a tooltip, callees with no
    /// definition are dashed and the entrypoint is drawn with a heavier border.
    pub fn from_call_graph(graph: &CallGraph) -> Self {
        let mut dot = Self::new("call_graph");

        for name in graph.nodes() {
            let mut node = DotNode::new(name);
            match graph.caller(name) {
                Some(caller) => {
                    if caller.qualified_name != caller.name {
                        node = node.attr("label", &caller.qualified_name);
                    }
                    node = node.attr("tooltip", &caller.tooltip());
                }
                None => node = node.attr("style", "dashed"),
            }
            if name == graph.entrypoint() {
                node = node.attr("penwidth", "2");
            }
            dot.add_node(node);
        }

        for (from, to) in graph.edges() {
            dot.add_edge(DotEdge::new(from, to));
        }

        dot
    }

    pub fn add_node(&mut self, node: DotNode) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: DotEdge) {
        self.edges.push(edge);
    }

    pub fn nodes(&self) -> &[DotNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DotEdge] {
        &self.edges
    }

    pub fn as_dot<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        write!(writer, "{}", self)
    }
}

impl Display for DotGraph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "digraph {} {{", quote(&self.name))?;
        for node in &self.nodes {
            writeln!(f, "\t{}", node)?;
        }
        for edge in &self.edges {
            writeln!(f, "\t{}", edge)?;
        }
        writeln!(f, "}}")
    }
}

#[derive(Debug, Clone)]
pub struct DotNode {
    id: String,
    attrs: Vec<(String, String)>,
}

impl DotNode {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attrs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Display for DotNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.attrs.is_empty() {
            return write!(f, "{};", quote(&self.id));
        }

        let attrs: Vec<String> = self
            .attrs
            .iter()
            .map(|(k, v)| format!("{}={}", k, quote(v)))
            .collect();
        write!(f, "{} [{}];", quote(&self.id), attrs.join(", "))
    }
}

#[derive(Debug, Clone)]
pub struct DotEdge {
    from: String,
    to: String,
}

impl DotEdge {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl Display for DotEdge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {};", quote(&self.from), quote(&self.to))
    }
}

/// Double-quote a DOT identifier, escaping quotes and backslashes.
fn quote(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 2);
    out.push('"');
    for c in id.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_graph::CallGraphBuilder;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn test_empty_graph() {
        let empty = DotGraph::new("empty");
        let mut buf = String::new();
        empty.as_dot(&mut buf).unwrap();

        assert_eq!(buf, "digraph \"empty\" {\n}\n");
    }

    #[test]
    fn test_nodes_and_edges() {
        let mut graph = DotGraph::new("g");
        graph.add_node(DotNode::new("a"));
        graph.add_node(DotNode::new("b").attr("style", "dashed"));
        graph.add_edge(DotEdge::new("a", "b"));

        assert_eq!(
            graph.to_string(),
            "digraph \"g\" {\n\t\"a\";\n\t\"b\" [style=\"dashed\"];\n\t\"a\" -> \"b\";\n}\n"
        );
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote(r"a\b"), r#""a\\b""#);
    }

    #[test]
    fn test_from_call_graph() {
        let code = "def main():\n    helper()\n    print()\n\nclass Tool:\n    def helper(self):\n        \"\"\"Do the work.\"\"\"\n";
        let mut builder = CallGraphBuilder::new();
        builder.index_source(Path::new("app.py"), code).unwrap();
        let graph = builder.build("main");

        let dot = DotGraph::from_call_graph(&graph).to_string();

        assert_eq!(
            dot,
            concat!(
                "digraph \"call_graph\" {\n",
                "\t\"main\" [tooltip=\"app.py:1\\ndef main()\", penwidth=\"2\"];\n",
                "\t\"helper\" [label=\"Tool.helper\", tooltip=\"app.py:6\\ndef helper(self)\\nDo the work.\"];\n",
                "\t\"print\" [style=\"dashed\"];\n",
                "\t\"main\" -> \"helper\";\n",
                "\t\"main\" -> \"print\";\n",
                "}\n",
            )
        );
    }
}
