//! Call graph data model.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::ast_engine::FunctionDef;

/// A function reached from the entrypoint, with the names it calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    /// Bare name, as used at call sites.
    pub name: String,
    /// Dotted path through enclosing scopes.
    pub qualified_name: String,
    /// `file:line` of the definition.
    pub location: String,
    /// Number of source lines the definition spans.
    pub lines: usize,
    /// Header up to the body, e.g. `def load(path: str) -> dict`.
    pub signature: String,
    /// Docstring of the definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    /// Whether this is an `async def`.
    pub is_async: bool,
    /// Names called by this function, sorted.
    pub callees: BTreeSet<String>,
}

impl Caller {
    /// Build a caller entry from a definition and its retained callees.
    pub fn from_definition(def: &FunctionDef, callees: BTreeSet<String>) -> Self {
        Self {
            name: def.name.clone(),
            qualified_name: def.qualified_name.clone(),
            location: def.location(),
            lines: def.line_count(),
            signature: def.signature.clone(),
            docstring: def.docstring.clone(),
            is_async: def.is_async,
            callees,
        }
    }

    /// Hover text: location, signature and the docstring's summary line.
    pub fn tooltip(&self) -> String {
        let mut text = format!("{}\n{}", self.location, self.signature);
        if let Some(summary) = self.docstring.as_deref().and_then(|d| d.lines().next()) {
            if !summary.trim().is_empty() {
                text.push('\n');
                text.push_str(summary.trim());
            }
        }
        text
    }
}

/// Summary counts for a call graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GraphStats {
    /// Functions reached from the entrypoint.
    pub functions: usize,
    /// Caller to callee edges.
    pub edges: usize,
    /// Callees with no definition in the sources (builtins, imports).
    pub unresolved: usize,
}

/// Caller to callees graph grown from a single entrypoint.
///
/// Callers keep the order they were reached in a depth-first walk.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CallGraph {
    entrypoint: String,
    callers: Vec<Caller>,
}

impl CallGraph {
    /// Create an empty graph for an entrypoint.
    pub fn new(entrypoint: &str) -> Self {
        Self {
            entrypoint: entrypoint.to_string(),
            callers: Vec::new(),
        }
    }

    pub(crate) fn add_caller(&mut self, caller: Caller) {
        self.callers.push(caller);
    }

    /// Function the graph was grown from.
    pub fn entrypoint(&self) -> &str {
        &self.entrypoint
    }

    /// Callers in visit order.
    pub fn callers(&self) -> &[Caller] {
        &self.callers
    }

    /// Callees of a caller, if the name was reached.
    pub fn callees(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.caller(name).map(|c| &c.callees)
    }

    /// Look up a caller by name.
    pub fn caller(&self, name: &str) -> Option<&Caller> {
        self.callers.iter().find(|c| c.name == name)
    }

    /// Whether the name is a function defined in the analysed sources.
    pub fn is_resolved(&self, name: &str) -> bool {
        self.caller(name).is_some()
    }

    /// No function was reached from the entrypoint.
    pub fn is_empty(&self) -> bool {
        self.callers.is_empty()
    }

    /// Number of callers.
    pub fn len(&self) -> usize {
        self.callers.len()
    }

    /// Every caller and callee, deduplicated, in first-seen order.
    pub fn nodes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();

        for caller in &self.callers {
            let names = std::iter::once(&caller.name).chain(caller.callees.iter());
            for name in names {
                if seen.insert(name.as_str()) {
                    nodes.push(name.as_str());
                }
            }
        }

        nodes
    }

    /// All (caller, callee) edges.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.callers
            .iter()
            .flat_map(|c| c.callees.iter().map(move |callee| (c.name.as_str(), callee.as_str())))
            .collect()
    }

    /// Summary counts.
    pub fn stats(&self) -> GraphStats {
        let unresolved = self
            .nodes()
            .into_iter()
            .filter(|n| !self.is_resolved(n))
            .count();

        GraphStats {
            functions: self.callers.len(),
            edges: self.callers.iter().map(|c| c.callees.len()).sum(),
            unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn caller(name: &str, callees: &[&str]) -> Caller {
        Caller {
            name: name.to_string(),
            qualified_name: name.to_string(),
            location: format!("app.py:{}", name.len()),
            lines: 2,
            signature: format!("def {}()", name),
            docstring: None,
            is_async: false,
            callees: callees.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn sample() -> CallGraph {
        let mut graph = CallGraph::new("main");
        graph.add_caller(caller("main", &["load", "print"]));
        graph.add_caller(caller("load", &["open", "parse"]));
        graph.add_caller(caller("parse", &["load"]));
        graph
    }

    #[test]
    fn test_nodes_first_seen_order() {
        let graph = sample();
        assert_eq!(graph.nodes(), vec!["main", "load", "print", "open", "parse"]);
    }

    #[test]
    fn test_edges() {
        let graph = sample();
        assert_eq!(
            graph.edges(),
            vec![
                ("main", "load"),
                ("main", "print"),
                ("load", "open"),
                ("load", "parse"),
                ("parse", "load"),
            ]
        );
    }

    #[test]
    fn test_stats_and_resolution() {
        let graph = sample();

        assert!(graph.is_resolved("parse"));
        assert!(!graph.is_resolved("print"));
        assert_eq!(
            graph.stats(),
            GraphStats {
                functions: 3,
                edges: 5,
                unresolved: 2,
            }
        );
    }

    #[test]
    fn test_empty_graph() {
        let graph = CallGraph::new("main");

        assert!(graph.is_empty());
        assert!(graph.nodes().is_empty());
        assert_eq!(graph.stats(), GraphStats::default());
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["entrypoint"], "main");
        assert_eq!(json["callers"][0]["callees"][1], "print");
        assert_eq!(json["callers"][0]["signature"], "def main()");
        assert_eq!(json["callers"][0]["is_async"], false);
        assert!(json["callers"][0].get("docstring").is_none());
    }

    #[test]
    fn test_tooltip() {
        let mut load = caller("load", &[]);
        assert_eq!(load.tooltip(), "app.py:4\ndef load()");

        load.docstring = Some("Load the config.\n\nMore detail.".to_string());
        assert_eq!(load.tooltip(), "app.py:4\ndef load()\nLoad the config.");
    }
}
