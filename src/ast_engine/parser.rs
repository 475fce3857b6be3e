//! Tree-sitter based Python parser.
//!
//! Parses module source into a concrete syntax tree and reports the
//! positions of any syntax errors the grammar had to recover from.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tree_sitter::{Language, Node, Parser, Tree};

/// Result of parsing a Python module.
#[derive(Debug)]
pub struct ParsedModule {
    /// Path the source was read from.
    pub path: PathBuf,
    /// The source content.
    pub content: String,
    /// The parsed tree.
    pub tree: Tree,
    /// Any parse errors encountered.
    pub parse_errors: Vec<String>,
}

impl ParsedModule {
    /// Check if the module parsed without errors.
    pub fn is_valid(&self) -> bool {
        self.parse_errors.is_empty()
    }

    /// The `module` root node.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text spanned by a node.
    pub fn text(&self, node: &Node) -> &str {
        &self.content[node.start_byte()..node.end_byte()]
    }
}

/// Tree-sitter parser for Python modules.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonParser;

impl PythonParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    fn language() -> Language {
        tree_sitter_python::language()
    }

    /// Parse source code into a syntax tree.
    pub fn parse(&self, path: &Path, content: &str) -> Result<ParsedModule> {
        // Parser is not Sync, so build one per call
        let mut parser = Parser::new();
        parser
            .set_language(&Self::language())
            .map_err(|e| anyhow!("Failed to load Python grammar: {}", e))?;

        let tree = parser
            .parse(content.as_bytes(), None)
            .ok_or_else(|| anyhow!("Failed to parse {}", path.display()))?;

        let parse_errors = Self::check_parse_errors(&tree);

        Ok(ParsedModule {
            path: path.to_path_buf(),
            content: content.to_string(),
            tree,
            parse_errors,
        })
    }

    /// Check for parse errors in the tree.
    fn check_parse_errors(tree: &Tree) -> Vec<String> {
        let mut errors = Vec::new();
        let mut stack = vec![tree.root_node()];

        while let Some(node) = stack.pop() {
            if node.is_error() || node.is_missing() {
                let pos = node.start_position();
                errors.push(format!(
                    "Parse error at line {}, column {}",
                    pos.row + 1,
                    pos.column
                ));
                continue;
            }

            if !node.has_error() {
                continue;
            }

            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            // Reverse so errors come out in source order
            stack.extend(children.into_iter().rev());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_python() {
        let parser = PythonParser::new();
        let code = r#"
def hello(name: str) -> str:
    """Say hello."""
    return f"Hello, {name}!"

class Greeter:
    def greet(self, name: str) -> str:
        return hello(name)
"#;

        let result = parser.parse(Path::new("greet.py"), code).unwrap();

        assert!(result.is_valid());
        assert_eq!(result.root().kind(), "module");
    }

    #[test]
    fn test_syntax_error_reported() {
        let parser = PythonParser::new();
        let code = "def broken(:\n    pass\n";

        let result = parser.parse(Path::new("broken.py"), code).unwrap();

        assert!(!result.is_valid());
        assert!(result.parse_errors[0].starts_with("Parse error at line 1"));
    }

    #[test]
    fn test_empty_module_is_valid() {
        let parser = PythonParser::new();
        let result = parser.parse(Path::new("__init__.py"), "").unwrap();

        assert!(result.is_valid());
    }
}
