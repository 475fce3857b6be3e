//! Function definition extraction.
//!
//! Collects every `def` in a parsed module together with the names it
//! calls, so the call graph can be built without keeping syntax trees alive.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tree_sitter::Node;

use crate::ast_engine::calls::collect_calls;
use crate::ast_engine::parser::ParsedModule;

const FUNCTION_DEFINITION: &str = "function_definition";
const CLASS_DEFINITION: &str = "class_definition";

/// A function or method defined in a Python module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    /// Bare name of the function.
    pub name: String,
    /// Dotted path through enclosing classes and functions (e.g. "Greeter.greet").
    pub qualified_name: String,
    /// File the function is defined in.
    pub path: PathBuf,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// Header up to the body, whitespace collapsed, without the trailing colon.
    pub signature: String,
    /// First string literal of the body, if any.
    pub docstring: Option<String>,
    /// Whether this is an `async def`.
    pub is_async: bool,
    /// Names called directly (`name(...)`) anywhere in the definition.
    pub calls: BTreeSet<String>,
}

impl FunctionDef {
    /// Get the number of lines this definition spans.
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// `file:line` location of the definition.
    pub fn location(&self) -> String {
        format!("{}:{}", self.path.display(), self.start_line)
    }
}

/// Extract all function definitions from a parsed module.
///
/// Definitions come out in the order Python's `ast.walk` would reach them:
/// shallower ones first, source order within a level. Depth is counted in
/// Python AST nodes, so concrete-syntax wrappers such as `block` or
/// `decorated_definition` add no level. Indexing the result in order makes
/// the last definition of a name win, as it does in Python.
pub fn extract_definitions(module: &ParsedModule) -> Vec<FunctionDef> {
    let mut found: Vec<(usize, FunctionDef)> = Vec::new();
    let mut stack: Vec<(Node, usize, Vec<String>)> = vec![(module.root(), 0, Vec::new())];

    // Preorder, so pushes are in source order
    while let Some((node, depth, scope)) = stack.pop() {
        let mut child_scope = scope.clone();

        match node.kind() {
            FUNCTION_DEFINITION => {
                if let Some(def) = to_definition(module, &node, &scope) {
                    child_scope.push(def.name.clone());
                    found.push((depth, def));
                }
            }
            CLASS_DEFINITION => {
                if let Some(name) = node.child_by_field_name("name") {
                    child_scope.push(module.text(&name).to_string());
                }
            }
            _ => {}
        }

        let children = child_depths(&node, depth);
        for (child, child_depth) in children.into_iter().rev() {
            stack.push((child, child_depth, child_scope.clone()));
        }
    }

    // Stable, so source order is kept within a depth
    found.sort_by_key(|(depth, _)| *depth);
    found.into_iter().map(|(_, def)| def).collect()
}

/// Concrete nodes with no Python AST counterpart of their own.
fn is_transparent(kind: &str) -> bool {
    matches!(
        kind,
        "block" | "decorated_definition" | "else_clause" | "finally_clause"
    )
}

/// Named children of `node` paired with their Python AST depth.
///
/// Each `elif` is an `If` nested in the previous one's `orelse`, and a
/// trailing `else` belongs to the last `elif`.
fn child_depths<'tree>(node: &Node<'tree>, depth: usize) -> Vec<(Node<'tree>, usize)> {
    let mut cursor = node.walk();
    let mut elifs = 0;

    node.named_children(&mut cursor)
        .map(|child| {
            let child_depth = match (node.kind(), child.kind()) {
                ("if_statement", "elif_clause") => {
                    elifs += 1;
                    depth + elifs
                }
                ("if_statement", "else_clause") => depth + elifs,
                (_, kind) if is_transparent(kind) => depth,
                _ => depth + 1,
            };
            (child, child_depth)
        })
        .collect()
}

fn to_definition(module: &ParsedModule, node: &Node, scope: &[String]) -> Option<FunctionDef> {
    let name = module.text(&node.child_by_field_name("name")?).to_string();

    let qualified_name = if scope.is_empty() {
        name.clone()
    } else {
        format!("{}.{}", scope.join("."), name)
    };

    let body = node.child_by_field_name("body");
    let is_async = node.child(0).map(|c| c.kind() == "async").unwrap_or(false);

    let mut calls = collect_calls(module, node);
    // Decorators wrap the definition in the concrete tree but belong to it
    if let Some(parent) = node.parent().filter(|p| p.kind() == "decorated_definition") {
        let mut cursor = parent.walk();
        for decorator in parent.named_children(&mut cursor).filter(|c| c.kind() == "decorator") {
            calls.extend(collect_calls(module, &decorator));
        }
    }

    Some(FunctionDef {
        name,
        qualified_name,
        path: module.path.clone(),
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
        signature: extract_signature(module, node, body.as_ref()),
        docstring: body.and_then(|b| extract_docstring(module, &b)),
        is_async,
        calls,
    })
}

fn extract_signature(module: &ParsedModule, node: &Node, body: Option<&Node>) -> String {
    let end = body.map(|b| b.start_byte()).unwrap_or_else(|| node.end_byte());
    let header = &module.content[node.start_byte()..end];

    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(':')
        .trim()
        .to_string()
}

fn extract_docstring(module: &ParsedModule, body: &Node) -> Option<String> {
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }

    let literal = first.named_child(0)?;
    if literal.kind() != "string" {
        return None;
    }

    let raw = module
        .text(&literal)
        .trim_start_matches(|c: char| matches!(c, 'r' | 'R' | 'u' | 'U' | 'b' | 'B' | 'f' | 'F'));

    let inner = ["\"\"\"", "'''", "\"", "'"]
        .iter()
        .find_map(|q| raw.strip_prefix(q).and_then(|s| s.strip_suffix(q)))
        .unwrap_or(raw);

    Some(inner.trim().to_string())
}
