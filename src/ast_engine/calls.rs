//! Direct call collection.

use std::collections::BTreeSet;

use tree_sitter::Node;

use crate::ast_engine::parser::ParsedModule;

/// Collect the names of every `name(...)` call under `node`.
///
/// Only calls whose callee is a bare identifier count; attribute calls such
/// as `self.run()` or `os.path.join()` are ignored.
pub fn collect_calls(module: &ParsedModule, node: &Node) -> BTreeSet<String> {
    let mut calls = BTreeSet::new();
    let mut stack = vec![*node];

    while let Some(current) = stack.pop() {
        if current.kind() == "call" {
            if let Some(function) = current.child_by_field_name("function") {
                if function.kind() == "identifier" {
                    calls.insert(module.text(&function).to_string());
                }
            }
        }

        let mut cursor = current.walk();
        stack.extend(current.named_children(&mut cursor));
    }

    calls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast_engine::parser::PythonParser;
    use std::path::Path;

    fn calls_in(code: &str) -> Vec<String> {
        let module = PythonParser::new().parse(Path::new("calls.py"), code).unwrap();
        let root = module.root();
        collect_calls(&module, &root).into_iter().collect()
    }

    #[test]
    fn test_bare_name_calls() {
        let calls = calls_in("def main():\n    load()\n    print(len(items))\n");
        assert_eq!(calls, vec!["len", "load", "print"]);
    }

    #[test]
    fn test_attribute_calls_ignored() {
        let calls = calls_in("def main():\n    self.run()\n    os.path.join(a, b)\n    local()\n");
        assert_eq!(calls, vec!["local"]);
    }

    #[test]
    fn test_calls_in_defaults_lambdas_and_chains() {
        let code = r#"
def main(timeout=default_timeout()):
    handler = lambda x: transform(x)
    factory()()
    return [wrap(i) for i in items]
"#;
        let calls = calls_in(code);
        assert_eq!(
            calls,
            vec!["default_timeout", "factory", "transform", "wrap"]
        );
    }
}
