//! JSON export of concrete syntax trees.
//!
//! Shape of one node:
//!
//! ```text
//! { "kind": "function_definition", "span": [0, 12],
//!   "fields": { "name": 1, "body": 5 },
//!   "children": [ { "token": "keyword", "text": "def", "span": [0, 3] }, { "kind": "identifier", ... }, ... ] }
//! ```
//!
//! `fields` maps a field name to the index of the child it labels. Synthetic layout tokens are exported like any other
//! token, with empty text.

use flix_syntax::cst::{Element, Node};
use flix_syntax::diagnostics::Diagnostic;
use flix_syntax::lexer::Token;
use flix_syntax::span::Span;
use serde_json::{Map, Value, json};

/// Convert a node and everything under it to JSON.
pub fn node_to_json(node: &Node) -> Value {
    let fields: Map<String, Value> = node
        .fields()
        .iter()
        .map(|(name, index)| (name.as_str().to_string(), json!(index)))
        .collect();
    let children: Vec<Value> = node
        .children()
        .iter()
        .map(|child| match child {
            Element::Node(n) => node_to_json(n),
            Element::Token(t) => token_to_json(t),
        })
        .collect();
    json!({
        "kind": node.kind().as_str(),
        "span": span_to_json(node.span()),
        "fields": fields,
        "children": children,
    })
}

pub fn token_to_json(token: &Token) -> Value {
    json!({
        "token": token.kind.kind_name(),
        "text": token.kind.text(),
        "span": span_to_json(token.span),
    })
}

pub fn diagnostic_to_json(diagnostic: &Diagnostic) -> Value {
    json!({
        "severity": diagnostic.severity.to_string(),
        "code": diagnostic.code(),
        "message": diagnostic.message(),
        "span": span_to_json(diagnostic.span),
        "hints": diagnostic.hints,
    })
}

fn span_to_json(span: Span) -> Value {
    json!([span.start, span.end])
}

/// Pretty-printed JSON document `{ "tree": ..., "diagnostics": [...] }`.
pub fn to_json_string(root: &Node, diagnostics: &[Diagnostic]) -> serde_json::Result<String> {
    let document = json!({
        "tree": node_to_json(root),
        "diagnostics": diagnostics.iter().map(diagnostic_to_json).collect::<Vec<_>>(),
    });
    serde_json::to_string_pretty(&document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flix_syntax::parser;

    #[test]
    fn fields_point_at_their_children() {
        let parse = parser::parse("def f() = 1\n");
        let tree = node_to_json(&parse.root);
        assert_eq!(tree["kind"], "compilation_unit");

        let def = &tree["children"][0];
        assert_eq!(def["kind"], "function_definition");
        let name_index = def["fields"]["name"].as_u64().unwrap() as usize;
        assert_eq!(def["children"][name_index]["kind"], "identifier");
        assert_eq!(def["children"][0]["token"], "keyword");
        assert_eq!(def["children"][0]["text"], "def");
        assert_eq!(def["children"][0]["span"], json!([0, 3]));
    }

    #[test]
    fn document_carries_diagnostics() {
        let parse = parser::parse("def f() = \"abc\n");
        let text = to_json_string(&parse.root, &parse.diagnostics).unwrap();
        let document: Value = serde_json::from_str(&text).unwrap();
        let codes: Vec<&str> = document["diagnostics"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["code"].as_str())
            .collect();
        assert!(codes.contains(&"flix::lex::unterminated_string"), "{codes:?}");
        assert_eq!(document["tree"]["kind"], "compilation_unit");
    }
}
