//! JSON text view of the Tree Model.
//!
//! - parsing keeps object key order (document order)
//! - output is indented with two spaces and has no trailing newline

use crate::model::{Tree, TreeError};

/// Parse JSON text into a Tree Model.
pub fn parse_json_str(s: &str) -> Result<Tree, TreeError> {
    serde_json::from_str(s).map_err(|e| TreeError::Parse {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })
}

/// Serialize a Tree Model as indented JSON text.
pub fn to_pretty_json(tree: &Tree) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_key_order() {
        let tree = parse_json_str(r#"{"r":{"z":"1","a":"2","@m":"3"}}"#).unwrap();
        let keys: Vec<&str> = tree["r"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["z", "a", "@m"]);
    }

    #[test]
    fn parse_error_reports_position() {
        let err = parse_json_str("{\n  \"r\": [\n}").unwrap_err();
        match err {
            TreeError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn pretty_output_round_trips() {
        let src = r#"{"Project":{"@Type":"Project","Item":[{"@Name":"a"},{"@Name":"b"}]}}"#;
        let tree = parse_json_str(src).unwrap();
        let text = to_pretty_json(&tree).unwrap();
        assert!(text.starts_with("{\n  \"Project\": {"));
        assert!(!text.ends_with('\n'));
        assert_eq!(parse_json_str(&text).unwrap(), tree);
    }
}
