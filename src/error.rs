use thiserror::Error;

use crate::graph::NodeType;

/// Source text that does not match the grammar.
///
/// `line` and `column` are 1-based and counted in chars, `position` is the
/// 0-based char offset of the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub position: usize,
}

impl SyntaxError {
    pub fn at_offset(source: &str, byte_offset: usize, message: impl Into<String>) -> Self {
        let consumed = source.get(..byte_offset).unwrap_or(source);
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rsplit('\n')
            .next()
            .map_or(0, |l| l.chars().count())
            + 1;
        let mut message = message.into();
        if message.is_empty() {
            message = "unexpected input".to_string();
        }
        SyntaxError {
            message,
            line,
            column,
            position: consumed.chars().count(),
        }
    }
}

/// Non-fatal findings recorded while transforming a diagram.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error("element `{0}` is declared more than once")]
    DuplicateElement(String),
    #[error("transition from `{source_id}` targets unknown element `{target_id}`")]
    DanglingTarget { source_id: String, target_id: String },
    #[error(
        "simultaneous transition (=>) is only valid between scene and process, got {source_type:?} => {target_type:?} ({source_id} => {target_id})"
    )]
    InvalidSimultaneous {
        source_id: String,
        target_id: String,
        source_type: Option<NodeType>,
        target_type: Option<NodeType>,
    },
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("malformed saved layout: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to access saved layout: {0}")]
    Io(#[from] std::io::Error),
}
