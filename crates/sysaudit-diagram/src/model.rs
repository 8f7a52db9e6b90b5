//! Diagram records produced by the extraction passes.

use serde::{Deserialize, Serialize};

/// Which extraction pass produced a diagram.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    Entity,
    State,
    Flow,
    Architecture,
}

/// A renderable diagram specification.
///
/// `body` is Mermaid graph-description text; rendering it is the consumer's
/// concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    pub kind: DiagramKind,

    /// Human-readable title.
    pub title: String,

    /// Mermaid graph-description text.
    pub body: String,

    /// Corpus files this diagram was extracted from.
    pub source_files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&DiagramKind::Architecture).expect("serialize");
        assert_eq!(json, "\"architecture\"");
    }

    #[test]
    fn test_diagram_serde_roundtrip() {
        let diagram = Diagram {
            kind: DiagramKind::State,
            title: "Order lifecycle".to_string(),
            body: "stateDiagram-v2\n    Draft\n".to_string(),
            source_files: vec!["domain/Order.sysml".to_string()],
        };
        let json = serde_json::to_string(&diagram).expect("serialize");
        let back: Diagram = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(diagram, back);
    }
}
