//! sysaudit Diagram Library
//!
//! Four independent extraction passes (entity, state, flow, architecture)
//! over a split model corpus, each producing renderable Mermaid diagram
//! specifications. Every pass is tolerant of malformed or incomplete input:
//! unmatched patterns simply contribute nothing, and no pass ever fails.

pub mod architecture;
pub mod entity;
pub mod flow;
pub mod mermaid;
pub mod model;
mod parse;
pub mod state;

use sysaudit_core::ModelFile;
use tracing::debug;

pub use architecture::extract_architecture_diagram;
pub use entity::extract_entity_diagram;
pub use flow::extract_flow_diagrams;
pub use model::{Diagram, DiagramKind};
pub use state::extract_state_diagrams;

/// Run all four passes over a split corpus.
pub fn extract_diagrams(files: &[ModelFile]) -> Vec<Diagram> {
    let mut diagrams = Vec::new();
    diagrams.extend(extract_entity_diagram(files));
    diagrams.extend(extract_state_diagrams(files));
    diagrams.extend(extract_flow_diagrams(files));
    diagrams.extend(extract_architecture_diagram(files));
    debug!(files = files.len(), diagrams = diagrams.len(), "diagram extraction complete");
    diagrams
}
