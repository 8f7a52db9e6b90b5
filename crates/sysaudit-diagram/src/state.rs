//! State-machine extraction pass.
//!
//! Finds state definitions with explicit sub-states and `first … then`
//! transitions, rendering each as a Mermaid `stateDiagram-v2`: sub-states
//! as nodes colored from a fixed palette cycling on declaration order,
//! transitions as directed (optionally trigger-labeled) edges. A state
//! referenced by a transition but never declared is synthesized as an
//! additional node.

use regex::Regex;
use sysaudit_core::ModelFile;

use crate::mermaid::{humanize, PALETTE};
use crate::model::{Diagram, DiagramKind};
use crate::parse::block_after;

#[derive(Debug)]
struct StateDef {
    name: String,
    states: Vec<String>,
    /// `(from, trigger, to)`; trigger empty for unlabeled transitions.
    transitions: Vec<(String, String, String)>,
    source: String,
}

fn parse_state_defs(files: &[ModelFile]) -> Vec<StateDef> {
    let header = Regex::new(r"(?m)^\s*state\s+def\s+([A-Za-z_]\w*)").expect("static pattern");
    let sub_state = Regex::new(r"(?m)^\s*state\s+([A-Za-z_]\w*)\s*[;{]").expect("static pattern");
    let transition = Regex::new(
        r"transition\s+first\s+([A-Za-z_]\w*)(?:\s+accept\s+([A-Za-z_]\w*))?\s+then\s+([A-Za-z_]\w*)",
    )
    .expect("static pattern");

    let mut defs = Vec::new();
    for file in files {
        for capture in header.captures_iter(&file.content) {
            let whole = capture.get(0).map(|m| m.end()).unwrap_or(0);
            let Some(block) = block_after(&file.content, whole) else {
                continue;
            };
            let states: Vec<String> = sub_state
                .captures_iter(block)
                .map(|s| s[1].to_string())
                .filter(|s| s != "def")
                .collect();
            let transitions: Vec<(String, String, String)> = transition
                .captures_iter(block)
                .map(|t| {
                    let trigger = t.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
                    (t[1].to_string(), trigger, t[3].to_string())
                })
                .collect();
            if states.is_empty() || transitions.is_empty() {
                continue;
            }
            defs.push(StateDef {
                name: capture[1].to_string(),
                states,
                transitions,
                source: file.path.clone(),
            });
        }
    }
    defs
}

fn render(def: &StateDef) -> Diagram {
    // declared states first, then synthesized transition endpoints,
    // palette index following overall declaration order
    let mut nodes = def.states.clone();
    for (from, _, to) in &def.transitions {
        if !nodes.contains(from) {
            nodes.push(from.clone());
        }
        if !nodes.contains(to) {
            nodes.push(to.clone());
        }
    }

    let mut body = String::from("stateDiagram-v2\n");
    for node in &nodes {
        body.push_str(&format!("    {node}\n"));
    }
    for (from, trigger, to) in &def.transitions {
        if trigger.is_empty() {
            body.push_str(&format!("    {from} --> {to}\n"));
        } else {
            body.push_str(&format!("    {from} --> {to} : {trigger}\n"));
        }
    }
    for (index, color) in PALETTE.iter().enumerate().take(nodes.len()) {
        body.push_str(&format!("    classDef c{index} fill:{color},color:#fff\n"));
    }
    for (index, node) in nodes.iter().enumerate() {
        body.push_str(&format!("    class {node} c{}\n", index % PALETTE.len()));
    }

    Diagram {
        kind: DiagramKind::State,
        title: humanize(&def.name),
        body,
        source_files: vec![def.source.clone()],
    }
}

/// Run the state pass: one diagram per qualifying state definition.
pub fn extract_state_diagrams(files: &[ModelFile]) -> Vec<Diagram> {
    parse_state_defs(files).iter().map(render).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, content: &str) -> ModelFile {
        ModelFile {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    const LIFECYCLE: &str = r#"
state def OrderLifecycle {
    state Draft;
    state Active;
    transition first Draft then Active;
    transition first Active accept archive then Archived;
}
"#;

    #[test]
    fn test_synthesizes_undeclared_state() {
        let diagrams = extract_state_diagrams(&[file("domain/Order.sysml", LIFECYCLE)]);
        assert_eq!(diagrams.len(), 1);
        let body = &diagrams[0].body;

        // three nodes: Draft, Active declared; Archived synthesized
        assert!(body.contains("    Draft\n"));
        assert!(body.contains("    Active\n"));
        assert!(body.contains("    Archived\n"));
        // two directed edges, one labeled
        assert!(body.contains("Draft --> Active\n"));
        assert!(body.contains("Active --> Archived : archive\n"));
    }

    #[test]
    fn test_palette_cycles_on_declaration_order() {
        let diagrams = extract_state_diagrams(&[file("a.sysml", LIFECYCLE)]);
        let body = &diagrams[0].body;
        assert!(body.contains("class Draft c0"));
        assert!(body.contains("class Active c1"));
        assert!(body.contains("class Archived c2"));
    }

    #[test]
    fn test_title_is_humanized() {
        let diagrams = extract_state_diagrams(&[file("a.sysml", LIFECYCLE)]);
        assert_eq!(diagrams[0].title, "Order lifecycle");
    }

    #[test]
    fn test_requires_states_and_transitions() {
        let no_transitions = "state def S { state A; state B; }";
        assert!(extract_state_diagrams(&[file("a.sysml", no_transitions)]).is_empty());

        let no_states = "state def S { transition first A then B; }";
        assert!(extract_state_diagrams(&[file("a.sysml", no_states)]).is_empty());
    }

    #[test]
    fn test_multiple_defs_yield_multiple_diagrams() {
        let content = format!("{LIFECYCLE}\nstate def Job {{ state Queued; transition first Queued then Running; }}");
        let diagrams = extract_state_diagrams(&[file("a.sysml", &content)]);
        assert_eq!(diagrams.len(), 2);
    }
}
