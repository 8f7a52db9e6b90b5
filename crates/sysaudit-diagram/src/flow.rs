//! Action-flow extraction pass.
//!
//! Finds action definitions with at least one `first … then` succession
//! (pure event handlers without control flow are skipped) and renders each
//! as a Mermaid `flowchart TD`: inputs and outputs as parallelogram nodes,
//! nested steps as process nodes labeled by their doc comment or humanized
//! name. Edges run input → first step, through the declared successions,
//! and last step → each output except one literally named `error`.

use regex::Regex;
use sysaudit_core::ModelFile;

use crate::mermaid::{escape_label, humanize, sanitize_id};
use crate::model::{Diagram, DiagramKind};
use crate::parse::{block_after, doc_comment};

#[derive(Debug)]
struct ActionDef {
    name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    /// `(name, label)` in declaration order.
    steps: Vec<(String, String)>,
    /// `first → then` successions.
    control_flow: Vec<(String, String)>,
    source: String,
}

fn parse_actions(files: &[ModelFile]) -> Vec<ActionDef> {
    let header = Regex::new(r"(?m)^\s*action\s+def\s+([A-Za-z_]\w*)").expect("static pattern");
    let input = Regex::new(r"(?m)^\s*in\s+(?:item\s+)?([A-Za-z_]\w*)").expect("static pattern");
    let output = Regex::new(r"(?m)^\s*out\s+(?:item\s+)?([A-Za-z_]\w*)").expect("static pattern");
    let step = Regex::new(r"(?m)^\s*action\s+([A-Za-z_]\w*)").expect("static pattern");
    let succession =
        Regex::new(r"(?m)^\s*first\s+([A-Za-z_]\w*)\s+then\s+([A-Za-z_]\w*)").expect("static pattern");

    let mut actions = Vec::new();
    for file in files {
        for capture in header.captures_iter(&file.content) {
            let whole = capture.get(0).map(|m| m.end()).unwrap_or(0);
            let Some(block) = block_after(&file.content, whole) else {
                continue;
            };
            let control_flow: Vec<(String, String)> = succession
                .captures_iter(block)
                .map(|s| (s[1].to_string(), s[2].to_string()))
                .collect();
            if control_flow.is_empty() {
                continue;
            }

            let mut steps = Vec::new();
            for s in step.captures_iter(block) {
                let name = s[1].to_string();
                if name == "def" {
                    continue;
                }
                let step_end = s.get(0).map(|m| m.end()).unwrap_or(0);
                let label = block_after(block, step_end)
                    .and_then(doc_comment)
                    .unwrap_or_else(|| humanize(&name));
                steps.push((name, label));
            }

            actions.push(ActionDef {
                name: capture[1].to_string(),
                inputs: input.captures_iter(block).map(|c| c[1].to_string()).collect(),
                outputs: output.captures_iter(block).map(|c| c[1].to_string()).collect(),
                steps,
                control_flow,
                source: file.path.clone(),
            });
        }
    }
    actions
}

fn render(action: &ActionDef) -> Diagram {
    let mut body = String::from("flowchart TD\n");

    for input in &action.inputs {
        body.push_str(&format!("    in_{}[/{}/]\n", sanitize_id(input), input));
    }
    for (name, label) in &action.steps {
        body.push_str(&format!(
            "    {}[\"{}\"]\n",
            sanitize_id(name),
            escape_label(label)
        ));
    }
    for output in &action.outputs {
        body.push_str(&format!("    out_{}[/{}/]\n", sanitize_id(output), output));
    }

    if let Some((first_step, _)) = action.steps.first() {
        for input in &action.inputs {
            body.push_str(&format!(
                "    in_{} --> {}\n",
                sanitize_id(input),
                sanitize_id(first_step)
            ));
        }
    }
    for (from, to) in &action.control_flow {
        body.push_str(&format!("    {} --> {}\n", sanitize_id(from), sanitize_id(to)));
    }
    if let Some((last_step, _)) = action.steps.last() {
        for output in &action.outputs {
            if output == "error" {
                continue;
            }
            body.push_str(&format!(
                "    {} --> out_{}\n",
                sanitize_id(last_step),
                sanitize_id(output)
            ));
        }
    }

    Diagram {
        kind: DiagramKind::Flow,
        title: humanize(&action.name),
        body,
        source_files: vec![action.source.clone()],
    }
}

/// Run the flow pass: one diagram per action definition with control flow.
pub fn extract_flow_diagrams(files: &[ModelFile]) -> Vec<Diagram> {
    parse_actions(files).iter().map(render).collect()
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

    const PLACE_ORDER: &str = r#"
action def PlaceOrder {
    in item order;
    out item receipt;
    out item error;

    action validate {
        doc /* Validate the order. */
    }
    action submit;

    first validate then submit;
}
"#;

    #[test]
    fn test_flow_structure() {
        let diagrams = extract_flow_diagrams(&[file("actions/Place.sysml", PLACE_ORDER)]);
        assert_eq!(diagrams.len(), 1);
        let body = &diagrams[0].body;

        // parallelogram inputs/outputs, process steps
        assert!(body.contains("in_order[/order/]"));
        assert!(body.contains("out_receipt[/receipt/]"));
        assert!(body.contains("validate[\"Validate the order.\"]"));
        assert!(body.contains("submit[\"Submit\"]"));

        // input chains to the first step; succession edge; last step to output
        assert!(body.contains("in_order --> validate"));
        assert!(body.contains("validate --> submit"));
        assert!(body.contains("submit --> out_receipt"));
    }

    #[test]
    fn test_error_output_gets_no_edge() {
        let diagrams = extract_flow_diagrams(&[file("a.sysml", PLACE_ORDER)]);
        let body = &diagrams[0].body;
        assert!(body.contains("out_error[/error/]"));
        assert!(!body.contains("--> out_error"));
    }

    #[test]
    fn test_event_handler_without_control_flow_skipped() {
        let handler = r#"
action def OnUserCreated {
    in item event;
    action log;
}
"#;
        assert!(extract_flow_diagrams(&[file("a.sysml", handler)]).is_empty());
    }

    #[test]
    fn test_title_humanized() {
        let diagrams = extract_flow_diagrams(&[file("a.sysml", PLACE_ORDER)]);
        assert_eq!(diagrams[0].title, "Place order");
    }

    #[test]
    fn test_step_label_falls_back_to_humanized_name() {
        let content = r#"
action def Sync {
    in item req;
    action fetchRemote;
    first start then fetchRemote;
}
"#;
        let diagrams = extract_flow_diagrams(&[file("a.sysml", content)]);
        assert!(diagrams[0].body.contains("fetchRemote[\"Fetch remote\"]"));
    }
}
