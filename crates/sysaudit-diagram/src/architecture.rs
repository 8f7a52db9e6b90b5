//! Architecture extraction pass.
//!
//! Finds module-type definitions (part definitions carrying ports or a
//! declared `layer` attribute), groups them into Mermaid subgraph clusters
//! by layer, and resolves instance-qualified connections (`instance.port`)
//! through the instances' declared types into labeled module-to-module
//! edges. The diagram is emitted only when at least two modules exist.

use std::collections::BTreeMap;

use regex::Regex;
use sysaudit_core::ModelFile;

use crate::mermaid::{escape_label, humanize, sanitize_id};
use crate::model::{Diagram, DiagramKind};
use crate::parse::block_after;

#[derive(Debug)]
struct ModuleDef {
    name: String,
    layer: Option<String>,
    source: String,
}

#[derive(Debug)]
struct ModuleConnection {
    name: Option<String>,
    from_instance: String,
    to_instance: String,
}

fn parse_modules(files: &[ModelFile]) -> Vec<ModuleDef> {
    let header = Regex::new(r"(?m)^\s*(?:abstract\s+)?part\s+def\s+([A-Za-z_]\w*)")
        .expect("static pattern");
    let layer = Regex::new(r#"attribute\s+layer\s*=\s*"([^"]+)""#).expect("static pattern");
    let port = Regex::new(r"(?m)^\s*port\s+[A-Za-z_]\w*").expect("static pattern");

    let mut modules = Vec::new();
    for file in files {
        for capture in header.captures_iter(&file.content) {
            let whole = capture.get(0).map(|m| m.end()).unwrap_or(0);
            let Some(block) = block_after(&file.content, whole) else {
                continue;
            };
            let declared_layer = layer.captures(block).map(|c| c[1].to_string());
            if declared_layer.is_none() && !port.is_match(block) {
                continue; // plain data definition, not a module
            }
            modules.push(ModuleDef {
                name: capture[1].to_string(),
                layer: declared_layer,
                source: file.path.clone(),
            });
        }
    }
    modules
}

/// `instance name → module type` across the corpus.
fn parse_instances(files: &[ModelFile]) -> BTreeMap<String, String> {
    let usage =
        Regex::new(r"(?m)^\s*part\s+([a-z]\w*)\s*:\s*([A-Za-z_]\w*)\s*[;{]").expect("static pattern");
    let mut instances = BTreeMap::new();
    for file in files {
        for capture in usage.captures_iter(&file.content) {
            instances.insert(capture[1].to_string(), capture[2].to_string());
        }
    }
    instances
}

fn parse_connections(files: &[ModelFile]) -> Vec<ModuleConnection> {
    let connect = Regex::new(
        r"(?m)^\s*(?:connection\s+([A-Za-z_]\w*)\s+)?connect\s+([A-Za-z_]\w*)\.[A-Za-z_]\w*\s+to\s+([A-Za-z_]\w*)\.[A-Za-z_]\w*",
    )
    .expect("static pattern");

    let mut connections = Vec::new();
    for file in files {
        for capture in connect.captures_iter(&file.content) {
            connections.push(ModuleConnection {
                name: capture.get(1).map(|m| m.as_str().to_string()),
                from_instance: capture[2].to_string(),
                to_instance: capture[3].to_string(),
            });
        }
    }
    connections
}

/// Run the architecture pass. Returns `None` when fewer than two module
/// types are defined.
pub fn extract_architecture_diagram(files: &[ModelFile]) -> Option<Diagram> {
    let modules = parse_modules(files);
    if modules.len() < 2 {
        return None;
    }
    let instances = parse_instances(files);
    let connections = parse_connections(files);

    let has_layers = modules.iter().any(|m| m.layer.is_some());
    let mut body = String::from("flowchart TB\n");

    if has_layers {
        let mut clusters: BTreeMap<String, Vec<&ModuleDef>> = BTreeMap::new();
        for module in &modules {
            let layer = module.layer.clone().unwrap_or_else(|| "other".to_string());
            clusters.entry(layer).or_default().push(module);
        }
        for (layer, members) in &clusters {
            body.push_str(&format!(
                "    subgraph layer_{}[\"{}\"]\n",
                sanitize_id(layer),
                escape_label(&humanize(layer))
            ));
            for module in members {
                body.push_str(&format!(
                    "        {}[\"{}\"]\n",
                    sanitize_id(&module.name),
                    escape_label(&humanize(&module.name))
                ));
            }
            body.push_str("    end\n");
        }
    } else {
        for module in &modules {
            body.push_str(&format!(
                "    {}[\"{}\"]\n",
                sanitize_id(&module.name),
                escape_label(&humanize(&module.name))
            ));
        }
    }

    for connection in &connections {
        let Some(from_type) = instances.get(&connection.from_instance) else {
            continue;
        };
        let Some(to_type) = instances.get(&connection.to_instance) else {
            continue;
        };
        let known = |t: &String| modules.iter().any(|m| &m.name == t);
        if !known(from_type) || !known(to_type) {
            continue;
        }
        match &connection.name {
            Some(name) => body.push_str(&format!(
                "    {} -->|{}| {}\n",
                sanitize_id(from_type),
                escape_label(&humanize(name)),
                sanitize_id(to_type)
            )),
            None => body.push_str(&format!(
                "    {} --> {}\n",
                sanitize_id(from_type),
                sanitize_id(to_type)
            )),
        }
    }

    let mut source_files: Vec<String> = modules.iter().map(|m| m.source.clone()).collect();
    source_files.dedup();

    Some(Diagram {
        kind: DiagramKind::Architecture,
        title: "Architecture".to_string(),
        body,
        source_files,
    })
}
