//! Entity-relationship extraction pass.
//!
//! Finds item definitions carrying at least one attribute, classifies
//! them by parent-type family, and renders a Mermaid `erDiagram`: one table
//! node per entity (with primary/foreign key marks) and one labeled
//! relationship line per qualifying binary connection definition.

use std::collections::BTreeSet;

use regex::Regex;
use sysaudit_core::ModelFile;

use crate::mermaid::escape_label;
use crate::model::{Diagram, DiagramKind};
use crate::parse::{block_after, doc_comment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EntityClass {
    Entity,
    Dto,
    Other,
}

#[derive(Debug)]
struct EntityDef {
    name: String,
    class: EntityClass,
    /// `(name, type)` pairs in declaration order.
    attributes: Vec<(String, String)>,
    source: String,
}

#[derive(Debug)]
struct ConnectionDef {
    doc: Option<String>,
    /// `(end type, cardinality)` pairs; cardinality defaults to `"1"`.
    ends: Vec<(String, String)>,
}

fn classify(parent: Option<&str>) -> EntityClass {
    match parent {
        Some(p) if p.ends_with("Entity") => EntityClass::Entity,
        Some(p) if p.contains("DTO") || p.contains("Dto") => EntityClass::Dto,
        _ => EntityClass::Other,
    }
}

fn is_foreign_key(attribute: &str) -> bool {
    attribute != "id" && (attribute.ends_with("Id") || attribute.ends_with("_id"))
}

fn parse_entities(files: &[ModelFile]) -> Vec<EntityDef> {
    // item defs only; part defs are the architecture pass's territory
    let header = Regex::new(
        r"(?m)^\s*(?:abstract\s+)?item\s+def\s+([A-Za-z_]\w*)(?:\s*:>\s*([A-Za-z_][\w:]*))?",
    )
    .expect("static pattern");
    let attribute =
        Regex::new(r"(?m)^\s*attribute\s+([A-Za-z_]\w*)\s*(?::\s*([A-Za-z_][\w:]*))?")
            .expect("static pattern");

    let mut entities = Vec::new();
    for file in files {
        for capture in header.captures_iter(&file.content) {
            let whole = capture.get(0).map(|m| m.end()).unwrap_or(0);
            let Some(block) = block_after(&file.content, whole) else {
                continue;
            };
            let attributes: Vec<(String, String)> = attribute
                .captures_iter(block)
                .map(|a| {
                    let ty = a
                        .get(2)
                        .map(|t| t.as_str().to_lowercase())
                        .unwrap_or_else(|| "string".to_string());
                    (a[1].to_string(), ty)
                })
                .collect();
            if attributes.is_empty() {
                continue;
            }
            entities.push(EntityDef {
                name: capture[1].to_string(),
                class: classify(capture.get(2).map(|m| m.as_str())),
                attributes,
                source: file.path.clone(),
            });
        }
    }
    // domain entities first, then DTOs, then the rest; stable within a class
    entities.sort_by_key(|e| e.class);
    entities
}

fn parse_connections(files: &[ModelFile]) -> Vec<ConnectionDef> {
    let header =
        Regex::new(r"(?m)^\s*connection\s+def\s+([A-Za-z_]\w*)").expect("static pattern");
    let end = Regex::new(
        r"(?m)^\s*end\s+(?:[A-Za-z_]\w*\s*:\s*)?([A-Za-z_]\w*)\s*(?:\[([^\]]+)\])?",
    )
    .expect("static pattern");

    let mut connections = Vec::new();
    for file in files {
        for capture in header.captures_iter(&file.content) {
            let whole = capture.get(0).map(|m| m.end()).unwrap_or(0);
            let Some(block) = block_after(&file.content, whole) else {
                continue;
            };
            let ends: Vec<(String, String)> = end
                .captures_iter(block)
                .map(|e| {
                    let cardinality = e
                        .get(2)
                        .map(|m| m.as_str().trim().to_string())
                        .unwrap_or_else(|| "1".to_string());
                    (e[1].to_string(), cardinality)
                })
                .collect();
            if ends.len() >= 2 {
                connections.push(ConnectionDef {
                    doc: doc_comment(block),
                    ends,
                });
            }
        }
    }
    connections
}

/// Crow's-foot symbols for a cardinality, as `(left, right)` orientations.
fn crows_foot(cardinality: &str) -> (&'static str, &'static str) {
    match cardinality {
        "1" | "1..1" => ("||", "||"),
        "0..1" => ("|o", "o|"),
        "1..*" => ("}|", "|{"),
        "*" | "0..*" => ("}o", "o{"),
        _ => ("||", "||"),
    }
}

/// Run the entity pass. Returns `None` when the corpus defines no entity
/// with attributes.
pub fn extract_entity_diagram(files: &[ModelFile]) -> Option<Diagram> {
    let entities = parse_entities(files);
    if entities.is_empty() {
        return None;
    }
    let connections = parse_connections(files);
    let rendered: BTreeSet<&str> = entities.iter().map(|e| e.name.as_str()).collect();

    let mut body = String::from("erDiagram\n");
    for entity in &entities {
        body.push_str(&format!("    {} {{\n", entity.name));
        for (name, ty) in &entity.attributes {
            let mark = if name == "id" {
                " PK"
            } else if is_foreign_key(name) {
                " FK"
            } else {
                ""
            };
            body.push_str(&format!("        {ty} {name}{mark}\n"));
        }
        body.push_str("    }\n");
    }

    for connection in &connections {
        // binary relationship between the first two ends; at least one side
        // must be a rendered entity
        let (left_type, left_card) = &connection.ends[0];
        let (right_type, right_card) = &connection.ends[1];
        if !rendered.contains(left_type.as_str()) && !rendered.contains(right_type.as_str()) {
            continue;
        }
        let label = connection
            .doc
            .clone()
            .unwrap_or_else(|| format!("{left_card} to {right_card}"));
        let (left, _) = crows_foot(left_card);
        let (_, right) = crows_foot(right_card);
        body.push_str(&format!(
            "    {left_type} {left}--{right} {right_type} : \"{}\"\n",
            escape_label(&label)
        ));
    }

    // entities are ordered by class, so one file's entries may interleave
    let mut source_files: Vec<String> = entities.iter().map(|e| e.source.clone()).collect();
    source_files.sort();
    source_files.dedup();

    Some(Diagram {
        kind: DiagramKind::Entity,
        title: "Entity relationships".to_string(),
        body,
        source_files,
    })
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

    const SHOP: &str = r#"
package Shop {
    item def User :> Entity {
        attribute id : String;
        attribute name : String;
    }

    item def Order :> Entity {
        attribute id : String;
        attribute userId : String;
    }

    connection def UserOrders {
        end owner : User[1];
        end orders : Order[*];
    }
}
"#;

    #[test]
    fn test_shop_erd_marks_keys_and_edge() {
        let files = vec![file("domain/Shop.sysml", SHOP)];
        let diagram = extract_entity_diagram(&files).expect("diagram");

        assert!(diagram.body.starts_with("erDiagram"));
        assert!(diagram.body.contains("string id PK"));
        assert!(diagram.body.contains("string userId FK"));
        assert!(diagram.body.contains("User ||--o{ Order : \"1 to *\""));
        assert_eq!(diagram.source_files, vec!["domain/Shop.sysml"]);
    }

    #[test]
    fn test_connection_doc_wins_over_cardinalities() {
        let content = r#"
item def User :> Entity { attribute id; }
item def Order :> Entity { attribute id; }
connection def UserOrders {
    doc /* places */
    end owner : User[1];
    end orders : Order[*];
}
"#;
        let diagram = extract_entity_diagram(&[file("a.sysml", content)]).expect("diagram");
        assert!(diagram.body.contains(": \"places\""));
    }

    #[test]
    fn test_attribute_free_defs_skipped() {
        let content = "item def Marker {}\nitem def Empty;\n";
        assert!(extract_entity_diagram(&[file("a.sysml", content)]).is_none());
    }

    #[test]
    fn test_connection_to_unrendered_types_skipped() {
        let content = r#"
item def User :> Entity { attribute id; }
connection def Dangling {
    end a : Ghost[1];
    end b : Phantom[*];
}
"#;
        let diagram = extract_entity_diagram(&[file("a.sysml", content)]).expect("diagram");
        assert!(!diagram.body.contains("Ghost"));
    }

    #[test]
    fn test_default_cardinality_is_one() {
        let content = r#"
item def User :> Entity { attribute id; }
item def Profile :> Entity { attribute id; }
connection def UserProfile {
    end a : User;
    end b : Profile;
}
"#;
        let diagram = extract_entity_diagram(&[file("a.sysml", content)]).expect("diagram");
        assert!(diagram.body.contains("User ||--|| Profile : \"1 to 1\""));
    }

    #[test]
    fn test_source_files_unique_across_classes() {
        // one file contributes both an entity and a DTO, straddling another
        // file's entity in class order
        let files = vec![
            file(
                "domain/User.sysml",
                "item def User :> Entity { attribute id; }\nitem def UserView :> ResponseDTO { attribute id; }",
            ),
            file("domain/Order.sysml", "item def Order :> Entity { attribute id; }"),
        ];
        let diagram = extract_entity_diagram(&files).expect("diagram");
        assert_eq!(
            diagram.source_files,
            vec!["domain/Order.sysml", "domain/User.sysml"]
        );
    }

    #[test]
    fn test_entities_sorted_before_dtos() {
        let content = r#"
item def UserView :> ResponseDTO { attribute id; }
item def User :> Entity { attribute id; }
"#;
        let diagram = extract_entity_diagram(&[file("a.sysml", content)]).expect("diagram");
        let user = diagram.body.find("    User {").expect("User");
        let view = diagram.body.find("    UserView {").expect("UserView");
        assert!(user < view);
    }
}
