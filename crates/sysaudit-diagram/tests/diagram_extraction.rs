//! Integration tests: all four passes over one concatenated corpus dump.

use sysaudit_core::split_corpus;
use sysaudit_diagram::{extract_diagrams, DiagramKind};

const CORPUS: &str = r#"// FILE: domain/Shop.sysml
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
// FILE: domain/Lifecycle.sysml
package Lifecycle {
    state def OrderLifecycle {
        state Draft;
        state Active;
        transition first Draft then Active;
        transition first Active accept archive then Archived;
    }
}
// FILE: actions/PlaceOrder.sysml
package Ordering {
    action def PlaceOrder {
        in item order;
        out item receipt;
        out item error;
        action validate;
        action submit;
        first validate then submit;
    }
}
// FILE: arch/System.sysml
package System {
    part def WebServer {
        attribute layer = "presentation";
        port http;
    }
    part def ApiServer {
        attribute layer = "application";
        port rest;
    }
    part web : WebServer;
    part api : ApiServer;
    connection orderTraffic connect web.http to api.rest;
}
"#;

fn count(kind: DiagramKind, diagrams: &[sysaudit_diagram::Diagram]) -> usize {
    diagrams.iter().filter(|d| d.kind == kind).count()
}

#[test]
fn all_four_passes_fire() {
    let files = split_corpus(CORPUS);
    assert_eq!(files.len(), 4);

    let diagrams = extract_diagrams(&files);
    assert_eq!(count(DiagramKind::Entity, &diagrams), 1);
    assert_eq!(count(DiagramKind::State, &diagrams), 1);
    assert_eq!(count(DiagramKind::Flow, &diagrams), 1);
    assert_eq!(count(DiagramKind::Architecture, &diagrams), 1);
}

#[test]
fn entity_diagram_contract() {
    let files = split_corpus(CORPUS);
    let diagrams = extract_diagrams(&files);
    let entity = diagrams
        .iter()
        .find(|d| d.kind == DiagramKind::Entity)
        .expect("entity diagram");

    // User table with id marked primary, Order table with userId foreign
    assert!(entity.body.contains("User {"));
    assert!(entity.body.contains("string id PK"));
    assert!(entity.body.contains("string userId FK"));
    // one relationship edge labeled with the cardinality pair
    assert_eq!(entity.body.matches(": \"1 to *\"").count(), 1);
    assert_eq!(entity.source_files, vec!["domain/Shop.sysml"]);
}

#[test]
fn state_diagram_contract() {
    let files = split_corpus(CORPUS);
    let diagrams = extract_diagrams(&files);
    let state = diagrams
        .iter()
        .find(|d| d.kind == DiagramKind::State)
        .expect("state diagram");

    // three nodes (Archived synthesized), two directed edges
    for node in ["Draft", "Active", "Archived"] {
        assert!(state.body.contains(&format!("    {node}\n")), "{node}");
    }
    assert_eq!(state.body.matches(" --> ").count(), 2);
    assert!(state.body.contains("Active --> Archived : archive"));
}

#[test]
fn flow_diagram_contract() {
    let files = split_corpus(CORPUS);
    let diagrams = extract_diagrams(&files);
    let flow = diagrams
        .iter()
        .find(|d| d.kind == DiagramKind::Flow)
        .expect("flow diagram");

    assert!(flow.body.contains("in_order --> validate"));
    assert!(flow.body.contains("validate --> submit"));
    assert!(flow.body.contains("submit --> out_receipt"));
    assert!(!flow.body.contains("--> out_error"));
}

#[test]
fn architecture_diagram_contract() {
    let files = split_corpus(CORPUS);
    let diagrams = extract_diagrams(&files);
    let arch = diagrams
        .iter()
        .find(|d| d.kind == DiagramKind::Architecture)
        .expect("architecture diagram");

    assert!(arch.body.contains("subgraph layer_presentation"));
    assert!(arch.body.contains("WebServer -->|Order traffic| ApiServer"));
}

#[test]
fn malformed_corpus_contributes_nothing() {
    let files = split_corpus("// FILE: broken.sysml\npart def Broken { attribute\n");
    let diagrams = extract_diagrams(&files);
    assert!(diagrams.is_empty());
}

#[test]
fn extraction_is_deterministic() {
    let files = split_corpus(CORPUS);
    assert_eq!(extract_diagrams(&files), extract_diagrams(&files));
}
