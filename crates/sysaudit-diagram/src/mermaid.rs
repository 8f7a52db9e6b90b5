//! Mermaid text helpers shared by the extraction passes.

/// Node fill palette, cycled on declaration order.
pub const PALETTE: &[&str] = &["#4e79a7", "#f28e2b", "#59a14f", "#e15759", "#b07aa1"];

/// Reduce a name to a Mermaid-safe node identifier.
pub fn sanitize_id(name: &str) -> String {
    let id: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if id.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("n{id}")
    } else if id.is_empty() {
        "node".to_string()
    } else {
        id
    }
}

/// Escape a label for use inside quoted Mermaid text.
pub fn escape_label(text: &str) -> String {
    text.replace('"', "#quot;").replace('\n', " ")
}

/// Turn an identifier into a readable label: `dataFlow` and `data_flow`
/// both become `Data flow`.
pub fn humanize(name: &str) -> String {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in name.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(current.clone());
                current.clear();
            }
        } else if c.is_ascii_uppercase() && !current.is_empty() {
            words.push(current.clone());
            current.clear();
            current.push(c.to_ascii_lowercase());
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut label = words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(first) = label.get(0..1) {
        let upper = first.to_uppercase();
        label.replace_range(0..1, &upper);
    }
    label
}
