//! Build an architecture diagram from the technology stack alone, for model
//! responses that omit the `architecture` section.

use std::collections::HashMap;

use crate::classify::TechnologyCategory;
use crate::{ArchitectureComponent, Position, TechnologySuggestion};

/// (category, id, display name, role, grid column, grid row)
const LAYOUT: &[(TechnologyCategory, &str, &str, &str, f64, f64)] = &[
    (TechnologyCategory::Frontend, "frontend", "Web Client", "User interface and client-side state", 1.0, 0.0),
    (TechnologyCategory::Styling, "styling", "Styling Layer", "Design tokens and component styles", 0.0, 0.0),
    (TechnologyCategory::Backend, "backend", "API Server", "Business logic and request handling", 1.0, 1.0),
    (TechnologyCategory::Database, "database", "Database", "Persistent application data", 0.0, 2.0),
    (TechnologyCategory::Authentication, "auth", "Identity Provider", "Sign-in, sessions and access control", 2.0, 1.0),
    (TechnologyCategory::Hosting, "hosting", "Hosting Platform", "Build, deploy and serve the application", 2.0, 0.0),
];

const EDGES: &[(&str, &str)] = &[
    ("frontend", "backend"),
    ("frontend", "auth"),
    ("backend", "database"),
    ("backend", "auth"),
    ("styling", "frontend"),
    ("hosting", "frontend"),
    ("hosting", "backend"),
];

const GRID_X: f64 = 280.0;
const GRID_Y: f64 = 180.0;

/// One component per known category in the stack, in canonical order.
/// Component names classify back into their own category (styling and
/// hosting into none), so the result is already consistent with the stack.
pub fn derive_architecture(technologies: &[TechnologySuggestion]) -> Vec<ArchitectureComponent> {
    // Same last-write-wins rule as reconciliation.
    let mut by_category: HashMap<TechnologyCategory, &TechnologySuggestion> = HashMap::new();
    for tech in technologies {
        if let Some(category) = TechnologyCategory::from_label(&tech.category) {
            by_category.insert(category, tech);
        }
    }

    let present: Vec<&str> = LAYOUT
        .iter()
        .filter(|(category, ..)| by_category.contains_key(category))
        .map(|(_, id, ..)| *id)
        .collect();

    LAYOUT
        .iter()
        .filter_map(|&(category, id, name, role, col, row)| {
            let tech = by_category.get(&category)?;
            let connections = EDGES
                .iter()
                .filter(|(from, to)| *from == id && present.contains(to))
                .map(|(_, to)| to.to_string())
                .collect();
            Some(ArchitectureComponent {
                id: id.to_string(),
                name: name.to_string(),
                technology: tech.primary.name.clone(),
                role: role.to_string(),
                reason: tech.primary.reason.clone(),
                risks: tech.primary.cons.clone(),
                position: Position {
                    x: col * GRID_X,
                    y: row * GRID_Y,
                },
                connections,
            })
        })
        .collect()
}
