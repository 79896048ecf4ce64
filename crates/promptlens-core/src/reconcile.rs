//! Keeps the architecture diagram consistent with the recommended stack.
//!
//! The stack and the diagram are generated independently by the model and
//! routinely disagree ("React" in the stack, a "React Client" labelled Vue in
//! the diagram). The stack wins: every component whose name classifies into a
//! category present in the stack gets that category's primary technology.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::classify::{classify_component, TechnologyCategory};
use crate::{AnalysisResult, ArchitectureComponent, TechnologySuggestion};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationOutcome {
    pub result: AnalysisResult,
    /// True iff no component needed correcting.
    pub is_synced: bool,
    /// `<name>: "<old>" → "<new>"`, in architecture order.
    pub corrections: Vec<String>,
}

/// Category → primary technology name. Later entries for the same category
/// overwrite earlier ones; labels naming no known category are skipped.
fn stack_lookup(technologies: &[TechnologySuggestion]) -> HashMap<TechnologyCategory, &str> {
    let mut lookup = HashMap::new();
    for tech in technologies {
        if let Some(category) = TechnologyCategory::from_label(&tech.category) {
            lookup.insert(category, tech.primary.name.as_str());
        }
    }
    lookup
}

fn correction_entry(name: &str, old: &str, new: &str) -> String {
    format!("{}: \"{}\" → \"{}\"", name, old, new)
}

/// Overwrite mismatched component technologies with the stack's choice.
///
/// Only `architecture` is touched; every other field of `result` moves
/// through as-is. Never fails: an empty stack or diagram yields a synced
/// outcome.
pub fn reconcile(result: AnalysisResult) -> ReconciliationOutcome {
    let mut corrections = Vec::new();
    let architecture: Vec<ArchitectureComponent> = {
        let lookup = stack_lookup(&result.technologies);
        result
            .architecture
            .into_iter()
            .map(|mut component| {
                let expected = classify_component(&component.name)
                    .and_then(|category| lookup.get(&category).copied());
                if let Some(tech) = expected.filter(|tech| component.technology != *tech) {
                    tracing::debug!(
                        component = %component.id,
                        from = %component.technology,
                        to = tech,
                        "correcting component technology"
                    );
                    corrections.push(correction_entry(
                        &component.name,
                        &component.technology,
                        tech,
                    ));
                    component.technology = tech.to_string();
                }
                component
            })
            .collect()
    };

    if !corrections.is_empty() {
        tracing::info!(
            count = corrections.len(),
            "architecture synced with technology stack"
        );
    }

    ReconciliationOutcome {
        result: AnalysisResult {
            architecture,
            ..result
        },
        is_synced: corrections.is_empty(),
        corrections,
    }
}
