//! Keyword classification of architecture component names into stack
//! categories.
//!
//! The table is ordered and the first category with a matching keyword wins,
//! so a name like "User API" resolves to backend (checked before
//! authentication). Matching is a plain lowercase substring test: short
//! keywords such as "ui" or "db" also fire inside longer words.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechnologyCategory {
    Frontend,
    Styling,
    Backend,
    Database,
    Authentication,
    Hosting,
}

impl TechnologyCategory {
    /// Canonical stack order, as the categories appear in a well-formed
    /// technology list.
    pub const ALL: [TechnologyCategory; 6] = [
        TechnologyCategory::Frontend,
        TechnologyCategory::Styling,
        TechnologyCategory::Backend,
        TechnologyCategory::Database,
        TechnologyCategory::Authentication,
        TechnologyCategory::Hosting,
    ];

    /// Parse a category label from the stack section. Case-insensitive;
    /// both "Autenticazione" and "Authentication" name the auth category.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "frontend" => Some(Self::Frontend),
            "styling" => Some(Self::Styling),
            "backend" => Some(Self::Backend),
            "database" => Some(Self::Database),
            "autenticazione" | "authentication" => Some(Self::Authentication),
            "hosting" => Some(Self::Hosting),
            _ => None,
        }
    }

    /// The label the analysis prompt asks the model to use.
    pub fn label(self) -> &'static str {
        match self {
            Self::Frontend => "Frontend",
            Self::Styling => "Styling",
            Self::Backend => "Backend",
            Self::Database => "Database",
            Self::Authentication => "Autenticazione",
            Self::Hosting => "Hosting",
        }
    }
}

impl fmt::Display for TechnologyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Categories that component names are classified into, in match order.
/// Styling and hosting never appear as diagram components.
const COMPONENT_KEYWORDS: &[(TechnologyCategory, &[&str])] = &[
    (
        TechnologyCategory::Frontend,
        &["frontend", "presentation", "ui", "client", "web", "app"],
    ),
    (
        TechnologyCategory::Backend,
        &["backend", "api", "server", "edge", "function", "service"],
    ),
    (
        TechnologyCategory::Database,
        &["database", "db", "data", "storage", "postgres", "supabase", "mongo"],
    ),
    (
        TechnologyCategory::Authentication,
        &["auth", "identity", "login", "user", "session", "jwt"],
    ),
];

/// Keywords that classify a component name into `category`. Empty for
/// categories that are never inferred from names.
pub fn component_keywords(category: TechnologyCategory) -> &'static [&'static str] {
    COMPONENT_KEYWORDS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

/// Infer the stack category of a component from its display name.
/// Returns `None` when no keyword matches.
pub fn classify_component(name: &str) -> Option<TechnologyCategory> {
    let name = name.to_lowercase();
    COMPONENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| name.contains(k)))
        .map(|(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_each_category() {
        assert_eq!(
            classify_component("React Client"),
            Some(TechnologyCategory::Frontend)
        );
        assert_eq!(
            classify_component("Edge Functions"),
            Some(TechnologyCategory::Backend)
        );
        assert_eq!(
            classify_component("PostgreSQL"),
            Some(TechnologyCategory::Database)
        );
        assert_eq!(
            classify_component("Identity Provider"),
            Some(TechnologyCategory::Authentication)
        );
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(
            classify_component("SUPABASE STORAGE"),
            Some(TechnologyCategory::Database)
        );
        assert_eq!(
            classify_component("gestione sessioni"),
            Some(TechnologyCategory::Authentication)
        );
    }

    #[test]
    fn declaration_order_breaks_ties() {
        // "user" is an auth keyword but "api" is checked first.
        assert_eq!(
            classify_component("User API"),
            Some(TechnologyCategory::Backend)
        );
        // "Auth Service" contains the backend keyword "service".
        assert_eq!(
            classify_component("Auth Service"),
            Some(TechnologyCategory::Backend)
        );
    }

    #[test]
    fn substring_matches_inside_words() {
        // "guide" contains "ui".
        assert_eq!(
            classify_component("Style Guide"),
            Some(TechnologyCategory::Frontend)
        );
        // "mapping" contains "app".
        assert_eq!(
            classify_component("Mapping"),
            Some(TechnologyCategory::Frontend)
        );
    }

    #[test]
    fn no_match() {
        assert_eq!(classify_component("Message Queue"), None);
        assert_eq!(classify_component("Message Broker"), None);
        assert_eq!(classify_component(""), None);
    }

    #[test]
    fn keyword_table_lookup() {
        assert!(component_keywords(TechnologyCategory::Database).contains(&"db"));
        assert!(component_keywords(TechnologyCategory::Hosting).is_empty());
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(
            TechnologyCategory::from_label("autenticazione"),
            Some(TechnologyCategory::Authentication)
        );
        assert_eq!(
            TechnologyCategory::from_label(" Authentication "),
            Some(TechnologyCategory::Authentication)
        );
        assert_eq!(
            TechnologyCategory::from_label("DATABASE"),
            Some(TechnologyCategory::Database)
        );
        assert_eq!(TechnologyCategory::from_label("Monitoring"), None);
        for category in TechnologyCategory::ALL {
            assert_eq!(TechnologyCategory::from_label(category.label()), Some(category));
        }
    }
}
