pub mod classify;
pub mod derive;
pub mod prompt;
pub mod reconcile;
pub mod roadmap;

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use classify::{classify_component, component_keywords, TechnologyCategory};
pub use derive::derive_architecture;
pub use prompt::{validate_prompt, PromptError};
pub use reconcile::{reconcile, ReconciliationOutcome};
pub use roadmap::{generate_roadmap, total_duration_days, Milestone};

// --- Types (matching the analysis JSON contract) ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, schemars::JsonSchema)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDimension {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default = "default_max_score")]
    pub max_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasoning: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub missing: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub improvements: Vec<String>,
    /// Emoji shown next to the dimension
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon: String,
}

fn default_max_score() -> f64 {
    10.0
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentKind {
    Strength,
    Weakness,
    Assumption,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
pub struct StrengthWeakness {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AssessmentKind,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, schemars::JsonSchema)]
pub struct PrimaryChoice {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pros: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeChoice {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub when_to_use: String,
}

/// One row of the recommended stack. `primary.name` is the authoritative
/// technology for `category`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, schemars::JsonSchema)]
pub struct TechnologySuggestion {
    /// Category label, e.g. "Frontend" or "Autenticazione"
    pub category: String,
    pub primary: PrimaryChoice,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alternative: AlternativeChoice,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, schemars::JsonSchema)]
pub struct ArchitectureComponent {
    #[serde(default)]
    pub id: String,
    /// Free-text label the category is inferred from
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technology: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risks: Vec<String>,
    #[serde(default)]
    pub position: Position,
    /// IDs of the components this one talks to
    #[serde(default, deserialize_with = "null_as_default")]
    pub connections: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BestPractice {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_issues: Option<Vec<String>>,
}

/// The full critique of one prompt. Every collection defaults to empty so a
/// partially-shaped model response still deserializes.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dimensions: Vec<AnalysisDimension>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub strengths_weaknesses: Vec<StrengthWeakness>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub optimized_prompt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<TechnologySuggestion>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub architecture: Vec<ArchitectureComponent>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vibe_coding_practices: Vec<BestPractice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub architecture_practices: Vec<BestPractice>,
}

/// Read an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// JSON Schema of [`AnalysisResult`], embedded in the model instructions.
pub fn analysis_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(AnalysisResult)).unwrap_or_default()
}

// --- Errors ---

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("analysis '{0}' not found")]
    NotFound(String),
    #[error("invalid analysis name '{0}'")]
    InvalidName(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// --- Storage ---

/// Resolve the global data directory (~/.promptlens/).
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".promptlens")
}

/// A prompt together with its reconciled analysis, as persisted on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedAnalysis {
    pub prompt: String,
    pub outcome: ReconciliationOutcome,
}

/// Directory of saved analyses, one `<name>.json` per entry.
#[derive(Debug, Clone)]
pub struct AnalysisStore {
    root: PathBuf,
}

impl Default for AnalysisStore {
    fn default() -> Self {
        Self::new(data_dir().join("analyses"))
    }
}

impl AnalysisStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
        if !valid {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(format!("{}.json", name)))
    }

    /// List all saved analysis names (without .json extension), sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.exists() {
            return Ok(vec![]);
        }
        let mut names: Vec<String> = fs::read_dir(&self.root)?
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let name = entry.file_name().to_string_lossy().to_string();
                name.strip_suffix(".json")
                    .filter(|n| !n.starts_with('.'))
                    .map(|n| n.to_string())
            })
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn read(&self, name: &str) -> Result<SavedAnalysis, StoreError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write through a temp file + rename so readers never see a half-written
    /// entry.
    pub fn write(&self, name: &str, analysis: &SavedAnalysis) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.root)?;
        let json = serde_json::to_string_pretty(analysis)?;
        let tmp = self.root.join(format!(".{}.json.tmp", name));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(name, "saved analysis");
        Ok(())
    }

    /// Delete a saved analysis. Deleting a missing entry is not an error.
    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

// --- AI Settings ---

pub const DEFAULT_TIMEOUT_SECS: u64 = 55;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    /// Base URL for the OpenAI-compatible `gateway` provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl AiSettings {
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

fn settings_path() -> PathBuf {
    data_dir().join("settings.json")
}

pub fn read_settings() -> AiSettings {
    read_settings_from(&settings_path())
}

pub fn read_settings_from(path: &Path) -> AiSettings {
    if !path.exists() {
        return AiSettings::default();
    }
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn write_settings(settings: &AiSettings) -> Result<(), StoreError> {
    write_settings_to(&settings_path(), settings)
}

pub fn write_settings_to(path: &Path, settings: &AiSettings) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}
