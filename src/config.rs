use std::path::PathBuf;

use crate::triage::{KnowledgeBase, Locale, SymptomAnalyzer, TriageError};

/// Application-level constants
pub const APP_NAME: &str = "symptom-triage";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Region code for locale text (`bd`, `intl`).
pub const REGION_ENV: &str = "TRIAGE_REGION";
/// Path to a JSON knowledge base replacing the built-in tables.
pub const KNOWLEDGE_PATH_ENV: &str = "TRIAGE_KNOWLEDGE_PATH";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "symptom_triage=info"
}

/// Get the application data directory (`~/.symptom-triage`), if a home directory exists.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".symptom-triage"))
}

/// Conventional location for a custom knowledge base.
pub fn default_knowledge_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join("symptoms.json"))
}

/// Runtime selection of tables and locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageConfig {
    pub region: String,
    /// `None` uses the built-in tables.
    pub knowledge_path: Option<PathBuf>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            region: crate::triage::locale::DEFAULT_REGION.to_string(),
            knowledge_path: None,
        }
    }
}

impl TriageConfig {
    /// Read the environment. Without `TRIAGE_KNOWLEDGE_PATH`, a `symptoms.json` in the app
    /// data directory is used when it exists.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), default_knowledge_path())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        fallback_path: Option<PathBuf>,
    ) -> Self {
        let defaults = Self::default();
        let knowledge_path = lookup(KNOWLEDGE_PATH_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| fallback_path.filter(|p| p.is_file()));
        Self {
            region: lookup(REGION_ENV)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.region),
            knowledge_path,
        }
    }

    pub fn build_analyzer(&self) -> Result<SymptomAnalyzer, TriageError> {
        let locale = Locale::for_region(&self.region)?;
        let knowledge = match &self.knowledge_path {
            Some(path) => KnowledgeBase::from_path(path)?,
            None => KnowledgeBase::builtin(),
        };
        tracing::info!(
            region = %locale.code,
            custom_knowledge = self.knowledge_path.is_some(),
            "Triage analyzer configured"
        );
        SymptomAnalyzer::new(knowledge, locale)
    }
}
