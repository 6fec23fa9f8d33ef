use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Three-level ordinal attached to every symptom record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mild" => Ok(Self::Mild),
            "moderate" => Ok(Self::Moderate),
            "severe" => Ok(Self::Severe),
            _ => Err(TriageError::InvalidSeverity(s.to_string())),
        }
    }
}

/// One known symptom, keyed by its canonical lowercase name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomRecord {
    pub key: String,
    pub possible_conditions: Vec<String>,
    pub severity: Severity,
    pub follow_up_advice: String,
    /// Informational. Emergency status comes from `severity`, never from this flag alone.
    #[serde(default)]
    pub emergency_sign: bool,
}

/// Why an input was classified as an emergency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmergencyTrigger {
    /// A flat emergency term or marker appeared in the text.
    Term { term: String },
    /// A synonym of a listed emergency symptom appeared in the text.
    SevereSynonym { symptom: String },
    /// A multi-clause combination rule held.
    Combination { rule_id: String },
    /// A recognized symptom has severity `severe`.
    SevereSymptom { symptom: String },
}

impl EmergencyTrigger {
    /// Short label for structured logs (never carries patient text).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Term { .. } => "term",
            Self::SevereSynonym { .. } => "severe_synonym",
            Self::Combination { .. } => "combination",
            Self::SevereSymptom { .. } => "severe_symptom",
        }
    }
}

/// Structured verdict for one message. Built fresh per call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Matched keys in table order.
    pub recognized_symptoms: Vec<String>,
    /// Ranked by descending mention count, ties in first-seen order.
    pub possible_conditions: Vec<String>,
    /// Unique advice strings in discovery order.
    pub follow_up_advice: Vec<String>,
    pub is_emergency: bool,
    #[serde(default)]
    pub triggers: Vec<EmergencyTrigger>,
}

/// The symptom branch of [`SymptomMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomAdvice {
    pub is_emergency: bool,
    pub recognized_symptoms: Vec<String>,
    pub response: String,
}

/// Outcome of the top-level entry point.
///
/// Serializes as `{"is_symptom_question": false}` when the message is not about symptoms,
/// otherwise the advice fields are flattened next to the flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomMessage {
    pub is_symptom_question: bool,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub advice: Option<SymptomAdvice>,
}

impl SymptomMessage {
    pub fn not_symptom_question() -> Self {
        Self {
            is_symptom_question: false,
            advice: None,
        }
    }

    pub fn with_advice(advice: SymptomAdvice) -> Self {
        Self {
            is_symptom_question: true,
            advice: Some(advice),
        }
    }

    pub fn is_emergency(&self) -> bool {
        self.advice.as_ref().is_some_and(|a| a.is_emergency)
    }
}

/// Errors from loading tables and resolving configuration. Analysis itself cannot fail.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Failed to read knowledge base: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid knowledge base JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty phrase in {section}")]
    EmptyPhrase { section: String },

    #[error("Duplicate symptom key: {0}")]
    DuplicateSymptom(String),

    #[error("Synonyms given for unknown symptom: {0}")]
    UnknownSynonymKey(String),

    #[error("Invalid severity: {0}")]
    InvalidSeverity(String),

    #[error("Unknown region: {0}")]
    UnknownRegion(String),
}
