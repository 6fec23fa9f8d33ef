//! Rule-based symptom and emergency classification for chat messages.
//!
//! The free functions below run against a process-wide analyzer built from the built-in
//! tables and the default (`bd`) locale. Hosts that need other tables or another region
//! build their own [`SymptomAnalyzer`].

pub mod analyzer;
pub mod format;
pub mod knowledge;
pub mod locale;
pub mod rules;
pub mod types;

use std::sync::LazyLock;

pub use analyzer::SymptomAnalyzer;
pub use knowledge::KnowledgeBase;
pub use locale::Locale;
pub use rules::{CombinationRule, Predicate};
pub use types::{
    AnalysisResult, EmergencyTrigger, Severity, SymptomAdvice, SymptomMessage, SymptomRecord,
    TriageError,
};

static DEFAULT_ANALYZER: LazyLock<SymptomAnalyzer> = LazyLock::new(SymptomAnalyzer::default);

/// The shared analyzer behind the free functions.
pub fn default_analyzer() -> &'static SymptomAnalyzer {
    &DEFAULT_ANALYZER
}

pub fn is_symptom_question(text: &str) -> bool {
    DEFAULT_ANALYZER.is_symptom_question(text)
}

pub fn extract_symptoms(text: &str) -> Vec<String> {
    DEFAULT_ANALYZER.extract_symptoms(text)
}

pub fn detect_emergency(text: &str) -> Vec<EmergencyTrigger> {
    DEFAULT_ANALYZER.detect_emergency(text)
}

pub fn analyze_symptoms(text: &str) -> AnalysisResult {
    DEFAULT_ANALYZER.analyze_symptoms(text)
}

pub fn format_symptom_response(result: &AnalysisResult) -> String {
    DEFAULT_ANALYZER.format_symptom_response(result)
}

pub fn process_symptom_message<'a>(text: impl Into<Option<&'a str>>) -> SymptomMessage {
    DEFAULT_ANALYZER.process_symptom_message(text)
}
