pub mod config;
pub mod triage; // Symptom & emergency classification
pub mod chat; // Chat routing + general responder prompt

use tracing_subscriber::EnvFilter;

pub use triage::{
    analyze_symptoms, extract_symptoms, format_symptom_response, is_symptom_question,
    process_symptom_message, AnalysisResult, SymptomAnalyzer, SymptomMessage,
};

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::debug!("{} v{} logging initialised", config::APP_NAME, config::APP_VERSION);
}
