use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use symptom_triage::chat::{route_message, ChatRole, ChatRoute, ChatTurn};
use symptom_triage::config::{self, TriageConfig};

fn main() -> ExitCode {
    symptom_triage::init_tracing();

    let json = std::env::args().skip(1).any(|a| a == "--json");

    let analyzer = match TriageConfig::from_env().build_analyzer() {
        Ok(analyzer) => analyzer,
        Err(e) => {
            tracing::error!(error = %e, "Failed to configure triage analyzer");
            eprintln!("{}: {e}", config::APP_NAME);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("{} v{} ready", config::APP_NAME, config::APP_VERSION);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut history: Vec<ChatTurn> = Vec::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read input");
                return ExitCode::FAILURE;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let output = if json {
            match serde_json::to_string(&analyzer.process_symptom_message(line.as_str())) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize result");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            match route_message(&analyzer, &line, &history) {
                ChatRoute::Symptom(advice) => advice.response,
                ChatRoute::Forward { .. } => {
                    "This doesn't look like a symptom question. It would be sent to the general assistant."
                        .to_string()
                }
            }
        };

        history.push(ChatTurn {
            role: ChatRole::User,
            content: line,
        });
        history.push(ChatTurn {
            role: ChatRole::Assistant,
            content: output.clone(),
        });

        if writeln!(stdout, "{output}\n").is_err() {
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
