//! Chat routing: decide whether the triage engine answers a message or whether it goes to
//! the general AI responder, and build that responder's prompt.
//!
//! The engine never acts on an emergency itself. Hosts read `is_emergency` from the
//! symptom route and run their own alert flow.

use serde::{Deserialize, Serialize};

use crate::triage::{SymptomAdvice, SymptomAnalyzer};

pub const MEDICAL_SYSTEM_PROMPT: &str = r#"You are a health information assistant inside a patient-facing healthcare app. You are NOT a doctor.

RULES:
1. Give general health information in plain, friendly language.
2. NEVER give a diagnosis or prescribe medication or doses.
3. Encourage the user to consult a qualified doctor for anything specific to them.
4. If the user describes chest pain, trouble breathing, heavy bleeding, fainting, seizures or stroke signs, tell them to call 999 (National Emergency Service) immediately.
5. Keep answers short and practical. Say so when you are unsure.
6. Answer only health-related questions. Politely decline anything else."#;

/// Recent turns carried into the forwarded prompt.
pub const HISTORY_TURNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Where a chat message should be answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum ChatRoute {
    /// The triage engine answered. Check `is_emergency` before rendering.
    Symptom(SymptomAdvice),
    /// Send `prompt` to the general AI responder.
    Forward { prompt: String },
}

impl ChatRoute {
    pub fn is_emergency(&self) -> bool {
        matches!(self, Self::Symptom(advice) if advice.is_emergency)
    }
}

/// Route one user message. Symptom questions are answered locally, everything else is
/// forwarded with the recent history.
pub fn route_message(analyzer: &SymptomAnalyzer, text: &str, history: &[ChatTurn]) -> ChatRoute {
    match analyzer.process_symptom_message(text).advice {
        Some(advice) => {
            tracing::info!(
                route = "symptom",
                is_emergency = advice.is_emergency,
                symptoms = advice.recognized_symptoms.len(),
                "Chat message answered by triage"
            );
            ChatRoute::Symptom(advice)
        }
        None => {
            tracing::info!(
                route = "forward",
                history_turns = history.len().min(HISTORY_TURNS),
                "Chat message forwarded to general responder"
            );
            ChatRoute::Forward {
                prompt: build_general_prompt(text, history),
            }
        }
    }
}

/// Build the prompt for the general responder: system rules, last few turns, then the
/// user's message.
pub fn build_general_prompt(message: &str, history: &[ChatTurn]) -> String {
    let mut prompt = String::from(MEDICAL_SYSTEM_PROMPT);
    prompt.push_str("\n\n");

    let start = history.len().saturating_sub(HISTORY_TURNS);
    let recent = &history[start..];
    if !recent.is_empty() {
        prompt.push_str("<CONVERSATION_HISTORY>\n");
        for turn in recent {
            let role = match turn.role {
                ChatRole::User => "User",
                ChatRole::Assistant => "Assistant",
            };
            prompt.push_str(&format!("{role}: {}\n", turn.content));
        }
        prompt.push_str("</CONVERSATION_HISTORY>\n\n");
    }

    prompt.push_str(&format!("User message: {}\n", message.trim()));
    prompt
}

/// Starter prompts shown in an empty chat.
pub fn default_prompt_suggestions() -> Vec<&'static str> {
    vec![
        "I have a headache and feel dizzy",
        "What could be causing my stomach pain?",
        "Should I see a doctor for a fever that won't go away?",
        "How can I sleep better?",
    ]
}
