//! Combination rules: emergency patterns that no single symptom captures.
//!
//! Each rule is a small predicate tree over the lowercased message. Rules are data, so new
//! patterns can ship in a knowledge-base file without new code paths.

use serde::{Deserialize, Serialize};

/// Boolean tree of substring tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Every child holds. An empty `All` holds.
    All(Vec<Predicate>),
    /// At least one child holds. An empty `Any` never holds.
    Any(Vec<Predicate>),
    /// The phrase is a substring of the lowercased text.
    Contains(String),
}

impl Predicate {
    /// Evaluate against text that is already lowercased.
    pub fn matches(&self, text_lower: &str) -> bool {
        match self {
            Self::All(children) => children.iter().all(|p| p.matches(text_lower)),
            Self::Any(children) => children.iter().any(|p| p.matches(text_lower)),
            Self::Contains(phrase) => text_lower.contains(phrase.as_str()),
        }
    }

    /// Lowercase every leaf so it can match lowercased input.
    pub(crate) fn normalize(&mut self) {
        match self {
            Self::All(children) | Self::Any(children) => {
                children.iter_mut().for_each(Predicate::normalize)
            }
            Self::Contains(phrase) => *phrase = phrase.trim().to_lowercase(),
        }
    }

    /// True if any leaf is an empty phrase (which would match every input).
    pub(crate) fn has_empty_leaf(&self) -> bool {
        match self {
            Self::All(children) | Self::Any(children) => children.iter().any(Self::has_empty_leaf),
            Self::Contains(phrase) => phrase.is_empty(),
        }
    }
}

/// A named predicate whose firing marks the message as an emergency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationRule {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub predicate: Predicate,
}

impl CombinationRule {
    pub fn fires(&self, text_lower: &str) -> bool {
        self.predicate.matches(text_lower)
    }
}

fn contains(phrase: &str) -> Predicate {
    Predicate::Contains(phrase.to_string())
}

fn any_of(phrases: &[&str]) -> Predicate {
    Predicate::Any(phrases.iter().map(|p| contains(p)).collect())
}

/// Chest discomfort together with a radiating or systemic sign.
pub fn cardiac_rule() -> CombinationRule {
    CombinationRule {
        id: "cardiac-pattern".into(),
        description: "Chest pain or pressure with arm/jaw radiation, sweating, nausea or breathlessness"
            .into(),
        predicate: Predicate::All(vec![
            contains("chest"),
            any_of(&["pain", "pressure", "squeez", "heavy", "tight"]),
            any_of(&[
                "left arm",
                "my arm",
                "down the arm",
                "arm pain",
                "jaw",
                "sweat",
                "nausea",
                "breathless",
                "shortness of breath",
            ]),
        ]),
    }
}

/// F.A.S.T.: face drooping, arm weakness, speech difficulty. Any one sign fires.
///
/// Leaves are whole sign phrases. Bare words like "arm" or "talk" also occur in "warm",
/// "harm" or "want to talk".
pub fn stroke_rule() -> CombinationRule {
    CombinationRule {
        id: "stroke-fast".into(),
        description: "Face drooping, arm weakness or speech difficulty".into(),
        predicate: Predicate::Any(vec![
            Predicate::All(vec![contains("face"), any_of(&["droop", "lopsided"])]),
            any_of(&[
                "face looks uneven",
                "face is uneven",
                "face went numb",
                "face is numb",
                "face feels numb",
                "numb face",
            ]),
            any_of(&[
                "arm feels weak",
                "arm is weak",
                "arm went weak",
                "weak arm",
                "arm weakness",
                "arm went numb",
                "arm is numb",
                "arm feels numb",
                "numb arm",
                "can't lift my arm",
                "cannot lift my arm",
            ]),
            any_of(&[
                "slurred",
                "slurring",
                "garbled speech",
                "speech is garbled",
                "trouble speaking",
                "difficulty speaking",
                "can't speak",
                "cannot speak",
                "unable to speak",
                "trouble finding words",
                "can't find the words",
                "can't get the words out",
            ]),
        ]),
    }
}

pub fn default_rules() -> Vec<CombinationRule> {
    vec![cardiac_rule(), stroke_rule()]
}
