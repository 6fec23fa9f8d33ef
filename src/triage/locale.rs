//! Region-specific text: emergency number, banners, disclaimers, and the local-language
//! emergency phrases that join the flat emergency-term set.

use serde::{Deserialize, Serialize};

use super::types::TriageError;

pub const DEFAULT_REGION: &str = "bd";

/// Replaced with [`Locale::emergency_number`] when locale text is rendered.
pub const NUMBER_PLACEHOLDER: &str = "{number}";

/// Static text resources for one region. Swapping a locale never touches classification
/// logic, only the extra emergency phrases and the rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub code: String,
    pub emergency_number: String,
    /// Paragraph rendered first whenever a message is flagged as an emergency.
    /// May contain `{number}`.
    pub emergency_banner: String,
    /// Replaces symptom-specific advice in emergencies. Always four items. May contain `{number}`.
    pub emergency_actions: Vec<String>,
    pub no_symptoms_message: String,
    pub no_conditions_message: String,
    pub symptoms_heading: String,
    pub conditions_heading: String,
    pub advice_heading: String,
    pub actions_heading: String,
    /// Generic disclaimer. Used for the no-symptom fallback and when no regional variant exists.
    pub disclaimer: String,
    pub regional_disclaimer: Option<String>,
    /// Local-language emergency phrases, matched like clinical emergency terms.
    #[serde(default)]
    pub transliterated_terms: Vec<String>,
}

impl Default for Locale {
    fn default() -> Self {
        Self::bangladesh()
    }
}

impl Locale {
    /// Resolve a region code. Unknown codes are an error.
    pub fn for_region(code: &str) -> Result<Self, TriageError> {
        match code.trim().to_lowercase().as_str() {
            "bd" | "bn" | "bangladesh" => Ok(Self::bangladesh()),
            "intl" | "en" | "international" => Ok(Self::international()),
            other => Err(TriageError::UnknownRegion(other.to_string())),
        }
    }

    /// Like [`Locale::for_region`], but unknown codes fall back to the international text.
    pub fn for_region_or_international(code: &str) -> Self {
        Self::for_region(code).unwrap_or_else(|_| Self::international())
    }

    /// Closing disclaimer: the regional variant when one exists.
    pub fn closing_disclaimer(&self) -> String {
        self.render(self.regional_disclaimer.as_deref().unwrap_or(&self.disclaimer))
    }

    /// Generic disclaimer, used on the no-symptom fallback.
    pub fn generic_disclaimer(&self) -> String {
        self.render(&self.disclaimer)
    }

    pub fn emergency_banner_text(&self) -> String {
        self.render(&self.emergency_banner)
    }

    pub fn emergency_action_lines(&self) -> Vec<String> {
        self.emergency_actions.iter().map(|a| self.render(a)).collect()
    }

    fn render(&self, template: &str) -> String {
        template.replace(NUMBER_PLACEHOLDER, &self.emergency_number)
    }

    pub fn bangladesh() -> Self {
        Self {
            code: "bd".into(),
            emergency_number: "999".into(),
            emergency_banner: "**EMERGENCY WARNING:** Your symptoms may indicate a medical emergency. \
                 Call **{number}** (National Emergency Service) immediately or go to the nearest hospital \
                 emergency department."
                .into(),
            emergency_actions: vec![
                "Call {number} (National Emergency Service) right now".into(),
                "Do not drive yourself to the hospital".into(),
                "Sit or lie down and stay as calm as possible".into(),
                "Ask someone to stay with you until help arrives".into(),
            ],
            no_symptoms_message: NO_SYMPTOMS_MESSAGE.into(),
            no_conditions_message: NO_CONDITIONS_MESSAGE.into(),
            symptoms_heading: "Symptoms identified".into(),
            conditions_heading: "Possible conditions".into(),
            advice_heading: "Recommendations".into(),
            actions_heading: "What to do now".into(),
            disclaimer: GENERIC_DISCLAIMER.into(),
            regional_disclaimer: Some(
                "*This is general information, not a medical diagnosis. Please consult a registered \
                 doctor (MBBS) or visit your nearest Upazila Health Complex. For free medical advice \
                 by phone, call Shastho Batayon at 16263. In an emergency, call {number}.*"
                    .into(),
            ),
            transliterated_terms: [
                "buke betha",
                "buke byatha",
                "buke chap",
                "shash nite parchi na",
                "shash kosto",
                "nishash nite kosto",
                "ogyan hoye geche",
                "gyan hariyeche",
                "rokto bondho hocche na",
                "khichuni",
                "bachao",
                "বুকে ব্যথা",
                "শ্বাসকষ্ট",
                "অজ্ঞান",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
        }
    }

    pub fn international() -> Self {
        Self {
            code: "intl".into(),
            emergency_number: "your local emergency number".into(),
            emergency_banner: "**EMERGENCY WARNING:** Your symptoms may indicate a medical emergency. \
                 Call {number} immediately or go to the nearest emergency department."
                .into(),
            emergency_actions: vec![
                "Call {number} right now".into(),
                "Do not drive yourself to the hospital".into(),
                "Sit or lie down and stay as calm as possible".into(),
                "Ask someone to stay with you until help arrives".into(),
            ],
            no_symptoms_message: NO_SYMPTOMS_MESSAGE.into(),
            no_conditions_message: NO_CONDITIONS_MESSAGE.into(),
            symptoms_heading: "Symptoms identified".into(),
            conditions_heading: "Possible conditions".into(),
            advice_heading: "Recommendations".into(),
            actions_heading: "What to do now".into(),
            disclaimer: GENERIC_DISCLAIMER.into(),
            regional_disclaimer: None,
            transliterated_terms: Vec::new(),
        }
    }
}

const NO_SYMPTOMS_MESSAGE: &str = "I couldn't identify specific symptoms in your message. \
     Could you describe what you are feeling in more detail, such as where it hurts, \
     how long it has lasted, and how severe it is?";

const NO_CONDITIONS_MESSAGE: &str =
    "I couldn't determine specific conditions from these symptoms.";

const GENERIC_DISCLAIMER: &str = "*This is general information, not a medical diagnosis. \
     Please consult a qualified healthcare professional for proper evaluation and treatment.*";
