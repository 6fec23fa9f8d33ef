use std::fmt::Write;

use super::locale::Locale;
use super::types::AnalysisResult;

/// Conditions rendered in the advisory, highest ranked first.
pub const MAX_CONDITIONS: usize = 5;
/// Follow-up advice bullets rendered when the message is not an emergency.
pub const MAX_ADVICE: usize = 3;

/// Render an analysis as a markdown advisory. Deterministic for a given result and locale.
pub fn format_symptom_response(result: &AnalysisResult, locale: &Locale) -> String {
    let mut out = String::new();

    if result.is_emergency {
        out.push_str(&locale.emergency_banner_text());
        out.push_str("\n\n");
    }

    if result.recognized_symptoms.is_empty() {
        out.push_str(&locale.no_symptoms_message);
        out.push_str("\n\n");
        out.push_str(&locale.generic_disclaimer());
        return out;
    }

    let _ = write!(
        out,
        "**{}:** {}\n\n",
        locale.symptoms_heading,
        result.recognized_symptoms.join(", ")
    );

    if result.possible_conditions.is_empty() {
        out.push_str(&locale.no_conditions_message);
        out.push_str("\n\n");
    } else {
        let _ = writeln!(out, "**{}:**", locale.conditions_heading);
        for condition in result.possible_conditions.iter().take(MAX_CONDITIONS) {
            let _ = writeln!(out, "- {condition}");
        }
        out.push('\n');
    }

    if result.is_emergency {
        let _ = writeln!(out, "**{}:**", locale.actions_heading);
        for (i, action) in locale.emergency_action_lines().iter().enumerate() {
            let _ = writeln!(out, "{}. {action}", i + 1);
        }
        out.push('\n');
    } else if !result.follow_up_advice.is_empty() {
        let _ = writeln!(out, "**{}:**", locale.advice_heading);
        for advice in result.follow_up_advice.iter().take(MAX_ADVICE) {
            let _ = writeln!(out, "- {advice}");
        }
        out.push('\n');
    }

    out.push_str(&locale.closing_disclaimer());
    out
}
