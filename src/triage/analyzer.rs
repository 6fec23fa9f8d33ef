use std::collections::{HashMap, HashSet};

use super::format::format_symptom_response;
use super::knowledge::KnowledgeBase;
use super::locale::Locale;
use super::types::{
    AnalysisResult, EmergencyTrigger, Severity, SymptomAdvice, SymptomMessage, SymptomRecord,
    TriageError,
};

/// Rule-based symptom classifier over one knowledge base and one locale.
///
/// Holds only immutable data, so a single instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct SymptomAnalyzer {
    knowledge: KnowledgeBase,
    locale: Locale,
    /// Clinical terms, then locale phrases, then bare markers. Lowercased, no duplicates.
    emergency_terms: Vec<String>,
}

impl Default for SymptomAnalyzer {
    fn default() -> Self {
        // Built-in tables are already normalized and valid.
        Self::from_normalized(KnowledgeBase::builtin(), Locale::default())
    }
}

impl SymptomAnalyzer {
    /// Normalize and validate the tables, then build the analyzer.
    pub fn new(knowledge: KnowledgeBase, locale: Locale) -> Result<Self, TriageError> {
        Ok(Self::from_normalized(knowledge.normalized()?, locale))
    }

    fn from_normalized(knowledge: KnowledgeBase, locale: Locale) -> Self {
        let mut seen = HashSet::new();
        let emergency_terms = knowledge
            .emergency_terms
            .iter()
            .chain(&locale.transliterated_terms)
            .chain(&knowledge.emergency_markers)
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect();

        Self {
            knowledge,
            locale,
            emergency_terms,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The merged flat emergency-term set.
    pub fn emergency_terms(&self) -> &[String] {
        &self.emergency_terms
    }

    /// True when the text names a known symptom (directly or by synonym) or asks a
    /// symptom-style question.
    pub fn is_symptom_question(&self, text: &str) -> bool {
        let lower = text.to_lowercase();

        self.knowledge
            .symptoms
            .iter()
            .any(|record| self.mentions(record, &lower))
            || self
                .knowledge
                .meta_phrases
                .iter()
                .any(|p| lower.contains(p.as_str()))
    }

    /// Recognized symptom keys, in table order.
    pub fn extract_symptoms(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.recognize(&lower)
            .into_iter()
            .map(|record| record.key.clone())
            .collect()
    }

    /// Every reason the text counts as an emergency. Empty means not an emergency.
    pub fn detect_emergency(&self, text: &str) -> Vec<EmergencyTrigger> {
        let lower = text.to_lowercase();
        let recognized = self.recognize(&lower);
        self.emergency_triggers(&lower, &recognized)
    }

    pub fn analyze_symptoms(&self, text: &str) -> AnalysisResult {
        let lower = text.to_lowercase();
        let recognized = self.recognize(&lower);
        let triggers = self.emergency_triggers(&lower, &recognized);

        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut advice: Vec<&str> = Vec::new();

        for record in &recognized {
            for condition in &record.possible_conditions {
                match index.get(condition.as_str()) {
                    Some(&i) => counts[i].1 += 1,
                    None => {
                        index.insert(condition.as_str(), counts.len());
                        counts.push((condition.as_str(), 1));
                    }
                }
            }
            advice.push(record.follow_up_advice.as_str());
        }

        // Stable: equal counts keep first-seen order.
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let mut seen_advice = HashSet::new();
        let follow_up_advice = advice
            .into_iter()
            .filter(|a| seen_advice.insert(*a))
            .map(str::to_string)
            .collect();

        let result = AnalysisResult {
            recognized_symptoms: recognized.iter().map(|r| r.key.clone()).collect(),
            possible_conditions: counts.into_iter().map(|(c, _)| c.to_string()).collect(),
            follow_up_advice,
            is_emergency: !triggers.is_empty(),
            triggers,
        };

        tracing::debug!(
            symptoms = result.recognized_symptoms.len(),
            conditions = result.possible_conditions.len(),
            is_emergency = result.is_emergency,
            "Symptom analysis complete"
        );

        result
    }

    pub fn format_symptom_response(&self, result: &AnalysisResult) -> String {
        format_symptom_response(result, &self.locale)
    }

    /// Top-level entry point for a chat message. `None` is treated as a non-symptom message.
    pub fn process_symptom_message<'a>(&self, text: impl Into<Option<&'a str>>) -> SymptomMessage {
        let Some(text) = text.into() else {
            return SymptomMessage::not_symptom_question();
        };
        if !self.is_symptom_question(text) {
            return SymptomMessage::not_symptom_question();
        }

        let result = self.analyze_symptoms(text);
        let response = self.format_symptom_response(&result);

        SymptomMessage::with_advice(SymptomAdvice {
            is_emergency: result.is_emergency,
            recognized_symptoms: result.recognized_symptoms,
            response,
        })
    }

    // ── Matching ────────────────────────────────────────────

    fn mentions(&self, record: &SymptomRecord, lower: &str) -> bool {
        lower.contains(record.key.as_str())
            || self
                .knowledge
                .synonyms_for(&record.key)
                .iter()
                .any(|s| lower.contains(s.as_str()))
    }

    fn recognize(&self, lower: &str) -> Vec<&SymptomRecord> {
        self.knowledge
            .symptoms
            .iter()
            .filter(|record| self.mentions(record, lower))
            .collect()
    }

    /// Flat terms, then synonym-linked emergency symptoms, then combination rules, then
    /// severe recognized symptoms. All four are kept, even where they overlap.
    fn emergency_triggers(
        &self,
        lower: &str,
        recognized: &[&SymptomRecord],
    ) -> Vec<EmergencyTrigger> {
        let mut triggers: Vec<EmergencyTrigger> = self
            .emergency_terms
            .iter()
            .filter(|term| lower.contains(term.as_str()))
            .map(|term| EmergencyTrigger::Term { term: term.clone() })
            .collect();

        triggers.extend(
            self.knowledge
                .symptoms
                .iter()
                .filter(|record| self.knowledge.is_emergency_symptom(&record.key))
                .filter(|record| {
                    self.knowledge
                        .synonyms_for(&record.key)
                        .iter()
                        .any(|s| lower.contains(s.as_str()))
                })
                .map(|record| EmergencyTrigger::SevereSynonym {
                    symptom: record.key.clone(),
                }),
        );

        triggers.extend(
            self.knowledge
                .combination_rules
                .iter()
                .filter(|rule| rule.fires(lower))
                .map(|rule| EmergencyTrigger::Combination {
                    rule_id: rule.id.clone(),
                }),
        );

        triggers.extend(
            recognized
                .iter()
                .filter(|record| record.severity == Severity::Severe)
                .map(|record| EmergencyTrigger::SevereSymptom {
                    symptom: record.key.clone(),
                }),
        );

        if !triggers.is_empty() {
            tracing::warn!(
                trigger_count = triggers.len(),
                kinds = ?triggers.iter().map(EmergencyTrigger::kind).collect::<Vec<_>>(),
                "Emergency indicators detected"
            );
        }

        triggers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::rules::{CombinationRule, Predicate};

    fn analyzer() -> SymptomAnalyzer {
        SymptomAnalyzer::default()
    }

    fn custom(symptoms: Vec<SymptomRecord>) -> SymptomAnalyzer {
        let kb = KnowledgeBase {
            symptoms,
            synonyms: HashMap::new(),
            emergency_symptoms: vec![],
            emergency_terms: vec![],
            emergency_markers: vec![],
            meta_phrases: vec![],
            combination_rules: vec![],
        };
        SymptomAnalyzer::new(kb, Locale::international()).unwrap()
    }

    fn rec(key: &str, conditions: &[&str], severity: Severity, advice: &str) -> SymptomRecord {
        SymptomRecord {
            key: key.into(),
            possible_conditions: conditions.iter().map(|c| c.to_string()).collect(),
            severity,
            follow_up_advice: advice.into(),
            emergency_sign: false,
        }
    }

    // ── is_symptom_question ────────────────────────────────────

    #[test]
    fn symptom_key_makes_symptom_question() {
        assert!(analyzer().is_symptom_question("I have a FEVER since yesterday"));
    }

    #[test]
    fn synonym_makes_symptom_question() {
        assert!(analyzer().is_symptom_question("I keep throwing up"));
    }

    #[test]
    fn meta_phrase_makes_symptom_question() {
        assert!(analyzer().is_symptom_question("What could be causing this?"));
        assert!(analyzer().is_symptom_question("Should I see a doctor?"));
        assert!(analyzer().is_symptom_question("Is this serious?"));
    }

    #[test]
    fn unrelated_text_is_not_symptom_question() {
        let a = analyzer();
        assert!(!a.is_symptom_question("xyz completely unrelated gibberish"));
        assert!(!a.is_symptom_question("When is my appointment with Dr. Rahman?"));
        assert!(!a.is_symptom_question(""));
        assert!(!a.is_symptom_question("1234 !!! ???"));
    }

    // ── extract_symptoms ───────────────────────────────────────

    #[test]
    fn extraction_follows_table_order_not_text_order() {
        let symptoms = analyzer().extract_symptoms("feeling dizzy, with a headache and a fever");
        assert_eq!(symptoms, vec!["headache", "fever", "dizziness"]);
    }

    #[test]
    fn extraction_reports_each_key_once() {
        let symptoms = analyzer().extract_symptoms("cough cough, coughing all night, dry cough");
        assert_eq!(symptoms, vec!["cough"]);
    }

    #[test]
    fn extraction_of_empty_text_is_empty() {
        assert!(analyzer().extract_symptoms("").is_empty());
    }

    // ── analyze_symptoms: scenarios ────────────────────────────

    #[test]
    fn headache_and_dizziness_is_not_emergency() {
        let result = analyzer().analyze_symptoms("I have a headache and feel dizzy");
        assert!(result.recognized_symptoms.contains(&"headache".to_string()));
        assert!(result.recognized_symptoms.contains(&"dizziness".to_string()));
        assert!(!result.is_emergency);
        assert!(result.triggers.is_empty());
        assert!(result.possible_conditions.contains(&"Tension headache".to_string()));
        assert!(result.possible_conditions.contains(&"Vertigo".to_string()));
    }

    #[test]
    fn severe_chest_pain_and_breathlessness_is_emergency() {
        let result =
            analyzer().analyze_symptoms("I'm having severe chest pain and shortness of breath");
        assert!(result.is_emergency);
        assert!(result.recognized_symptoms.contains(&"chest pain".to_string()));
        assert!(result.recognized_symptoms.contains(&"shortness of breath".to_string()));
        assert!(result.triggers.contains(&EmergencyTrigger::SevereSymptom {
            symptom: "chest pain".into()
        }));
    }

    #[test]
    fn emergency_number_alone_is_emergency() {
        let result = analyzer().analyze_symptoms("should I call 999");
        assert!(result.is_emergency);
        assert!(result.recognized_symptoms.is_empty());
        assert_eq!(
            result.triggers,
            vec![EmergencyTrigger::Term { term: "999".into() }]
        );
    }

    #[test]
    fn stroke_signs_fire_combination_rule() {
        let result = analyzer().analyze_symptoms("my face is drooping and my arm feels weak");
        assert!(result.is_emergency);
        assert!(result.recognized_symptoms.is_empty());
        assert!(result.triggers.contains(&EmergencyTrigger::Combination {
            rule_id: "stroke-fast".into()
        }));
    }

    #[test]
    fn everyday_messages_sharing_sign_words_are_not_emergencies() {
        let a = analyzer();
        for (text, symptom) in [
            ("I have trouble sleeping and want to talk to someone", "insomnia"),
            ("it is difficult to talk about my anxiety", "anxiety"),
            ("I feel weak and warm with a fever", "fever"),
        ] {
            let result = a.analyze_symptoms(text);
            assert_eq!(result.recognized_symptoms, vec![symptom], "{text}");
            assert!(!result.is_emergency, "{text}: {:?}", result.triggers);
        }
    }

    #[test]
    fn cardiac_pattern_fires_without_exact_key() {
        let result = analyzer().analyze_symptoms("pressure in my chest spreading to my jaw");
        assert!(result.triggers.contains(&EmergencyTrigger::Combination {
            rule_id: "cardiac-pattern".into()
        }));
        assert!(result.is_emergency);
    }

    #[test]
    fn synonym_of_emergency_symptom_is_flagged_separately() {
        let result = analyzer().analyze_symptoms("he passed out in the kitchen");
        assert_eq!(result.recognized_symptoms, vec!["loss of consciousness"]);
        assert!(result.triggers.contains(&EmergencyTrigger::SevereSynonym {
            symptom: "loss of consciousness".into()
        }));
        assert!(result.triggers.contains(&EmergencyTrigger::SevereSymptom {
            symptom: "loss of consciousness".into()
        }));
    }

    #[test]
    fn transliterated_phrase_is_emergency() {
        let result = analyzer().analyze_symptoms("Amar BUKE BYATHA hocche");
        assert!(result.is_emergency);
        assert!(result.triggers.contains(&EmergencyTrigger::Term {
            term: "buke byatha".into()
        }));
    }

    #[test]
    fn transliterated_phrase_depends_on_locale() {
        let a = SymptomAnalyzer::new(KnowledgeBase::builtin(), Locale::international()).unwrap();
        assert!(!a.analyze_symptoms("amar buke byatha hocche").is_emergency);
    }

    #[test]
    fn emergency_terms_are_merged_without_duplicates() {
        let a = analyzer();
        let terms = a.emergency_terms();
        let unique: HashSet<_> = terms.iter().collect();
        assert_eq!(unique.len(), terms.len());
        assert_eq!(terms.last().map(String::as_str), Some("999"));
    }

    #[test]
    fn mild_symptoms_alone_are_not_emergency() {
        let result = analyzer().analyze_symptoms("runny nose, sore throat and a cough");
        assert!(!result.is_emergency);
        assert_eq!(result.recognized_symptoms, vec!["cough", "sore throat"]);
    }

    #[test]
    fn emergency_sign_flag_alone_does_not_force_emergency() {
        let mut record = rec("itch", &["Dry skin"], Severity::Mild, "Moisturise.");
        record.emergency_sign = true;
        let result = custom(vec![record]).analyze_symptoms("bad itch");
        assert_eq!(result.recognized_symptoms, vec!["itch"]);
        assert!(!result.is_emergency);
    }

    // ── Ranking and de-duplication ─────────────────────────────

    #[test]
    fn conditions_ranked_by_count_then_first_seen() {
        let a = custom(vec![
            rec("alpha", &["Zeta", "Common", "Beta"], Severity::Mild, "A"),
            rec("bravo", &["Gamma", "Common"], Severity::Mild, "B"),
            rec("charlie", &["Common", "Gamma"], Severity::Mild, "C"),
        ]);
        let result = a.analyze_symptoms("alpha bravo charlie");
        assert_eq!(
            result.possible_conditions,
            vec!["Common", "Gamma", "Zeta", "Beta"]
        );
    }

    #[test]
    fn conditions_non_increasing_for_builtin_table() {
        let a = analyzer();
        let result = a.analyze_symptoms("fever, cough, sore throat, vomiting and diarrhea");
        let count = |c: &String| {
            result
                .recognized_symptoms
                .iter()
                .filter_map(|k| a.knowledge().record(k))
                .filter(|r| r.possible_conditions.contains(c))
                .count()
        };
        let counts: Vec<usize> = result.possible_conditions.iter().map(count).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{counts:?}");
        assert_eq!(result.possible_conditions[0], "Common cold");
    }

    #[test]
    fn advice_is_deduplicated_in_discovery_order() {
        let a = custom(vec![
            rec("alpha", &[], Severity::Mild, "Rest."),
            rec("bravo", &[], Severity::Mild, "Drink water."),
            rec("charlie", &[], Severity::Mild, "Rest."),
        ]);
        let result = a.analyze_symptoms("charlie bravo alpha");
        assert_eq!(result.follow_up_advice, vec!["Rest.", "Drink water."]);
    }

    // ── Totality and purity ────────────────────────────────────

    #[test]
    fn empty_input_yields_empty_analysis() {
        let result = analyzer().analyze_symptoms("");
        assert_eq!(result, AnalysisResult::default());
    }

    #[test]
    fn odd_input_is_handled() {
        let a = analyzer();
        for text in ["\u{0}\u{1}", "🙂🙂🙂", "   \n\t  ", "ÀÉÎÕÜ", "ǅ"] {
            let result = a.analyze_symptoms(text);
            assert!(result.recognized_symptoms.is_empty(), "{text:?}");
        }
        let long = "fever ".repeat(20_000);
        assert_eq!(a.analyze_symptoms(&long).recognized_symptoms, vec!["fever"]);
    }

    #[test]
    fn analysis_is_idempotent() {
        let a = analyzer();
        let text = "Chest pain, dizzy, and I fainted earlier";
        assert_eq!(a.analyze_symptoms(text), a.analyze_symptoms(text));
    }

    #[test]
    fn recognized_keys_are_substrings_or_synonyms() {
        let a = analyzer();
        let text = "I feel queasy, tired and my back hurts";
        let lower = text.to_lowercase();
        let result = a.analyze_symptoms(text);
        assert_eq!(result.recognized_symptoms, vec!["fatigue", "nausea", "back pain"]);
        for key in &result.recognized_symptoms {
            let hit = lower.contains(key.as_str())
                || a.knowledge().synonyms_for(key).iter().any(|s| lower.contains(s.as_str()));
            assert!(hit, "{key}");
        }
    }

    #[test]
    fn detect_emergency_matches_analysis_triggers() {
        let a = analyzer();
        let text = "sudden chest pain down my arm";
        assert_eq!(a.detect_emergency(text), a.analyze_symptoms(text).triggers);
        assert!(a.detect_emergency("mild headache").is_empty());
    }

    #[test]
    fn custom_rule_extends_detection() {
        let mut kb = KnowledgeBase::builtin();
        kb.combination_rules.push(CombinationRule {
            id: "meningitis".into(),
            description: String::new(),
            predicate: Predicate::All(vec![
                Predicate::Contains("stiff neck".into()),
                Predicate::Contains("fever".into()),
            ]),
        });
        let a = SymptomAnalyzer::new(kb, Locale::default()).unwrap();
        let triggers = a.detect_emergency("fever and a stiff neck");
        assert!(triggers.contains(&EmergencyTrigger::Combination {
            rule_id: "meningitis".into()
        }));
    }

    #[test]
    fn new_normalizes_hand_built_tables() {
        let mut kb = KnowledgeBase::builtin();
        kb.symptoms[1].key = "Fever".into();
        kb.meta_phrases.push("  Is It Bad ".into());
        let a = SymptomAnalyzer::new(kb, Locale::default()).unwrap();
        assert_eq!(a.extract_symptoms("i have a fever"), vec!["fever"]);
        assert!(a.is_symptom_question("is it bad"));
    }

    #[test]
    fn new_rejects_empty_key() {
        let mut kb = KnowledgeBase::builtin();
        kb.symptoms.push(rec(" ", &[], Severity::Mild, "rest"));
        assert!(matches!(
            SymptomAnalyzer::new(kb, Locale::default()),
            Err(TriageError::EmptyPhrase { section }) if section == "symptoms"
        ));
    }

    // ── process_symptom_message ────────────────────────────────

    #[test]
    fn process_short_circuits_non_symptom_text() {
        let a = analyzer();
        assert_eq!(
            a.process_symptom_message("xyz completely unrelated gibberish"),
            SymptomMessage::not_symptom_question()
        );
        assert_eq!(
            a.process_symptom_message(None::<&str>),
            SymptomMessage::not_symptom_question()
        );
    }

    #[test]
    fn process_returns_formatted_advice() {
        let msg = analyzer().process_symptom_message("I have a headache and feel dizzy");
        assert!(msg.is_symptom_question);
        let advice = msg.advice.expect("symptom advice");
        assert!(!advice.is_emergency);
        assert_eq!(advice.recognized_symptoms, vec!["headache", "dizziness"]);
        assert!(advice.response.contains("headache, dizziness"));
    }

    #[test]
    fn process_flags_emergency() {
        let msg = analyzer().process_symptom_message(Some("crushing chest pain and sweating"));
        assert!(msg.is_emergency());
    }
}
