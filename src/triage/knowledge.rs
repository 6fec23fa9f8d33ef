//! Static lookup tables: symptoms, synonyms, emergency vocabulary, meta-question phrases and
//! combination rules.
//!
//! The built-in tables are constructed once by the default analyzer. Hosts can ship their own
//! table as JSON; only `symptoms` is required there, the other sections fall back to the
//! built-ins (synonyms fall back to none, since they are tied to specific keys).

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::rules::{default_rules, CombinationRule};
use super::types::{Severity, SymptomRecord, TriageError};

/// Immutable classification tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Scan order for recognition. Order drives output order and tie-breaking.
    pub symptoms: Vec<SymptomRecord>,
    #[serde(default)]
    pub synonyms: HashMap<String, Vec<String>>,
    /// Keys whose synonyms alone are enough to flag an emergency.
    #[serde(default = "default_emergency_symptoms")]
    pub emergency_symptoms: Vec<String>,
    /// Clinical phrases that signal an emergency on sight.
    #[serde(default = "default_emergency_terms")]
    pub emergency_terms: Vec<String>,
    /// Bare markers such as the emergency number.
    #[serde(default = "default_emergency_markers")]
    pub emergency_markers: Vec<String>,
    /// Phrases that make a message a symptom question even with no symptom named.
    #[serde(default = "default_meta_phrases")]
    pub meta_phrases: Vec<String>,
    #[serde(default = "default_rules")]
    pub combination_rules: Vec<CombinationRule>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    /// The tables the engine ships with.
    pub fn builtin() -> Self {
        Self {
            symptoms: builtin_symptoms(),
            synonyms: builtin_synonyms(),
            emergency_symptoms: default_emergency_symptoms(),
            emergency_terms: default_emergency_terms(),
            emergency_markers: default_emergency_markers(),
            meta_phrases: default_meta_phrases(),
            combination_rules: default_rules(),
        }
    }

    /// Parse, normalize and validate a JSON knowledge base.
    pub fn from_json(json: &str) -> Result<Self, TriageError> {
        let kb: KnowledgeBase = serde_json::from_str(json)?;
        kb.normalized()
    }

    pub fn from_path(path: &Path) -> Result<Self, TriageError> {
        let json = std::fs::read_to_string(path)?;
        let kb = Self::from_json(&json)?;
        tracing::info!(
            symptoms = kb.symptoms.len(),
            rules = kb.combination_rules.len(),
            "Loaded knowledge base from file"
        );
        Ok(kb)
    }

    /// Lowercase and trim every phrase, then check the invariants matching relies on.
    pub fn normalized(mut self) -> Result<Self, TriageError> {
        for record in &mut self.symptoms {
            record.key = normalize_phrase(&record.key);
        }
        self.synonyms = self
            .synonyms
            .into_iter()
            .map(|(key, phrases)| {
                let phrases = phrases.iter().map(|p| normalize_phrase(p)).collect();
                (normalize_phrase(&key), phrases)
            })
            .collect();
        normalize_all(&mut self.emergency_symptoms);
        normalize_all(&mut self.emergency_terms);
        normalize_all(&mut self.emergency_markers);
        normalize_all(&mut self.meta_phrases);
        for rule in &mut self.combination_rules {
            rule.predicate.normalize();
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), TriageError> {
        let mut seen = HashSet::new();
        for record in &self.symptoms {
            if record.key.is_empty() {
                return Err(empty("symptoms"));
            }
            if !seen.insert(record.key.as_str()) {
                return Err(TriageError::DuplicateSymptom(record.key.clone()));
            }
        }

        for (key, phrases) in &self.synonyms {
            if !seen.contains(key.as_str()) {
                return Err(TriageError::UnknownSynonymKey(key.clone()));
            }
            if phrases.iter().any(String::is_empty) {
                return Err(empty(&format!("synonyms.{key}")));
            }
        }

        for (section, phrases) in [
            ("emergency_symptoms", &self.emergency_symptoms),
            ("emergency_terms", &self.emergency_terms),
            ("emergency_markers", &self.emergency_markers),
            ("meta_phrases", &self.meta_phrases),
        ] {
            if phrases.iter().any(String::is_empty) {
                return Err(empty(section));
            }
        }

        if let Some(rule) = self
            .combination_rules
            .iter()
            .find(|r| r.predicate.has_empty_leaf())
        {
            return Err(empty(&format!("combination_rules.{}", rule.id)));
        }

        Ok(())
    }

    pub fn synonyms_for(&self, key: &str) -> &[String] {
        self.synonyms.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn record(&self, key: &str) -> Option<&SymptomRecord> {
        self.symptoms.iter().find(|r| r.key == key)
    }

    pub fn is_emergency_symptom(&self, key: &str) -> bool {
        self.emergency_symptoms.iter().any(|k| k == key)
    }
}

fn normalize_phrase(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

fn normalize_all(phrases: &mut [String]) {
    for p in phrases.iter_mut() {
        *p = normalize_phrase(p);
    }
}

fn empty(section: &str) -> TriageError {
    TriageError::EmptyPhrase {
        section: section.to_string(),
    }
}

// ── Built-in tables ─────────────────────────────────────────

fn record(
    key: &str,
    conditions: &[&str],
    severity: Severity,
    advice: &str,
    emergency_sign: bool,
) -> SymptomRecord {
    SymptomRecord {
        key: key.to_string(),
        possible_conditions: conditions.iter().map(|c| c.to_string()).collect(),
        severity,
        follow_up_advice: advice.to_string(),
        emergency_sign,
    }
}

fn builtin_symptoms() -> Vec<SymptomRecord> {
    use Severity::*;

    vec![
        record(
            "headache",
            &["Tension headache", "Migraine", "Dehydration", "Sinusitis", "High blood pressure"],
            Mild,
            "Rest in a quiet, dark room, drink plenty of water, and see a doctor if the headache is sudden, severe, or keeps coming back.",
            false,
        ),
        record(
            "fever",
            &["Common cold", "Influenza", "Viral infection", "Dengue fever", "Typhoid"],
            Moderate,
            "Drink plenty of fluids and rest. See a doctor if the fever lasts more than 3 days or goes above 103°F (39.4°C).",
            false,
        ),
        record(
            "cough",
            &["Common cold", "Influenza", "Bronchitis", "Asthma", "Tuberculosis"],
            Mild,
            "Stay hydrated and avoid smoke and dust. See a doctor if the cough lasts more than 2 weeks or you cough up blood.",
            false,
        ),
        record(
            "sore throat",
            &["Common cold", "Strep throat", "Tonsillitis", "Influenza"],
            Mild,
            "Gargle with warm salt water and drink warm fluids. See a doctor if it lasts more than a week or swallowing becomes very difficult.",
            false,
        ),
        record(
            "fatigue",
            &["Anemia", "Sleep deprivation", "Depression", "Hypothyroidism", "Diabetes"],
            Mild,
            "Keep a regular sleep schedule and a balanced diet. See a doctor if tiredness lasts more than two weeks.",
            false,
        ),
        record(
            "dizziness",
            &["Vertigo", "Dehydration", "Low blood pressure", "Inner ear infection", "Anemia"],
            Mild,
            "Sit or lie down until it passes and drink water. See a doctor if dizziness is frequent or comes with fainting.",
            false,
        ),
        record(
            "nausea",
            &["Gastroenteritis", "Food poisoning", "Migraine", "Pregnancy", "Motion sickness"],
            Mild,
            "Eat small, bland meals and sip clear fluids. See a doctor if you cannot keep fluids down for a day.",
            false,
        ),
        record(
            "vomiting",
            &["Gastroenteritis", "Food poisoning", "Migraine", "Appendicitis"],
            Moderate,
            "Sip oral rehydration solution (ORS) in small amounts. See a doctor if vomiting lasts more than 24 hours or there is blood.",
            false,
        ),
        record(
            "diarrhea",
            &["Gastroenteritis", "Food poisoning", "Cholera", "Irritable bowel syndrome"],
            Moderate,
            "Drink oral rehydration solution (ORS) to replace lost fluids. See a doctor if it lasts more than 2 days or you notice blood.",
            false,
        ),
        record(
            "abdominal pain",
            &["Gastroenteritis", "Appendicitis", "Peptic ulcer", "Gallstones", "Irritable bowel syndrome"],
            Moderate,
            "Avoid heavy or spicy food. See a doctor urgently if the pain is severe, sharp on the lower right side, or comes with fever.",
            false,
        ),
        record(
            "back pain",
            &["Muscle strain", "Herniated disc", "Kidney stones", "Poor posture"],
            Mild,
            "Stay gently active and use a warm compress. See a doctor if the pain spreads down your legs or lasts more than a few weeks.",
            false,
        ),
        record(
            "joint pain",
            &["Arthritis", "Gout", "Chikungunya", "Injury"],
            Mild,
            "Rest the joint and apply ice to reduce swelling. See a doctor if the joint is red, hot, or you cannot move it.",
            false,
        ),
        record(
            "rash",
            &["Allergic reaction", "Eczema", "Contact dermatitis", "Viral infection"],
            Mild,
            "Avoid scratching and new soaps or creams. See a doctor if the rash spreads quickly or comes with fever.",
            false,
        ),
        record(
            "anxiety",
            &["Generalized anxiety disorder", "Panic disorder", "Stress", "Hyperthyroidism"],
            Moderate,
            "Try slow breathing and talk to someone you trust. A doctor or counsellor can help if anxiety affects your daily life.",
            false,
        ),
        record(
            "insomnia",
            &["Stress", "Anxiety disorder", "Depression", "Sleep apnea"],
            Mild,
            "Keep a fixed bedtime and avoid screens and caffeine in the evening. See a doctor if poor sleep lasts more than a month.",
            false,
        ),
        record(
            "numbness",
            &["Peripheral neuropathy", "Pinched nerve", "Stroke", "Vitamin B12 deficiency"],
            Moderate,
            "Note when and where it happens. Get help immediately if it is sudden or affects one side of the body.",
            false,
        ),
        record(
            "chest pain",
            &["Heart attack", "Angina", "Pulmonary embolism", "Acid reflux", "Costochondritis"],
            Severe,
            "Chest pain can be a sign of a heart problem and needs urgent medical evaluation.",
            true,
        ),
        record(
            "shortness of breath",
            &["Asthma", "Pneumonia", "Heart failure", "Pulmonary embolism", "Anxiety attack"],
            Severe,
            "Difficulty breathing needs prompt medical attention, especially if it came on suddenly.",
            true,
        ),
        record(
            "confusion",
            &["Stroke", "Low blood sugar", "Severe infection", "Dehydration", "Head injury"],
            Severe,
            "Sudden confusion needs emergency medical assessment.",
            true,
        ),
        record(
            "severe bleeding",
            &["Trauma", "Bleeding disorder", "Internal bleeding"],
            Severe,
            "Apply firm pressure to the wound with a clean cloth and get emergency help.",
            true,
        ),
        record(
            "loss of consciousness",
            &["Fainting (syncope)", "Heart rhythm problem", "Low blood sugar", "Seizure"],
            Severe,
            "Anyone who has lost consciousness should be checked by a doctor straight away.",
            true,
        ),
        record(
            "seizure",
            &["Epilepsy", "Febrile seizure", "Head injury", "Low blood sugar"],
            Severe,
            "Keep the person safe on their side, do not put anything in their mouth, and get emergency help.",
            true,
        ),
    ]
}

fn builtin_synonyms() -> HashMap<String, Vec<String>> {
    let table: &[(&str, &[&str])] = &[
        ("headache", &["head pain", "head ache", "head hurts", "migraine", "pounding head"]),
        ("fever", &["high temperature", "feverish", "running a temperature", "burning up"]),
        ("cough", &["coughing", "dry cough", "wet cough"]),
        ("sore throat", &["throat pain", "throat hurts", "scratchy throat", "painful swallowing"]),
        ("fatigue", &["tired", "exhausted", "no energy", "low energy", "lethargic"]),
        ("dizziness", &["dizzy", "lightheaded", "light-headed", "light headed", "room spinning"]),
        ("nausea", &["nauseous", "queasy", "feel sick", "want to vomit"]),
        ("vomiting", &["throwing up", "threw up", "vomit", "puking"]),
        ("diarrhea", &["diarrhoea", "loose motion", "loose stool", "watery stool"]),
        ("abdominal pain", &["stomach ache", "stomach pain", "belly pain", "tummy ache", "stomach cramps"]),
        ("back pain", &["backache", "back ache", "back hurts", "lower back"]),
        ("joint pain", &["aching joints", "joint ache", "swollen joint", "joints hurt"]),
        ("rash", &["hives", "itchy skin", "red spots", "skin irritation"]),
        ("anxiety", &["anxious", "panic attack", "nervous", "constant worry"]),
        ("insomnia", &["can't sleep", "cannot sleep", "trouble sleeping", "sleepless"]),
        ("numbness", &["feels numb", "went numb", "gone numb", "tingling", "pins and needles"]),
        ("chest pain", &["chest tightness", "tight chest", "chest pressure", "pain in my chest", "chest hurts"]),
        (
            "shortness of breath",
            &[
                "short of breath",
                "difficulty breathing",
                "trouble breathing",
                "hard to breathe",
                "can't breathe",
                "cannot breathe",
                "breathless",
                "out of breath",
            ],
        ),
        ("confusion", &["confused", "disoriented", "can't think straight"]),
        ("severe bleeding", &["bleeding heavily", "heavy bleeding", "won't stop bleeding", "lots of blood"]),
        ("loss of consciousness", &["fainted", "passed out", "blacked out", "unconscious"]),
        ("seizure", &["convulsion", "convulsing", "having a fit", "epileptic fit"]),
    ];

    table
        .iter()
        .map(|(key, phrases)| {
            (
                key.to_string(),
                phrases.iter().map(|p| p.to_string()).collect(),
            )
        })
        .collect()
}

fn strings(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}

fn default_emergency_symptoms() -> Vec<String> {
    strings(&[
        "chest pain",
        "shortness of breath",
        "severe bleeding",
        "loss of consciousness",
        "seizure",
        "confusion",
    ])
}

fn default_emergency_terms() -> Vec<String> {
    strings(&[
        "heart attack",
        "stroke",
        "not breathing",
        "stopped breathing",
        "can't breathe",
        "cannot breathe",
        "choking",
        "unconscious",
        "unresponsive",
        "severe bleeding",
        "bleeding heavily",
        "coughing up blood",
        "vomiting blood",
        "suicidal",
        "suicide",
        "kill myself",
        "overdose",
        "swallowed poison",
        "anaphylaxis",
        "anaphylactic",
        "seizure",
        "snake bite",
        "snakebite",
    ])
}

fn default_emergency_markers() -> Vec<String> {
    strings(&["999"])
}

fn default_meta_phrases() -> Vec<String> {
    strings(&[
        "what could be causing",
        "what is causing",
        "should i see a doctor",
        "do i need a doctor",
        "is this serious",
        "is it serious",
        "what does it mean if",
        "why do i feel",
        "why am i feeling",
        "is it normal to",
        "what should i do about",
        "symptom",
    ])
}
