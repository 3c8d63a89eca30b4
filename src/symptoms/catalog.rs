//! Symptom catalog
//!
//! Static domain tables: the selectable symptoms with their display labels and
//! categories, the per-symptom severity weights, and the co-occurrence clusters
//! used to detect dangerous combinations.

use serde::Serialize;

/// Weight applied to symptoms missing from the severity table
pub const DEFAULT_SYMPTOM_WEIGHT: f64 = 0.3;

/// Body system a symptom belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymptomCategory {
    General,
    Cardiovascular,
    Respiratory,
    Neurological,
    Gastrointestinal,
    Musculoskeletal,
    Mental,
    Dermatological,
    Immunological,
    Metabolic,
    Sensory,
}

impl SymptomCategory {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            SymptomCategory::General => "General",
            SymptomCategory::Cardiovascular => "Cardiovascular",
            SymptomCategory::Respiratory => "Respiratory",
            SymptomCategory::Neurological => "Neurological",
            SymptomCategory::Gastrointestinal => "Digestive",
            SymptomCategory::Musculoskeletal => "Musculoskeletal",
            SymptomCategory::Mental => "Mental Health",
            SymptomCategory::Dermatological => "Skin",
            SymptomCategory::Immunological => "Immune",
            SymptomCategory::Metabolic => "Metabolic",
            SymptomCategory::Sensory => "Eyes & Ears",
        }
    }
}

/// A selectable symptom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymptomInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub category: SymptomCategory,
}

impl SymptomInfo {
    const fn new(id: &'static str, label: &'static str, category: SymptomCategory) -> Self {
        Self {
            id,
            label,
            category,
        }
    }
}

/// A named set of co-occurring symptoms
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SymptomCluster {
    pub symptoms: &'static [&'static str],
    pub label: &'static str,
    /// Severity when every member is present (0-1)
    pub severity: f64,
}

/// Every symptom a user can select
pub const SYMPTOMS: &[SymptomInfo] = &[
    SymptomInfo::new("fever", "Fever", SymptomCategory::General),
    SymptomInfo::new("fatigue", "Fatigue / Tiredness", SymptomCategory::General),
    SymptomInfo::new("weakness", "General Weakness", SymptomCategory::General),
    SymptomInfo::new("body_pain", "Body Pain", SymptomCategory::General),
    SymptomInfo::new("chills", "Chills", SymptomCategory::General),
    SymptomInfo::new("dizziness", "Dizziness", SymptomCategory::General),
    SymptomInfo::new("appetite_loss", "Loss of Appetite", SymptomCategory::General),
    SymptomInfo::new("night_sweats", "Night Sweats", SymptomCategory::General),
    SymptomInfo::new("malaise", "General Malaise", SymptomCategory::General),
    SymptomInfo::new("weight_loss", "Unexplained Weight Loss", SymptomCategory::General),
    SymptomInfo::new("weight_gain", "Unexplained Weight Gain", SymptomCategory::General),
    SymptomInfo::new("chest_pain", "Chest Pain", SymptomCategory::Cardiovascular),
    SymptomInfo::new("palpitations", "Heart Palpitations", SymptomCategory::Cardiovascular),
    SymptomInfo::new("shortness_breath", "Shortness of Breath", SymptomCategory::Cardiovascular),
    SymptomInfo::new("irregular_heartbeat", "Irregular Heartbeat", SymptomCategory::Cardiovascular),
    SymptomInfo::new("high_bp_symptoms", "High Blood Pressure Symptoms", SymptomCategory::Cardiovascular),
    SymptomInfo::new("swollen_legs", "Swollen Legs/Ankles", SymptomCategory::Cardiovascular),
    SymptomInfo::new("rapid_heartbeat", "Rapid Heartbeat", SymptomCategory::Cardiovascular),
    SymptomInfo::new("slow_heartbeat", "Slow Heartbeat", SymptomCategory::Cardiovascular),
    SymptomInfo::new("cough", "Cough", SymptomCategory::Respiratory),
    SymptomInfo::new("cold", "Common Cold", SymptomCategory::Respiratory),
    SymptomInfo::new("sore_throat", "Sore Throat", SymptomCategory::Respiratory),
    SymptomInfo::new("breathlessness", "Breathlessness", SymptomCategory::Respiratory),
    SymptomInfo::new("wheezing", "Wheezing", SymptomCategory::Respiratory),
    SymptomInfo::new("runny_nose", "Runny Nose", SymptomCategory::Respiratory),
    SymptomInfo::new("nasal_congestion", "Nasal Congestion", SymptomCategory::Respiratory),
    SymptomInfo::new("sneezing", "Frequent Sneezing", SymptomCategory::Respiratory),
    SymptomInfo::new("chest_tightness", "Chest Tightness", SymptomCategory::Respiratory),
    SymptomInfo::new("productive_cough", "Productive Cough (with Mucus)", SymptomCategory::Respiratory),
    SymptomInfo::new("headache", "Headache", SymptomCategory::Neurological),
    SymptomInfo::new("migraine", "Migraine", SymptomCategory::Neurological),
    SymptomInfo::new("anxiety", "Anxiety", SymptomCategory::Neurological),
    SymptomInfo::new("stress", "High Stress", SymptomCategory::Neurological),
    SymptomInfo::new("poor_concentration", "Poor Concentration", SymptomCategory::Neurological),
    SymptomInfo::new("insomnia", "Insomnia / Sleep Issues", SymptomCategory::Neurological),
    SymptomInfo::new("memory_issues", "Memory Problems", SymptomCategory::Neurological),
    SymptomInfo::new("brain_fog", "Brain Fog", SymptomCategory::Neurological),
    SymptomInfo::new("numbness", "Numbness/Tingling", SymptomCategory::Neurological),
    SymptomInfo::new("tremors", "Tremors", SymptomCategory::Neurological),
    SymptomInfo::new("vertigo", "Vertigo", SymptomCategory::Neurological),
    SymptomInfo::new("stomach_pain", "Stomach Pain", SymptomCategory::Gastrointestinal),
    SymptomInfo::new("nausea", "Nausea", SymptomCategory::Gastrointestinal),
    SymptomInfo::new("diarrhea", "Diarrhea", SymptomCategory::Gastrointestinal),
    SymptomInfo::new("constipation", "Constipation", SymptomCategory::Gastrointestinal),
    SymptomInfo::new("acidity", "Acidity / Heartburn", SymptomCategory::Gastrointestinal),
    SymptomInfo::new("bloating", "Bloating", SymptomCategory::Gastrointestinal),
    SymptomInfo::new("vomiting", "Vomiting", SymptomCategory::Gastrointestinal),
    SymptomInfo::new("indigestion", "Indigestion", SymptomCategory::Gastrointestinal),
    SymptomInfo::new("abdominal_cramps", "Abdominal Cramps", SymptomCategory::Gastrointestinal),
    SymptomInfo::new("gas", "Excessive Gas", SymptomCategory::Gastrointestinal),
    SymptomInfo::new("muscle_pain", "Muscle Pain", SymptomCategory::Musculoskeletal),
    SymptomInfo::new("joint_pain", "Joint Pain", SymptomCategory::Musculoskeletal),
    SymptomInfo::new("muscle_cramps", "Muscle Cramps", SymptomCategory::Musculoskeletal),
    SymptomInfo::new("back_pain", "Back Pain", SymptomCategory::Musculoskeletal),
    SymptomInfo::new("neck_pain", "Neck Pain", SymptomCategory::Musculoskeletal),
    SymptomInfo::new("stiffness", "Muscle Stiffness", SymptomCategory::Musculoskeletal),
    SymptomInfo::new("shoulder_pain", "Shoulder Pain", SymptomCategory::Musculoskeletal),
    SymptomInfo::new("knee_pain", "Knee Pain", SymptomCategory::Musculoskeletal),
    SymptomInfo::new("depression", "Low Mood / Depression", SymptomCategory::Mental),
    SymptomInfo::new("mood_swings", "Mood Swings", SymptomCategory::Mental),
    SymptomInfo::new("irritability", "Irritability", SymptomCategory::Mental),
    SymptomInfo::new("panic_attacks", "Panic Attacks", SymptomCategory::Mental),
    SymptomInfo::new("social_anxiety", "Social Anxiety", SymptomCategory::Mental),
    SymptomInfo::new("restlessness", "Restlessness", SymptomCategory::Mental),
    SymptomInfo::new("low_motivation", "Low Motivation", SymptomCategory::Mental),
    SymptomInfo::new("skin_rash", "Skin Rash", SymptomCategory::Dermatological),
    SymptomInfo::new("itching", "Itching", SymptomCategory::Dermatological),
    SymptomInfo::new("dry_skin", "Dry Skin", SymptomCategory::Dermatological),
    SymptomInfo::new("acne", "Acne", SymptomCategory::Dermatological),
    SymptomInfo::new("eczema", "Eczema Symptoms", SymptomCategory::Dermatological),
    SymptomInfo::new("skin_discoloration", "Skin Discoloration", SymptomCategory::Dermatological),
    SymptomInfo::new("allergies", "Allergies", SymptomCategory::Immunological),
    SymptomInfo::new("frequent_infections", "Frequent Infections", SymptomCategory::Immunological),
    SymptomInfo::new("hay_fever", "Hay Fever", SymptomCategory::Immunological),
    SymptomInfo::new("food_sensitivity", "Food Sensitivity", SymptomCategory::Immunological),
    SymptomInfo::new("weight_change", "Unexplained Weight Change", SymptomCategory::Metabolic),
    SymptomInfo::new("low_energy", "Low Energy Levels", SymptomCategory::Metabolic),
    SymptomInfo::new("dehydration", "Dehydration Signs", SymptomCategory::Metabolic),
    SymptomInfo::new("poor_sleep_quality", "Poor Sleep Quality", SymptomCategory::Metabolic),
    SymptomInfo::new("excessive_thirst", "Excessive Thirst", SymptomCategory::Metabolic),
    SymptomInfo::new("frequent_urination", "Frequent Urination", SymptomCategory::Metabolic),
    SymptomInfo::new("sugar_cravings", "Sugar Cravings", SymptomCategory::Metabolic),
    SymptomInfo::new("eye_strain", "Eye Strain", SymptomCategory::Sensory),
    SymptomInfo::new("blurred_vision", "Blurred Vision", SymptomCategory::Sensory),
    SymptomInfo::new("dry_eyes", "Dry Eyes", SymptomCategory::Sensory),
    SymptomInfo::new("light_sensitivity", "Light Sensitivity", SymptomCategory::Sensory),
    SymptomInfo::new("ear_pain", "Ear Pain", SymptomCategory::Sensory),
    SymptomInfo::new("tinnitus", "Ringing in Ears (Tinnitus)", SymptomCategory::Sensory),
    SymptomInfo::new("hearing_issues", "Hearing Issues", SymptomCategory::Sensory),
];

/// Severity weights (0-1); symptoms absent here use [`DEFAULT_SYMPTOM_WEIGHT`]
pub const SYMPTOM_WEIGHTS: &[(&str, f64)] = &[
    ("chest_pain", 0.9),
    ("shortness_breath", 0.85),
    ("palpitations", 0.75),
    ("dizziness", 0.6),
    ("fever", 0.5),
    ("headache", 0.4),
    ("fatigue", 0.35),
    ("nausea", 0.45),
    ("stomach_pain", 0.5),
    ("muscle_pain", 0.3),
    ("joint_pain", 0.35),
    ("cough", 0.4),
    ("sore_throat", 0.3),
    ("insomnia", 0.35),
    ("anxiety", 0.45),
    ("depression", 0.55),
    ("stress", 0.4),
    ("skin_rash", 0.35),
    ("allergies", 0.25),
    ("diarrhea", 0.4),
    ("weight_change", 0.5),
    ("appetite_loss", 0.45),
];

/// Co-occurrence patterns, checked in order
pub const SYMPTOM_CLUSTERS: &[SymptomCluster] = &[
    SymptomCluster {
        symptoms: &["fever", "cough", "sore_throat", "fatigue"],
        label: "viral infection pattern",
        severity: 0.6,
    },
    SymptomCluster {
        symptoms: &["chest_pain", "shortness_breath", "palpitations"],
        label: "cardiovascular concern",
        severity: 0.95,
    },
    SymptomCluster {
        symptoms: &["headache", "dizziness", "fatigue"],
        label: "neurological/exhaustion pattern",
        severity: 0.5,
    },
    SymptomCluster {
        symptoms: &["nausea", "stomach_pain", "diarrhea"],
        label: "gastrointestinal distress",
        severity: 0.55,
    },
    SymptomCluster {
        symptoms: &["anxiety", "stress", "insomnia"],
        label: "stress-related pattern",
        severity: 0.5,
    },
    SymptomCluster {
        symptoms: &["muscle_pain", "joint_pain", "fatigue"],
        label: "musculoskeletal/systemic pattern",
        severity: 0.45,
    },
    SymptomCluster {
        symptoms: &["depression", "appetite_loss", "insomnia", "fatigue"],
        label: "mental health pattern",
        severity: 0.7,
    },
];

/// Look up a symptom by ID
pub fn lookup(id: &str) -> Option<&'static SymptomInfo> {
    SYMPTOMS.iter().find(|s| s.id == id)
}

/// Category of a symptom, if it is in the catalog
pub fn category_of(id: &str) -> Option<SymptomCategory> {
    lookup(id).map(|s| s.category)
}

/// Severity weight of a symptom, falling back to the default for unknown IDs
pub fn weight_of(id: &str) -> f64 {
    SYMPTOM_WEIGHTS
        .iter()
        .find(|(symptom, _)| *symptom == id)
        .map(|(_, weight)| *weight)
        .unwrap_or(DEFAULT_SYMPTOM_WEIGHT)
}

/// Human-readable name derived from an ID: `sore_throat` → `Sore Throat`
pub fn display_name(id: &str) -> String {
    id.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
