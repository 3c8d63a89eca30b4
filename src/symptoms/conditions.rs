//! Condition lookup
//!
//! A small reference table linking common health concerns to the symptoms
//! usually reported with them. Used to pre-select symptoms from a search box;
//! it never feeds the risk score directly.

use super::catalog;
use serde::Serialize;

/// Minimum trimmed query length for a search
const MIN_QUERY_LEN: usize = 2;

/// Number of entries shown before the user searches
const FEATURED_COUNT: usize = 6;

/// A health concern and its associated symptoms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub related_symptoms: &'static [&'static str],
    pub preventive_guidance: &'static [&'static str],
}

pub const CONDITIONS: &[Condition] = &[
    Condition {
        id: "diabetes",
        name: "Diabetes Indicators",
        category: "Metabolic",
        description: "Symptoms commonly associated with blood sugar regulation issues",
        related_symptoms: &["excessive_thirst", "frequent_urination", "fatigue", "weight_change", "blurred_vision", "low_energy"],
        preventive_guidance: &["Monitor blood sugar levels regularly", "Maintain a balanced diet low in processed sugars", "Exercise regularly for at least 30 minutes daily"],
    },
    Condition {
        id: "thyroid_disorder",
        name: "Thyroid Concerns",
        category: "Metabolic",
        description: "Symptoms that may relate to thyroid function",
        related_symptoms: &["fatigue", "weight_change", "weight_loss", "weight_gain", "mood_swings", "muscle_pain", "dry_skin", "low_energy"],
        preventive_guidance: &["Get thyroid function tested periodically", "Ensure adequate iodine in diet", "Monitor energy levels and weight changes"],
    },
    Condition {
        id: "hypertension",
        name: "Hypertension Signs",
        category: "Cardiovascular",
        description: "Symptoms commonly linked to high blood pressure",
        related_symptoms: &["headache", "dizziness", "chest_pain", "shortness_breath", "high_bp_symptoms", "blurred_vision", "palpitations"],
        preventive_guidance: &["Reduce sodium intake", "Exercise regularly", "Monitor blood pressure at home", "Manage stress levels"],
    },
    Condition {
        id: "heart_disease",
        name: "Cardiac Concerns",
        category: "Cardiovascular",
        description: "Symptoms that may indicate cardiovascular issues",
        related_symptoms: &["chest_pain", "shortness_breath", "palpitations", "irregular_heartbeat", "rapid_heartbeat", "swollen_legs", "fatigue", "dizziness"],
        preventive_guidance: &["Maintain heart-healthy diet", "Regular cardiovascular exercise", "Avoid smoking and excessive alcohol", "Monitor cholesterol levels"],
    },
    Condition {
        id: "asthma",
        name: "Asthma Indicators",
        category: "Respiratory",
        description: "Symptoms commonly associated with asthma",
        related_symptoms: &["wheezing", "shortness_breath", "chest_tightness", "cough", "breathlessness"],
        preventive_guidance: &["Avoid known triggers", "Keep an inhaler accessible", "Practice breathing exercises", "Monitor air quality"],
    },
    Condition {
        id: "bronchitis",
        name: "Bronchitis Signs",
        category: "Respiratory",
        description: "Symptoms related to bronchial inflammation",
        related_symptoms: &["cough", "productive_cough", "chest_tightness", "fatigue", "sore_throat", "wheezing"],
        preventive_guidance: &["Stay hydrated", "Avoid irritants and pollutants", "Rest adequately", "Use a humidifier"],
    },
    Condition {
        id: "common_cold_flu",
        name: "Cold & Flu",
        category: "Respiratory",
        description: "Symptoms of common cold and influenza",
        related_symptoms: &["fever", "cough", "sore_throat", "runny_nose", "nasal_congestion", "sneezing", "body_pain", "fatigue", "chills", "headache"],
        preventive_guidance: &["Wash hands frequently", "Get adequate rest", "Stay hydrated", "Consider flu vaccination"],
    },
    Condition {
        id: "migraine_disorder",
        name: "Migraine Pattern",
        category: "Neurological",
        description: "Symptoms associated with migraine episodes",
        related_symptoms: &["migraine", "headache", "nausea", "light_sensitivity", "blurred_vision", "dizziness", "vertigo"],
        preventive_guidance: &["Identify and avoid triggers", "Maintain regular sleep schedule", "Stay hydrated", "Practice relaxation techniques"],
    },
    Condition {
        id: "anxiety_disorder",
        name: "Anxiety Pattern",
        category: "Mental Health",
        description: "Symptoms commonly associated with anxiety disorders",
        related_symptoms: &["anxiety", "panic_attacks", "social_anxiety", "restlessness", "insomnia", "palpitations", "shortness_breath", "stress", "poor_concentration"],
        preventive_guidance: &["Practice mindfulness meditation", "Regular physical exercise", "Limit caffeine intake", "Consider professional counseling"],
    },
    Condition {
        id: "depression_pattern",
        name: "Depression Indicators",
        category: "Mental Health",
        description: "Symptoms that may indicate depressive episodes",
        related_symptoms: &["depression", "low_motivation", "insomnia", "fatigue", "appetite_loss", "poor_concentration", "mood_swings", "irritability"],
        preventive_guidance: &["Stay physically active", "Maintain social connections", "Seek professional support", "Establish daily routines"],
    },
    Condition {
        id: "gastritis",
        name: "Gastritis Signs",
        category: "Digestive",
        description: "Symptoms of stomach lining inflammation",
        related_symptoms: &["stomach_pain", "nausea", "acidity", "bloating", "vomiting", "appetite_loss", "indigestion"],
        preventive_guidance: &["Eat smaller, frequent meals", "Avoid spicy and acidic foods", "Reduce alcohol consumption", "Manage stress"],
    },
    Condition {
        id: "ibs",
        name: "IBS Indicators",
        category: "Digestive",
        description: "Symptoms commonly associated with irritable bowel syndrome",
        related_symptoms: &["stomach_pain", "bloating", "diarrhea", "constipation", "gas", "abdominal_cramps", "nausea"],
        preventive_guidance: &["Identify trigger foods", "Eat high-fiber diet", "Stay hydrated", "Manage stress levels"],
    },
    Condition {
        id: "arthritis",
        name: "Arthritis Indicators",
        category: "Musculoskeletal",
        description: "Symptoms associated with joint inflammation",
        related_symptoms: &["joint_pain", "stiffness", "knee_pain", "shoulder_pain", "muscle_pain", "weakness", "fatigue"],
        preventive_guidance: &["Maintain healthy weight", "Stay physically active", "Apply warm/cold therapy", "Consider anti-inflammatory diet"],
    },
    Condition {
        id: "back_issues",
        name: "Back Problems",
        category: "Musculoskeletal",
        description: "Symptoms related to back and spine issues",
        related_symptoms: &["back_pain", "neck_pain", "stiffness", "muscle_pain", "numbness", "muscle_cramps"],
        preventive_guidance: &["Practice good posture", "Strengthen core muscles", "Take regular breaks from sitting", "Use ergonomic furniture"],
    },
    Condition {
        id: "allergic_reaction",
        name: "Allergic Reactions",
        category: "Immunological",
        description: "Symptoms of allergic responses",
        related_symptoms: &["allergies", "skin_rash", "itching", "sneezing", "runny_nose", "nasal_congestion", "hay_fever", "food_sensitivity"],
        preventive_guidance: &["Identify and avoid allergens", "Keep antihistamines available", "Maintain clean living environment", "Consider allergy testing"],
    },
    Condition {
        id: "eczema_condition",
        name: "Eczema / Dermatitis",
        category: "Dermatological",
        description: "Symptoms of skin inflammation conditions",
        related_symptoms: &["eczema", "skin_rash", "itching", "dry_skin", "skin_discoloration"],
        preventive_guidance: &["Moisturize regularly", "Avoid harsh soaps and detergents", "Manage stress", "Wear breathable fabrics"],
    },
    Condition {
        id: "sleep_disorder",
        name: "Sleep Disorders",
        category: "Neurological",
        description: "Symptoms related to sleep disturbances",
        related_symptoms: &["insomnia", "poor_sleep_quality", "fatigue", "low_energy", "irritability", "poor_concentration", "headache", "brain_fog"],
        preventive_guidance: &["Maintain consistent sleep schedule", "Create dark, cool sleeping environment", "Limit screen time before bed", "Avoid caffeine after noon"],
    },
    Condition {
        id: "burnout",
        name: "Burnout Syndrome",
        category: "Mental Health",
        description: "Symptoms associated with chronic stress and burnout",
        related_symptoms: &["fatigue", "stress", "insomnia", "low_motivation", "irritability", "poor_concentration", "brain_fog", "headache", "appetite_loss"],
        preventive_guidance: &["Set healthy work-life boundaries", "Take regular breaks", "Practice self-care routines", "Seek support from colleagues and professionals"],
    },
    Condition {
        id: "eye_strain_syndrome",
        name: "Digital Eye Strain",
        category: "Sensory",
        description: "Symptoms from prolonged screen exposure",
        related_symptoms: &["eye_strain", "dry_eyes", "blurred_vision", "headache", "light_sensitivity", "neck_pain"],
        preventive_guidance: &["Follow 20-20-20 rule", "Adjust screen brightness", "Use blue light filters", "Take regular breaks from screens"],
    },
    Condition {
        id: "viral_infection",
        name: "Viral Infection Pattern",
        category: "Immunological",
        description: "Common viral infection symptoms",
        related_symptoms: &["fever", "fatigue", "body_pain", "chills", "cough", "sore_throat", "headache", "appetite_loss", "weakness"],
        preventive_guidance: &["Rest and stay hydrated", "Practice good hygiene", "Boost immunity with balanced diet", "Seek medical attention if symptoms worsen"],
    },
    Condition {
        id: "uti_pattern",
        name: "Urinary Tract Concerns",
        category: "Metabolic",
        description: "Symptoms that may indicate urinary issues",
        related_symptoms: &["frequent_urination", "fever", "fatigue", "stomach_pain", "chills"],
        preventive_guidance: &["Drink plenty of water", "Practice good hygiene", "Don't hold urine for long periods", "Seek medical evaluation"],
    },
    Condition {
        id: "anemia",
        name: "Anemia Indicators",
        category: "Metabolic",
        description: "Symptoms associated with low blood count",
        related_symptoms: &["fatigue", "weakness", "dizziness", "shortness_breath", "pale_skin", "rapid_heartbeat", "low_energy", "poor_concentration"],
        preventive_guidance: &["Eat iron-rich foods", "Include vitamin C to improve absorption", "Consider supplements if recommended", "Get regular blood tests"],
    },
];

/// Case-insensitive substring search over name, category, description and id
pub fn search(query: &str) -> Vec<&'static Condition> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }

    CONDITIONS
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle)
                || c.category.to_lowercase().contains(&needle)
                || c.description.to_lowercase().contains(&needle)
                || c.id.contains(&needle)
        })
        .collect()
}

/// Entries shown by default
pub fn featured() -> &'static [Condition] {
    &CONDITIONS[..FEATURED_COUNT.min(CONDITIONS.len())]
}

/// Find a condition by ID
pub fn find(id: &str) -> Option<&'static Condition> {
    CONDITIONS.iter().find(|c| c.id == id)
}

/// Related symptoms that exist in the symptom catalog
pub fn expand_symptoms(condition: &Condition) -> Vec<&'static str> {
    condition
        .related_symptoms
        .iter()
        .copied()
        .filter(|id| catalog::lookup(id).is_some())
        .collect()
}
