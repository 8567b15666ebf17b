//! Keyword and ordinal sub-scores. Matching is case-insensitive and every
//! function falls back to its lowest tier instead of failing.

const DEGREE_TIERS: &[(f64, &[&str])] = &[
    (1.0, &["doctorado", "ph.d.", "ia"]),
    (0.8, &["maestría", "master"]),
    (
        0.6,
        &["lic.", "ing.", "matemáticas", "computación", "ciencias de datos"],
    ),
];
const DEGREE_FLOOR: f64 = 0.3;

const CERTIFICATION_KEYWORDS: &[&str] = &[
    "ml",
    "ai",
    "data",
    "cloud",
    "aws",
    "azure",
    "gcp",
    "cert",
    "specialty",
    "recomendación",
];
const CERTIFICATION_CREDIT: f64 = 0.5;

const LANGUAGE_LEVELS: &[(&str, f64)] = &[
    ("a1", 0.1),
    ("a2", 0.2),
    ("b1", 0.4),
    ("b2", 0.6),
    ("c1", 0.8),
    ("c2", 1.0),
];

pub fn degree_score(title: &str) -> f64 {
    let title = title.to_lowercase();
    DEGREE_TIERS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| title.contains(keyword)))
        .map(|(score, _)| *score)
        .unwrap_or(DEGREE_FLOOR)
}

pub fn certification_score<S: AsRef<str>>(certifications: &[S]) -> f64 {
    let total: f64 = certifications
        .iter()
        .take(2)
        .map(|certification| certification.as_ref().to_lowercase())
        .filter(|certification| {
            CERTIFICATION_KEYWORDS
                .iter()
                .any(|keyword| certification.contains(keyword))
        })
        .map(|_| CERTIFICATION_CREDIT)
        .sum();
    total.min(1.0)
}

pub fn language_level(code: &str) -> f64 {
    let code = code.trim().to_lowercase();
    LANGUAGE_LEVELS
        .iter()
        .find(|(level, _)| *level == code)
        .map(|(_, score)| *score)
        .unwrap_or(0.0)
}

/// Average over both slots; an empty second slot counts as zero.
pub fn language_score<S: AsRef<str>>(levels: &[S; 2]) -> f64 {
    (language_level(levels[0].as_ref()) + language_level(levels[1].as_ref())) / 2.0
}
