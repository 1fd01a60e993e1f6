//! Feature normalizer: turns raw extracted fields into bounded, comparable magnitudes.
//!
//! Every function here is pure and total. Empty input yields a zero or neutral value.

use std::collections::BTreeSet;

use crate::scoring::features::JobProfile;
use crate::scoring::ontology::SkillOntology;

/// Score handed back when an input is malformed rather than merely empty.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Skill count that maps to a full score when no job profile is given.
pub const SKILL_COUNT_CEILING: f64 = 15.0;

/// Years at which the experience curve reaches its plateau.
pub const EXPERIENCE_PLATEAU_YEARS: f64 = 10.0;
/// Score for zero years of experience.
pub const EXPERIENCE_FLOOR: f64 = 10.0;
const EXPERIENCE_RATE: f64 = 0.3;

pub const REQUIRED_SECTIONS: &[&str] = &["contact", "summary", "experience", "education", "skills"];

const SECTION_ALIASES: &[(&str, &[&str])] = &[
    ("contact", &["contact", "contact information", "contact info", "personal details"]),
    (
        "summary",
        &["summary", "professional summary", "objective", "profile", "about me", "career objective"],
    ),
    (
        "experience",
        &[
            "experience",
            "work experience",
            "professional experience",
            "work history",
            "employment",
            "employment history",
        ],
    ),
    ("education", &["education", "academic background", "qualifications"]),
    ("skills", &["skills", "technical skills", "core competencies", "key skills"]),
];

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "i", "in",
    "is", "it", "my", "of", "on", "or", "our", "that", "the", "this", "to", "was", "we", "were",
    "with", "will", "you", "your",
];

/// Partial credit for a substring match between a skill and a requirement.
const PARTIAL_MATCH_CREDIT: f64 = 0.5;

/// Weighted share of required skills covered by the resume, in [0, 1].
///
/// Exact canonical matches count 1.0; substring matches either way count 0.5.
/// Returns 0 when there is no profile or it names no skills, explicitly or in its
/// description.
pub fn skill_overlap_ratio(
    skills: &[String],
    profile: Option<&JobProfile>,
    ontology: &SkillOntology,
) -> f64 {
    let Some(profile) = profile else {
        return 0.0;
    };
    let required: Vec<String> = profile
        .target_skills(ontology)
        .iter()
        .map(|s| ontology.canonical(s))
        .filter(|s| !s.is_empty())
        .collect();
    if required.is_empty() {
        return 0.0;
    }

    let have: BTreeSet<String> = skills
        .iter()
        .map(|s| ontology.canonical(s))
        .filter(|s| !s.is_empty())
        .collect();

    let credit: f64 = required
        .iter()
        .map(|req| {
            if have.contains(req) {
                1.0
            } else if have
                .iter()
                .any(|h| h.contains(req.as_str()) || req.contains(h.as_str()))
            {
                PARTIAL_MATCH_CREDIT
            } else {
                0.0
            }
        })
        .sum();

    (credit / required.len().max(1) as f64).clamp(0.0, 1.0)
}

/// Absolute skill-count scale used when no job profile is available.
pub fn skill_count_scale(count: usize) -> f64 {
    ((count as f64 / SKILL_COUNT_CEILING).min(1.0) * 100.0).clamp(0.0, 100.0)
}

/// Saturating experience curve.
///
/// Rises quickly, reaches 100 at [`EXPERIENCE_PLATEAU_YEARS`] and stays flat after.
/// Over-experience is never penalised.
pub fn experience_curve(years: f64) -> f64 {
    if !years.is_finite() || years < 0.0 {
        return NEUTRAL_SCORE;
    }
    if years >= EXPERIENCE_PLATEAU_YEARS {
        return 100.0;
    }
    let saturation = (1.0 - (-EXPERIENCE_RATE * years).exp())
        / (1.0 - (-EXPERIENCE_RATE * EXPERIENCE_PLATEAU_YEARS).exp());
    (EXPERIENCE_FLOOR + (100.0 - EXPERIENCE_FLOOR) * saturation).clamp(0.0, 100.0)
}

/// Maps a raw section heading to one of [`REQUIRED_SECTIONS`], if it is an alias of one.
pub fn canonical_section(heading: &str) -> Option<&'static str> {
    let needle = heading
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_lowercase();
    SECTION_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&needle.as_str()))
        .map(|(canonical, _)| *canonical)
}

/// Share of required sections present, scaled to 0-100.
pub fn section_completeness(sections: &BTreeSet<String>) -> f64 {
    let present: BTreeSet<&str> = sections
        .iter()
        .filter_map(|s| canonical_section(s))
        .collect();
    let found = REQUIRED_SECTIONS
        .iter()
        .filter(|s| present.contains(*s))
        .count();
    found as f64 / REQUIRED_SECTIONS.len() as f64 * 100.0
}

/// True when the given canonical section is among the detected ones.
pub fn has_section(sections: &BTreeSet<String>, canonical: &str) -> bool {
    sections
        .iter()
        .any(|s| canonical_section(s) == Some(canonical))
}

/// Lowercase content tokens of `text`, without stopwords or PII mask tokens.
///
/// Keeps `+`, `#` and inner `.` so "c++", "c#" and "node.js" survive.
pub fn meaningful_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '(' | ')' | '/' | '|'))
        .filter(|raw| !(raw.starts_with('[') && raw.ends_with(']')))
        .map(|raw| {
            raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .filter(|t| t.chars().any(|c| c.is_alphanumeric()))
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Number of whitespace-separated words, used for length heuristics.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Replaces non-finite values with the neutral score and clamps to 0-100.
pub fn bounded(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        NEUTRAL_SCORE
    }
}
