//! The six component scorers.
//!
//! Each is a pure function of the features, an optional job profile and the scoring
//! configuration, returning a finite score in [0, 100].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scoring::features::{DegreeLevel, JobProfile, ResumeFeatures, WorkEntry};
use crate::scoring::normalize::{
    bounded, experience_curve, has_section, meaningful_tokens, section_completeness,
    skill_count_scale, skill_overlap_ratio, word_count, EXPERIENCE_FLOOR, NEUTRAL_SCORE,
};
use crate::scoring::ontology::SkillOntology;
use crate::scoring::weights::ComponentWeights;
use crate::scoring::ScoringConfig;

/// The six named component scores of one analysis, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScoreSet {
    pub skill_match: f64,
    pub experience: f64,
    pub education: f64,
    pub format: f64,
    pub keyword_density: f64,
    pub timeline: f64,
}

impl ComponentScoreSet {
    pub fn weighted_sum(&self, weights: &ComponentWeights) -> f64 {
        bounded(
            self.skill_match * weights.skill_match
                + self.experience * weights.experience
                + self.education * weights.education
                + self.format * weights.format
                + self.keyword_density * weights.keyword_density
                + self.timeline * weights.timeline,
        )
    }
}

/// Runs all six scorers for one resume.
pub fn score_components(
    features: &ResumeFeatures,
    profile: Option<&JobProfile>,
    config: &ScoringConfig,
) -> ComponentScoreSet {
    ComponentScoreSet {
        skill_match: skill_match_score(features, profile, config),
        experience: experience_score(features, profile),
        education: education_score(features, profile),
        format: format_score(features),
        keyword_density: keyword_density_score(features, profile, &config.ontology),
        timeline: timeline_score(features),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skill match
// ────────────────────────────────────────────────────────────────────────────

pub fn skill_match_score(
    features: &ResumeFeatures,
    profile: Option<&JobProfile>,
    config: &ScoringConfig,
) -> f64 {
    let ontology = &config.ontology;
    let has_requirements = profile.is_some_and(|p| !p.target_skills(ontology).is_empty());

    if !has_requirements {
        let distinct: BTreeSet<String> = features
            .skills
            .iter()
            .map(|s| ontology.canonical(s))
            .filter(|s| !s.is_empty())
            .collect();
        return bounded(skill_count_scale(distinct.len()));
    }

    bounded(skill_overlap_ratio(&features.skills, profile, ontology) * 100.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

pub fn experience_score(features: &ResumeFeatures, profile: Option<&JobProfile>) -> f64 {
    let years = features.experience_years;
    if !years.is_finite() || years < 0.0 {
        return NEUTRAL_SCORE;
    }
    let base = experience_curve(years);

    let minimum = profile
        .and_then(|p| p.min_experience_years)
        .filter(|m| m.is_finite() && *m > 0.0);

    match minimum {
        Some(min) if years < min => bounded((base * years / min).max(EXPERIENCE_FLOOR)),
        _ => bounded(base),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

const NO_EDUCATION_SCORE: f64 = 30.0;
const MULTIPLE_DEGREE_BONUS: f64 = 5.0;
const FIELD_RELEVANCE_BONUS: f64 = 10.0;

fn degree_base(level: DegreeLevel) -> f64 {
    match level {
        DegreeLevel::None => 30.0,
        DegreeLevel::Certificate => 45.0,
        DegreeLevel::Associate => 55.0,
        DegreeLevel::Bachelor => 70.0,
        DegreeLevel::Master => 85.0,
        DegreeLevel::Doctorate => 95.0,
    }
}

pub fn education_score(features: &ResumeFeatures, profile: Option<&JobProfile>) -> f64 {
    if features.education.is_empty() {
        return NO_EDUCATION_SCORE;
    }

    let highest = features
        .education
        .iter()
        .map(|e| DegreeLevel::classify(&e.degree))
        .max()
        .unwrap_or(DegreeLevel::None);

    let mut score = degree_base(highest);
    if features.education.len() > 1 {
        score += MULTIPLE_DEGREE_BONUS;
    }
    if let Some(profile) = profile {
        score += FIELD_RELEVANCE_BONUS * field_relevance(features, profile);
    }
    bounded(score)
}

/// Best share of field-of-study tokens that also appear in the job profile, in [0, 1].
fn field_relevance(features: &ResumeFeatures, profile: &JobProfile) -> f64 {
    let mut profile_text = profile.required_skills.join(" ");
    if let Some(role) = &profile.target_role {
        profile_text.push(' ');
        profile_text.push_str(role);
    }
    if let Some(desc) = &profile.description {
        profile_text.push(' ');
        profile_text.push_str(desc);
    }
    let profile_tokens: BTreeSet<String> = meaningful_tokens(&profile_text).into_iter().collect();
    if profile_tokens.is_empty() {
        return 0.0;
    }

    features
        .education
        .iter()
        .filter_map(|e| e.field.as_deref())
        .map(|field| {
            let tokens: BTreeSet<String> = meaningful_tokens(field).into_iter().collect();
            if tokens.is_empty() {
                return 0.0;
            }
            tokens.intersection(&profile_tokens).count() as f64 / tokens.len() as f64
        })
        .fold(0.0, f64::max)
}

// ────────────────────────────────────────────────────────────────────────────
// Format
// ────────────────────────────────────────────────────────────────────────────

const FORMAT_BASE: f64 = 20.0;
const FORMAT_COMPLETENESS_WEIGHT: f64 = 0.7;
const STRUCTURE_BONUS: f64 = 10.0;
const MISSING_CONTACT_PENALTY: f64 = 15.0;
const NO_HEADERS_PENALTY: f64 = 20.0;
const MIN_WORDS: usize = 200;
const MAX_WORDS: usize = 2000;

pub fn format_score(features: &ResumeFeatures) -> f64 {
    if features.text.trim().is_empty() && features.sections.is_empty() {
        return NEUTRAL_SCORE;
    }

    let mut score = FORMAT_BASE + FORMAT_COMPLETENESS_WEIGHT * section_completeness(&features.sections);

    if has_list_structure(&features.text) {
        score += STRUCTURE_BONUS;
    }

    let words = word_count(&features.text);
    if (MIN_WORDS..=MAX_WORDS).contains(&words) {
        score += 10.0;
    } else if words < MIN_WORDS {
        score -= 10.0;
    } else {
        score -= 5.0;
    }

    let has_contact = has_section(&features.sections, "contact")
        || features.text.contains("[EMAIL]")
        || features.text.contains("[PHONE]");
    if !has_contact {
        score -= MISSING_CONTACT_PENALTY;
    }
    if features.sections.is_empty() {
        score -= NO_HEADERS_PENALTY;
    }

    bounded(score)
}

/// Detects bullet or numbered-list lines.
fn has_list_structure(text: &str) -> bool {
    text.lines().map(str::trim_start).any(|line| {
        let mut chars = line.chars();
        match chars.next() {
            Some('•' | '-' | '*' | '▪' | '◦') => chars.next().is_some_and(char::is_whitespace),
            Some(c) if c.is_ascii_digit() => {
                let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
                rest.starts_with(". ") || rest.starts_with(") ")
            }
            _ => false,
        }
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword density
// ────────────────────────────────────────────────────────────────────────────

/// Density (in percent) at which the score reaches its plateau.
pub const OPTIMAL_DENSITY: f64 = 2.0;
/// Density past which keyword stuffing starts to cost points.
pub const STUFFING_DENSITY: f64 = 6.0;
const DENSITY_FLOOR: f64 = 40.0;
const STUFFING_SLOPE: f64 = 3.0;

pub fn keyword_density_score(
    features: &ResumeFeatures,
    profile: Option<&JobProfile>,
    ontology: &SkillOntology,
) -> f64 {
    let Some(profile) = profile else {
        return NEUTRAL_SCORE;
    };
    let keywords = profile_keywords(profile, ontology);
    if keywords.is_empty() {
        return NEUTRAL_SCORE;
    }
    let tokens = meaningful_tokens(&features.text);
    if tokens.is_empty() {
        return NEUTRAL_SCORE;
    }

    let hits: usize = keywords
        .iter()
        .map(|kw| count_phrase(&tokens, kw))
        .sum();
    let density = hits as f64 / tokens.len() as f64 * 100.0;

    bounded(density_curve(density))
}

/// Rises to 100 at [`OPTIMAL_DENSITY`], stays flat through [`STUFFING_DENSITY`],
/// then declines gently to a floor. Never increases past the optimal point.
pub fn density_curve(density: f64) -> f64 {
    if !density.is_finite() || density < 0.0 {
        return NEUTRAL_SCORE;
    }
    if density < OPTIMAL_DENSITY {
        DENSITY_FLOOR + (100.0 - DENSITY_FLOOR) * density / OPTIMAL_DENSITY
    } else if density <= STUFFING_DENSITY {
        100.0
    } else {
        (100.0 - STUFFING_SLOPE * (density - STUFFING_DENSITY)).max(DENSITY_FLOOR)
    }
}

/// Keyword phrases (as token sequences) derived from the profile.
fn profile_keywords(profile: &JobProfile, ontology: &SkillOntology) -> Vec<Vec<String>> {
    let mut keywords: Vec<Vec<String>> = profile
        .target_skills(ontology)
        .iter()
        .map(|s| meaningful_tokens(s))
        .filter(|t| !t.is_empty())
        .collect();
    if let Some(role) = &profile.target_role {
        keywords.extend(meaningful_tokens(role).into_iter().map(|t| vec![t]));
    }
    keywords.sort();
    keywords.dedup();
    keywords
}

fn count_phrase(tokens: &[String], phrase: &[String]) -> usize {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return 0;
    }
    tokens.windows(phrase.len()).filter(|w| *w == phrase).count()
}

// ────────────────────────────────────────────────────────────────────────────
// Timeline
// ────────────────────────────────────────────────────────────────────────────

const EMPTY_HISTORY_SCORE: f64 = 25.0;
const REVERSED_RANGE_PENALTY: f64 = 15.0;
const OVERLAP_PENALTY: f64 = 10.0;
const OVERLAP_TOLERANCE_MONTHS: i32 = 1;
const GAP_TOLERANCE_MONTHS: i32 = 12;
const GAP_PENALTY_PER_YEAR: f64 = 8.0;
const MAX_GAP_PENALTY: f64 = 25.0;

pub fn timeline_score(features: &ResumeFeatures) -> f64 {
    if features.work_history.is_empty() {
        return EMPTY_HISTORY_SCORE;
    }

    let mut dated: Vec<&WorkEntry> = features
        .work_history
        .iter()
        .filter(|w| w.start.is_some())
        .collect();
    if dated.is_empty() {
        return NEUTRAL_SCORE;
    }

    let mut score = 100.0;

    for entry in &dated {
        if let (Some(start), Some(end)) = (entry.start, entry.end) {
            if end < start {
                score -= REVERSED_RANGE_PENALTY;
            }
        }
    }

    dated.sort_by_key(|w| w.start);

    // Latest end seen so far; None once an ongoing role has been seen.
    let mut covered_until: Option<Option<NaiveDate>> = None;
    for entry in dated {
        let Some(start) = entry.start else { continue };
        // Reversed ranges are already penalised; treat them as zero-length here.
        let end = entry.end.map(|e| e.max(start));

        if let Some(prev_end) = covered_until {
            match prev_end {
                None => score -= OVERLAP_PENALTY,
                Some(prev_end) => {
                    let delta = months_between(prev_end, start);
                    if delta < -OVERLAP_TOLERANCE_MONTHS {
                        score -= OVERLAP_PENALTY;
                    } else if delta > GAP_TOLERANCE_MONTHS {
                        let extra_years = ((delta - GAP_TOLERANCE_MONTHS) as f64 / 12.0).ceil();
                        score -= (GAP_PENALTY_PER_YEAR * extra_years).min(MAX_GAP_PENALTY);
                    }
                }
            }
        }

        covered_until = Some(match (covered_until, end) {
            (Some(None), _) | (_, None) => None,
            (Some(Some(prev)), Some(end)) => Some(prev.max(end)),
            (None, Some(end)) => Some(end),
        });
    }

    bounded(score)
}

/// Whole months from `from` to `to`; negative when `to` is earlier.
fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    use chrono::Datelike;
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::features::EducationEntry;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn job(start: Option<NaiveDate>, end: Option<NaiveDate>) -> WorkEntry {
        WorkEntry {
            title: "Engineer".to_string(),
            company: None,
            start,
            end,
        }
    }

    fn degree(text: &str, field: Option<&str>) -> EducationEntry {
        EducationEntry {
            degree: text.to_string(),
            field: field.map(String::from),
            institution: None,
            end_year: None,
        }
    }

    fn profile_with(skills: &[&str]) -> JobProfile {
        JobProfile {
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_features_all_scores_finite_and_bounded() {
        let config = ScoringConfig::default();
        let features = ResumeFeatures::default();
        for profile in [None, Some(profile_with(&["rust"]))] {
            let scores = score_components(&features, profile.as_ref(), &config);
            for s in [
                scores.skill_match,
                scores.experience,
                scores.education,
                scores.format,
                scores.keyword_density,
                scores.timeline,
            ] {
                assert!(s.is_finite() && (0.0..=100.0).contains(&s), "score {s}");
            }
        }
    }

    #[test]
    fn test_nan_experience_degrades_to_neutral() {
        let features = ResumeFeatures {
            experience_years: f64::NAN,
            ..Default::default()
        };
        assert_eq!(experience_score(&features, None), NEUTRAL_SCORE);
    }

    #[test]
    fn test_skill_match_without_profile_uses_count_scale() {
        let config = ScoringConfig::default();
        let features = ResumeFeatures {
            skills: vec!["rust".into(), "Rust".into(), "python".into()],
            ..Default::default()
        };
        // two distinct canonical skills → 2/15 * 100
        let score = skill_match_score(&features, None, &config);
        assert!((score - 200.0 / 15.0).abs() < 1e-9, "score {score}");
    }

    #[test]
    fn test_skill_match_with_profile_uses_overlap() {
        let config = ScoringConfig::default();
        let features = ResumeFeatures {
            skills: vec!["Rust".into(), "golang".into()],
            ..Default::default()
        };
        let profile = profile_with(&["rust", "go", "kafka", "aws"]);
        let score = skill_match_score(&features, Some(&profile), &config);
        assert!((score - 50.0).abs() < 1e-9, "score {score}");
    }

    #[test]
    fn test_experience_below_minimum_is_penalised_not_negative() {
        let features = ResumeFeatures {
            experience_years: 2.0,
            ..Default::default()
        };
        let profile = JobProfile {
            min_experience_years: Some(8.0),
            ..Default::default()
        };
        let unpenalised = experience_score(&features, None);
        let penalised = experience_score(&features, Some(&profile));
        assert!(penalised < unpenalised);
        assert!(penalised >= EXPERIENCE_FLOOR);

        let zero = ResumeFeatures::default();
        assert_eq!(experience_score(&zero, Some(&profile)), EXPERIENCE_FLOOR);
    }

    #[test]
    fn test_experience_monotone_over_years() {
        let scores: Vec<f64> = [0.0, 2.0, 5.0, 10.0, 20.0]
            .iter()
            .map(|y| {
                experience_score(
                    &ResumeFeatures {
                        experience_years: *y,
                        ..Default::default()
                    },
                    None,
                )
            })
            .collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]), "{scores:?}");
        assert!(scores.iter().all(|s| *s <= 100.0));
        assert_eq!(scores[3], scores[4]);
    }

    #[test]
    fn test_education_ranks_highest_degree() {
        let bachelor = ResumeFeatures {
            education: vec![degree("B.Sc. Computer Science", None)],
            ..Default::default()
        };
        let doctorate = ResumeFeatures {
            education: vec![degree("PhD Machine Learning", None)],
            ..Default::default()
        };
        assert_eq!(education_score(&bachelor, None), 70.0);
        assert_eq!(education_score(&doctorate, None), 95.0);
        assert_eq!(education_score(&ResumeFeatures::default(), None), NO_EDUCATION_SCORE);
    }

    #[test]
    fn test_education_field_relevance_bonus() {
        let features = ResumeFeatures {
            education: vec![degree("Master of Science", Some("Data Science"))],
            ..Default::default()
        };
        let profile = JobProfile {
            target_role: Some("Data Scientist".to_string()),
            required_skills: vec!["data science".to_string()],
            ..Default::default()
        };
        let without = education_score(&features, None);
        let with = education_score(&features, Some(&profile));
        assert_eq!(without, 85.0);
        assert!((with - 95.0).abs() < 1e-9, "score {with}");
    }

    #[test]
    fn test_education_capped_at_100() {
        let features = ResumeFeatures {
            education: vec![
                degree("PhD", Some("Computer Science")),
                degree("MSc", Some("Computer Science")),
            ],
            ..Default::default()
        };
        let profile = JobProfile {
            description: Some("computer science".to_string()),
            ..Default::default()
        };
        assert_eq!(education_score(&features, Some(&profile)), 100.0);
    }

    #[test]
    fn test_format_rewards_complete_structured_resume() {
        let body = "word ".repeat(300);
        let features = ResumeFeatures {
            sections: ["contact", "summary", "experience", "education", "skills"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            text: format!("Experience\n- Led a team\n{body}"),
            ..Default::default()
        };
        assert_eq!(format_score(&features), 100.0);
    }

    #[test]
    fn test_format_penalises_missing_headers_and_contact() {
        let features = ResumeFeatures {
            text: "just a short blurb about me".to_string(),
            ..Default::default()
        };
        // 20 - 10 (short) - 15 (contact) - 20 (no headers) → clamped to 0
        assert_eq!(format_score(&features), 0.0);
    }

    #[test]
    fn test_format_mask_tokens_count_as_contact() {
        let base = ResumeFeatures {
            sections: ["skills".to_string()].into_iter().collect(),
            text: "skills".to_string(),
            ..Default::default()
        };
        let with_email = ResumeFeatures {
            text: "[EMAIL]\nskills".to_string(),
            ..base.clone()
        };
        assert!(format_score(&with_email) > format_score(&base));
    }

    #[test]
    fn test_list_structure_detection() {
        assert!(has_list_structure("Intro\n  • shipped things"));
        assert!(has_list_structure("1. first\n2. second"));
        assert!(!has_list_structure("-notabullet\n2024 was a year"));
    }

    #[test]
    fn test_keyword_density_neutral_without_profile() {
        let features = ResumeFeatures {
            text: "rust rust rust".to_string(),
            ..Default::default()
        };
        assert_eq!(keyword_density_score(&features, None, &SkillOntology::default()), NEUTRAL_SCORE);
    }

    #[test]
    fn test_keyword_density_stuffing_does_not_help() {
        let profile = profile_with(&["rust"]);
        let filler = "delivered reliable services for customers ".repeat(20); // 80 tokens
        let mut last = None;
        let mut peak = 0.0_f64;
        for repeats in [2, 4, 6, 10, 20, 40] {
            let text = format!("{filler}{}", "rust ".repeat(repeats));
            let features = ResumeFeatures {
                text,
                ..Default::default()
            };
            let score = keyword_density_score(&features, Some(&profile), &SkillOntology::default());
            if repeats >= 4 {
                if let Some(prev) = last {
                    assert!(score <= prev, "{repeats} repeats scored {score} > {prev}");
                }
                last = Some(score);
            }
            peak = peak.max(score);
        }
        assert_eq!(peak, 100.0);
        assert!(last.unwrap() < 100.0);
    }

    #[test]
    fn test_description_only_profile_drives_skill_and_keyword_scores() {
        let config = ScoringConfig::default();
        let features = ResumeFeatures {
            skills: vec!["python".to_string(), "docker".to_string()],
            text: format!(
                "{}python services with docker",
                "delivered reliable services for customers ".repeat(20)
            ),
            ..Default::default()
        };
        let profile = JobProfile {
            description: Some("We need a Python and Docker engineer; Kubernetes a plus.".to_string()),
            ..Default::default()
        };

        let unprofiled = skill_match_score(&features, None, &config);
        let described = skill_match_score(&features, Some(&profile), &config);
        assert!((described - 200.0 / 3.0).abs() < 1e-9, "skill match {described}");
        assert!(described > unprofiled);

        let density = keyword_density_score(&features, Some(&profile), &config.ontology);
        assert_eq!(density, 100.0);
    }

    #[test]
    fn test_density_curve_shape() {
        assert_eq!(density_curve(0.0), 40.0);
        assert_eq!(density_curve(OPTIMAL_DENSITY), 100.0);
        assert_eq!(density_curve(STUFFING_DENSITY), 100.0);
        assert!(density_curve(10.0) < 100.0);
        assert_eq!(density_curve(90.0), 40.0);
    }

    #[test]
    fn test_keyword_density_matches_multi_word_phrases() {
        let profile = profile_with(&["machine learning"]);
        let features = ResumeFeatures {
            text: "applied machine learning to forecasting problems daily".to_string(),
            ..Default::default()
        };
        // 1 hit over 6 tokens is well past the stuffing threshold, so below 100
        let score = keyword_density_score(&features, Some(&profile), &SkillOntology::default());
        assert!(score < 100.0 && score >= 40.0, "score {score}");
    }

    #[test]
    fn test_timeline_empty_is_low_but_nonzero() {
        let score = timeline_score(&ResumeFeatures::default());
        assert!(score > 0.0 && score < NEUTRAL_SCORE);
    }

    #[test]
    fn test_timeline_undated_entries_are_neutral() {
        let features = ResumeFeatures {
            work_history: vec![job(None, None)],
            ..Default::default()
        };
        assert_eq!(timeline_score(&features), NEUTRAL_SCORE);
    }

    #[test]
    fn test_timeline_clean_history_scores_full() {
        let features = ResumeFeatures {
            work_history: vec![
                job(Some(date(2021, 3)), None),
                job(Some(date(2018, 1)), Some(date(2021, 2))),
            ],
            ..Default::default()
        };
        assert_eq!(timeline_score(&features), 100.0);
    }

    #[test]
    fn test_timeline_reversed_range_penalised() {
        let features = ResumeFeatures {
            work_history: vec![job(Some(date(2020, 1)), Some(date(2018, 1)))],
            ..Default::default()
        };
        assert_eq!(timeline_score(&features), 100.0 - REVERSED_RANGE_PENALTY);
    }

    #[test]
    fn test_timeline_overlap_penalised() {
        let features = ResumeFeatures {
            work_history: vec![
                job(Some(date(2018, 1)), Some(date(2021, 1))),
                job(Some(date(2019, 6)), Some(date(2022, 1))),
            ],
            ..Default::default()
        };
        assert_eq!(timeline_score(&features), 100.0 - OVERLAP_PENALTY);
    }

    #[test]
    fn test_timeline_ongoing_role_overlaps_later_start() {
        let features = ResumeFeatures {
            work_history: vec![
                job(Some(date(2018, 1)), None),
                job(Some(date(2020, 1)), Some(date(2021, 1))),
            ],
            ..Default::default()
        };
        assert_eq!(timeline_score(&features), 100.0 - OVERLAP_PENALTY);
    }

    #[test]
    fn test_timeline_multi_year_gap_penalised() {
        let features = ResumeFeatures {
            work_history: vec![
                job(Some(date(2010, 1)), Some(date(2012, 1))),
                job(Some(date(2015, 1)), Some(date(2018, 1))),
            ],
            ..Default::default()
        };
        // 36-month gap → ceil(24/12) = 2 years over tolerance → 16
        assert_eq!(timeline_score(&features), 84.0);
    }

    #[test]
    fn test_weighted_sum_default_is_average() {
        let scores = ComponentScoreSet {
            skill_match: 60.0,
            experience: 60.0,
            education: 60.0,
            format: 60.0,
            keyword_density: 0.0,
            timeline: 120.0,
        };
        assert!((scores.weighted_sum(&ComponentWeights::default()) - 60.0).abs() < 1e-9);
    }
}
