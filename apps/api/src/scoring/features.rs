use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scoring::ontology::SkillOntology;

/// Structured features extracted from one uploaded resume.
///
/// Produced once by the parser and never mutated; a re-parse builds a new record.
/// Every collection may be empty; scorers must cope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeFeatures {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: f64,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub work_history: Vec<WorkEntry>,
    /// Lowercase section names detected in the document.
    #[serde(default)]
    pub sections: BTreeSet<String>,
    #[serde(default)]
    pub keyword_counts: BTreeMap<String, u32>,
    /// PII-masked, normalized full text.
    #[serde(default)]
    pub text: String,
}

impl ResumeFeatures {
    /// True when the parser produced nothing usable at all.
    pub fn is_degenerate(&self) -> bool {
        self.text.trim().is_empty()
            && self.skills.is_empty()
            && self.education.is_empty()
            && self.work_history.is_empty()
            && self.sections.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub field: Option<String>,
    pub institution: Option<String>,
    pub end_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkEntry {
    pub title: String,
    pub company: Option<String>,
    pub start: Option<NaiveDate>,
    /// `None` means the role is current ("present").
    pub end: Option<NaiveDate>,
}

/// Optional target-role description used to personalise scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub min_experience_years: Option<f64>,
    /// Free-form steer for the AI reviewer ("leadership", "cloud depth", ...).
    #[serde(default)]
    pub analysis_focus: Option<String>,
}

impl JobProfile {
    /// Text handed to the AI reviewer as the job-description section.
    pub fn as_prompt_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(role) = self.target_role.as_deref().filter(|r| !r.trim().is_empty()) {
            parts.push(format!("Target role: {role}"));
        }
        if !self.required_skills.is_empty() {
            parts.push(format!("Required skills: {}", self.required_skills.join(", ")));
        }
        if let Some(min) = self.min_experience_years {
            parts.push(format!("Minimum experience: {min} years"));
        }
        if let Some(desc) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            parts.push(desc.to_string());
        }
        if let Some(focus) = self.analysis_focus.as_deref().filter(|f| !f.trim().is_empty()) {
            parts.push(format!("Analysis Focus: {focus}"));
        }
        parts.join("\n")
    }

    /// Skills the profile asks for. An explicit list wins; otherwise the skills the
    /// ontology recognises in the description.
    pub fn target_skills(&self, ontology: &SkillOntology) -> Vec<String> {
        let explicit: Vec<String> = self
            .required_skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if !explicit.is_empty() {
            return explicit;
        }
        self.description
            .as_deref()
            .map(|d| ontology.find_skills(d))
            .unwrap_or_default()
    }
}

/// Ordered degree hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeLevel {
    None,
    Certificate,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl DegreeLevel {
    /// Classifies a free-text degree line. Matching is token-based so that
    /// e.g. "ms" inside "systems" does not count as a master's degree.
    pub fn classify(degree: &str) -> DegreeLevel {
        let lower = degree.to_lowercase();
        let tokens: Vec<String> = lower
            .split(|c: char| !c.is_alphanumeric() && c != '.')
            .map(|t| t.trim_matches('.').replace('.', ""))
            .filter(|t| !t.is_empty())
            .collect();
        let has = |words: &[&str]| tokens.iter().any(|t| words.contains(&t.as_str()));

        if has(&["phd", "doctorate", "doctoral", "dphil", "edd"]) {
            DegreeLevel::Doctorate
        } else if has(&["master", "masters", "mba", "ms", "msc", "ma", "meng", "mtech"]) {
            DegreeLevel::Master
        } else if has(&["bachelor", "bachelors", "bs", "bsc", "ba", "beng", "btech"]) {
            DegreeLevel::Bachelor
        } else if has(&["associate", "associates"]) {
            DegreeLevel::Associate
        } else if has(&["certificate", "certification", "diploma", "certified"]) {
            DegreeLevel::Certificate
        } else {
            DegreeLevel::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_hierarchy_is_ordered() {
        assert!(DegreeLevel::None < DegreeLevel::Certificate);
        assert!(DegreeLevel::Certificate < DegreeLevel::Associate);
        assert!(DegreeLevel::Associate < DegreeLevel::Bachelor);
        assert!(DegreeLevel::Bachelor < DegreeLevel::Master);
        assert!(DegreeLevel::Master < DegreeLevel::Doctorate);
    }

    #[test]
    fn test_classify_degrees() {
        assert_eq!(DegreeLevel::classify("Ph.D. in Physics"), DegreeLevel::Doctorate);
        assert_eq!(DegreeLevel::classify("M.Sc. Computer Science"), DegreeLevel::Master);
        assert_eq!(DegreeLevel::classify("Bachelor of Arts"), DegreeLevel::Bachelor);
        assert_eq!(DegreeLevel::classify("Associate Degree in Nursing"), DegreeLevel::Associate);
        assert_eq!(DegreeLevel::classify("AWS Certification"), DegreeLevel::Certificate);
        assert_eq!(DegreeLevel::classify("Distributed systems coursework"), DegreeLevel::None);
    }

    #[test]
    fn test_features_deserialize_with_missing_fields() {
        let features: ResumeFeatures = serde_json::from_str(r#"{"skills": ["rust"]}"#).unwrap();
        assert_eq!(features.skills, vec!["rust"]);
        assert!(features.work_history.is_empty());
        assert_eq!(features.experience_years, 0.0);
    }

    #[test]
    fn test_default_features_are_degenerate() {
        assert!(ResumeFeatures::default().is_degenerate());
    }

    #[test]
    fn test_profile_prompt_text_skips_empty_parts() {
        let profile = JobProfile {
            target_role: Some("Backend Engineer".to_string()),
            required_skills: vec!["rust".to_string(), "sql".to_string()],
            ..Default::default()
        };
        let text = profile.as_prompt_text();
        assert!(text.contains("Target role: Backend Engineer"));
        assert!(text.contains("rust, sql"));
        assert!(!text.contains("Minimum experience"));
    }

    #[test]
    fn test_profile_prompt_text_appends_focus() {
        let profile = JobProfile {
            description: Some("Platform team".to_string()),
            analysis_focus: Some("leadership".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.as_prompt_text(), "Platform team\nAnalysis Focus: leadership");
    }

    #[test]
    fn test_target_skills_fall_back_to_description() {
        let ontology = SkillOntology::default();
        let described = JobProfile {
            description: Some("We need a Python and Docker engineer; K8s a plus.".to_string()),
            ..Default::default()
        };
        assert_eq!(
            described.target_skills(&ontology),
            vec!["python", "docker", "kubernetes"]
        );

        let explicit = JobProfile {
            required_skills: vec![" rust ".to_string(), "".to_string()],
            ..described
        };
        assert_eq!(explicit.target_skills(&ontology), vec!["rust"]);
    }
}
