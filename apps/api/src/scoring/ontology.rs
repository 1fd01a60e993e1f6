//! Skill ontology: the versioned vocabulary shared by the parser and the scorers.
//!
//! The ontology is a plain value. Updating it means building a new snapshot with a
//! bumped `version`; analyses record the version they were scored with.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "react",
    "angular",
    "vue",
    "node",
    "sql",
    "mongodb",
    "postgresql",
    "mysql",
    "aws",
    "azure",
    "docker",
    "kubernetes",
    "git",
    "agile",
    "scrum",
    "machine learning",
    "deep learning",
    "data science",
    "analytics",
    "tableau",
    "power bi",
    "excel",
    "tensorflow",
    "pytorch",
    "pandas",
    "numpy",
    "django",
    "flask",
    "fastapi",
    "html",
    "css",
    "redux",
    "graphql",
    "rest api",
    "microservices",
    "rust",
    "go",
    "c++",
    "c#",
];

const DEFAULT_SYNONYMS: &[(&str, &[&str])] = &[
    ("javascript", &["js", "ecmascript"]),
    ("typescript", &["ts"]),
    ("kubernetes", &["k8s"]),
    ("postgresql", &["postgres", "psql"]),
    ("machine learning", &["ml"]),
    ("deep learning", &["dl"]),
    ("node", &["node.js", "nodejs"]),
    ("go", &["golang"]),
    ("rest api", &["restful", "rest apis"]),
    ("aws", &["amazon web services"]),
    ("react", &["react.js", "reactjs"]),
];

const DEFAULT_JOB_TITLES: &[&str] = &[
    "software engineer",
    "data scientist",
    "data analyst",
    "backend developer",
    "frontend developer",
    "full stack developer",
    "devops engineer",
    "machine learning engineer",
    "product manager",
];

const DEFAULT_INDUSTRIES: &[&str] = &[
    "technology",
    "finance",
    "healthcare",
    "education",
    "retail",
    "manufacturing",
];

/// Versioned skill / job-title / industry vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillOntology {
    pub version: u32,
    pub skills: Vec<String>,
    #[serde(default)]
    pub job_titles: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    /// canonical skill -> aliases
    #[serde(default)]
    pub synonyms: BTreeMap<String, Vec<String>>,
}

impl Default for SkillOntology {
    fn default() -> Self {
        Self {
            version: 1,
            skills: DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
            job_titles: DEFAULT_JOB_TITLES.iter().map(|s| s.to_string()).collect(),
            industries: DEFAULT_INDUSTRIES.iter().map(|s| s.to_string()).collect(),
            synonyms: DEFAULT_SYNONYMS
                .iter()
                .map(|(canonical, aliases)| {
                    (
                        canonical.to_string(),
                        aliases.iter().map(|a| a.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl SkillOntology {
    /// Maps a raw skill string to its canonical lowercase form.
    /// Unknown skills are returned lowercased and trimmed.
    pub fn canonical(&self, skill: &str) -> String {
        let needle = skill.trim().to_lowercase();
        for (canonical, aliases) in &self.synonyms {
            if aliases.iter().any(|a| a.eq_ignore_ascii_case(&needle)) {
                return canonical.clone();
            }
        }
        needle
    }

    /// Every surface form the parser should look for, paired with the canonical skill.
    /// Longer forms come first so "machine learning" wins over "ml"-style fragments.
    pub fn surface_forms(&self) -> Vec<(String, String)> {
        let mut forms: Vec<(String, String)> = self
            .skills
            .iter()
            .map(|s| {
                let lower = s.to_lowercase();
                (lower.clone(), self.canonical(&lower))
            })
            .collect();
        for (canonical, aliases) in &self.synonyms {
            for alias in aliases {
                forms.push((alias.to_lowercase(), canonical.to_lowercase()));
            }
        }
        forms.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        forms.dedup_by(|a, b| a.0 == b.0);
        forms
    }

    /// Returns a copy of `next` stamped with a version strictly greater than this one.
    pub fn succeeded_by(&self, mut next: SkillOntology) -> SkillOntology {
        next.version = next.version.max(self.version + 1);
        next
    }

    /// Canonical skills mentioned in `text`, in order of first appearance.
    ///
    /// Very short forms ("go", "ml") only count when not written all-lowercase, so ordinary
    /// words in running text are not taken for skills.
    pub fn find_skills(&self, text: &str) -> Vec<String> {
        let haystack = text.to_ascii_lowercase();
        let mut hits: Vec<(usize, String)> = Vec::new();

        for (surface, canonical) in self.surface_forms() {
            if surface.is_empty() {
                continue;
            }
            let first = haystack.match_indices(surface.as_str()).find(|(pos, _)| {
                let end = pos + surface.len();
                is_boundary(&haystack, *pos, end)
                    && (surface.len() > 2 || text[*pos..end].chars().any(|c| c.is_ascii_uppercase()))
            });
            if let Some((pos, _)) = first {
                hits.push((pos, canonical));
            }
        }

        hits.sort();
        let mut seen = BTreeSet::new();
        hits.into_iter()
            .filter(|(_, canonical)| seen.insert(canonical.clone()))
            .map(|(_, canonical)| canonical)
            .collect()
    }
}

/// True when `[start, end)` is not glued to other word characters.
fn is_boundary(haystack: &str, start: usize, end: usize) -> bool {
    let word = |c: char| c.is_alphanumeric() || c == '+' || c == '#';
    let before_ok = haystack[..start].chars().next_back().map_or(true, |c| !word(c));
    let after_ok = haystack[end..].chars().next().map_or(true, |c| !word(c));
    before_ok && after_ok
}
