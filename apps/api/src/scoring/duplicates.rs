//! Duplicate detection via embedding cosine similarity.
//!
//! The default embedder is deterministic feature hashing over unigrams and bigrams, so
//! detection needs no model download and is stable across Rust versions. Any other
//! embedder can be plugged in through [`TextEmbedder`].

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::scoring::normalize::meaningful_tokens;

/// Default similarity at or above which a resume is flagged as a duplicate.
pub const DEFAULT_DUPLICATE_THRESHOLD: f32 = 0.95;

/// Fixed keys: changing them changes every embedding.
const HASH_KEY_0: u64 = 0x5265_7375_6d65_5363;
const HASH_KEY_1: u64 = 0x6f72_6544_7570_6c31;

pub const DEFAULT_DIMENSION: usize = 4096;

pub trait TextEmbedder: Send + Sync {
    fn name(&self) -> &'static str;

    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Feature-hashing embedder. Vectors are non-negative and L2-normalised, so cosine
/// similarity between them falls in [0, 1].
pub struct HashEmbedder {
    dimension: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, feature: &str) -> usize {
        let mut hasher = SipHasher13::new_with_keys(HASH_KEY_0, HASH_KEY_1);
        feature.hash(&mut hasher);
        (hasher.finish() % self.dimension as u64) as usize
    }
}

impl TextEmbedder for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let tokens = meaningful_tokens(text);
        let mut counts = vec![0.0f32; self.dimension];

        for token in &tokens {
            counts[self.bucket(&format!("u:{token}"))] += 1.0;
        }
        for pair in tokens.windows(2) {
            counts[self.bucket(&format!("b:{} {}", pair[0], pair[1]))] += 0.5;
        }

        // sublinear tf
        for v in counts.iter_mut().filter(|v| **v > 0.0) {
            *v = 1.0 + v.ln();
        }

        let norm: f32 = counts.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut counts {
                *v /= norm;
            }
        }
        counts
    }
}

/// Cosine similarity clamped to [0, 1]. Zero vectors and dimension mismatches yield 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Outcome of checking one new resume against the stored corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCheck {
    pub is_duplicate: bool,
    pub duplicate_of: Option<Uuid>,
    /// Highest similarity seen, flagged or not.
    pub best_similarity: f32,
}

impl DuplicateCheck {
    fn clean() -> Self {
        Self {
            is_duplicate: false,
            duplicate_of: None,
            best_similarity: 0.0,
        }
    }
}

/// Compares `new_text` against every stored `(id, text)` pair.
///
/// Byte-identical (trimmed) texts score exactly 1.0. Blank texts on either side are
/// never considered, so two degenerate parses cannot flag each other. On equal
/// similarity the earlier entry in `existing` wins.
pub fn detect_duplicate(
    embedder: &dyn TextEmbedder,
    new_text: &str,
    existing: &[(Uuid, String)],
    threshold: f32,
) -> DuplicateCheck {
    let new_trimmed = new_text.trim();
    if new_trimmed.is_empty() || existing.is_empty() {
        return DuplicateCheck::clean();
    }

    let new_embedding = embedder.embed(new_trimmed);
    let mut best: Option<(Uuid, f32)> = None;

    for (id, text) in existing {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        let similarity = if trimmed == new_trimmed {
            1.0
        } else {
            cosine_similarity(&new_embedding, &embedder.embed(trimmed))
        };
        if best.map_or(true, |(_, s)| similarity > s) {
            best = Some((*id, similarity));
        }
    }

    let Some((best_id, best_similarity)) = best else {
        return DuplicateCheck::clean();
    };

    let is_duplicate = best_similarity >= threshold;
    debug!(
        embedder = embedder.name(),
        best_similarity,
        is_duplicate,
        "duplicate check complete"
    );

    DuplicateCheck {
        is_duplicate,
        duplicate_of: is_duplicate.then_some(best_id),
        best_similarity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME_A: &str = "Senior backend engineer building Rust microservices on AWS. \
        Led migration of payment systems to Kubernetes and PostgreSQL.";
    const RESUME_B: &str = "Pastry chef specialising in laminated doughs, sourdough \
        fermentation and plated desserts for boutique hotels.";

    #[test]
    fn test_identical_text_is_flagged_at_one() {
        let embedder = HashEmbedder::default();
        let id = Uuid::new_v4();
        let check = detect_duplicate(
            &embedder,
            RESUME_A,
            &[(id, RESUME_A.to_string())],
            DEFAULT_DUPLICATE_THRESHOLD,
        );
        assert!(check.is_duplicate);
        assert_eq!(check.duplicate_of, Some(id));
        assert_eq!(check.best_similarity, 1.0);
    }

    #[test]
    fn test_unrelated_text_is_not_flagged() {
        let embedder = HashEmbedder::default();
        let check = detect_duplicate(
            &embedder,
            RESUME_A,
            &[(Uuid::new_v4(), RESUME_B.to_string())],
            DEFAULT_DUPLICATE_THRESHOLD,
        );
        assert!(!check.is_duplicate);
        assert!(check.duplicate_of.is_none());
        assert!(check.best_similarity < 0.1, "similarity {}", check.best_similarity);
    }

    #[test]
    fn test_empty_texts_never_flag_each_other() {
        let embedder = HashEmbedder::default();
        let check = detect_duplicate(
            &embedder,
            "   ",
            &[(Uuid::new_v4(), String::new())],
            DEFAULT_DUPLICATE_THRESHOLD,
        );
        assert!(!check.is_duplicate);

        let check = detect_duplicate(
            &embedder,
            RESUME_A,
            &[(Uuid::new_v4(), "\n".to_string())],
            DEFAULT_DUPLICATE_THRESHOLD,
        );
        assert!(!check.is_duplicate);
        assert_eq!(check.best_similarity, 0.0);
    }

    #[test]
    fn test_near_identical_text_is_flagged() {
        let embedder = HashEmbedder::default();
        let tweaked = RESUME_A.replace("Senior", "senior ");
        let check = detect_duplicate(
            &embedder,
            &tweaked,
            &[(Uuid::new_v4(), RESUME_A.to_string())],
            DEFAULT_DUPLICATE_THRESHOLD,
        );
        assert!(check.is_duplicate, "similarity {}", check.best_similarity);
    }

    #[test]
    fn test_best_match_wins_and_earliest_on_tie() {
        let embedder = HashEmbedder::default();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let unrelated = Uuid::new_v4();
        let check = detect_duplicate(
            &embedder,
            RESUME_A,
            &[
                (unrelated, RESUME_B.to_string()),
                (first, RESUME_A.to_string()),
                (second, RESUME_A.to_string()),
            ],
            DEFAULT_DUPLICATE_THRESHOLD,
        );
        assert_eq!(check.duplicate_of, Some(first));
    }

    #[test]
    fn test_threshold_is_configurable() {
        let embedder = HashEmbedder::default();
        let check = detect_duplicate(
            &embedder,
            RESUME_A,
            &[(Uuid::new_v4(), RESUME_B.to_string())],
            0.0,
        );
        assert!(check.is_duplicate);
    }

    #[test]
    fn test_embeddings_are_normalised_and_deterministic() {
        let embedder = HashEmbedder::new(512);
        let a = embedder.embed(RESUME_A);
        let b = embedder.embed(RESUME_A);
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm {norm}");
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < f32::EPSILON);
    }
}
