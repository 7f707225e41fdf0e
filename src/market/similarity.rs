//! Participant-name alignment between two fixtures.
//!
//! Providers spell and order participants differently ("FC København" vs
//! "FC KBH", home/away swapped). Two name lists are paired up by solving an
//! assignment problem over their edit distances, and the worst matched pair
//! decides whether the lists describe the same participants.

use tracing::debug;

use super::assignment::solve_assignment;
use crate::error::ArbError;

/// Names further apart than this (normalized edit distance) are different
/// participants.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.25;

/// Tuning for fixture matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// Highest dissimilarity score still treated as the same market
    pub similarity_threshold: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl MatchConfig {
    pub fn is_similar(&self, score: f64) -> bool {
        score <= self.similarity_threshold
    }
}

/// Result of aligning a candidate name list onto a reference list.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Worst normalized edit distance among matched pairs; 0 is a perfect match
    pub score: f64,
    /// `permutation[i]` is the candidate position matched to reference position `i`
    pub permutation: Vec<usize>,
}

/// Case-sensitive Levenshtein distance, counted in characters.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Align `candidate` onto `reference`.
pub fn align<A, B>(reference: &[A], candidate: &[B]) -> Result<Alignment, ArbError>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    if reference.len() != candidate.len() {
        return Err(ArbError::LengthMismatch {
            left: reference.len(),
            right: candidate.len(),
        });
    }

    let costs: Vec<Vec<usize>> = reference
        .iter()
        .map(|a| {
            candidate
                .iter()
                .map(|b| edit_distance(a.as_ref(), b.as_ref()))
                .collect()
        })
        .collect();

    let permutation = solve_assignment(&costs)?;

    let score = permutation
        .iter()
        .enumerate()
        .map(|(i, &j)| {
            let a = reference[i].as_ref().chars().count();
            let b = candidate[j].as_ref().chars().count();
            let avg_len = ((a + b) >> 1).max(1);
            costs[i][j] as f64 / avg_len as f64
        })
        .fold(0.0, f64::max);

    Ok(Alignment { score, permutation })
}

/// Permutation that brings `candidate` in line with `reference`, or `None`
/// when they name different participants.
///
/// Alignment failures count as maximal dissimilarity.
pub fn similar_permutation<A, B>(
    reference: &[A],
    candidate: &[B],
    config: &MatchConfig,
) -> Option<Vec<usize>>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    match align(reference, candidate) {
        Ok(alignment) if config.is_similar(alignment.score) => Some(alignment.permutation),
        Ok(alignment) => {
            debug!(
                "Names too far apart (score {:.3} > {:.3})",
                alignment.score, config.similarity_threshold
            );
            None
        }
        Err(e) => {
            debug!("Alignment failed, treating as different markets: {}", e);
            None
        }
    }
}
