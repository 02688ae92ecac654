//! Fuzzy matching of a spoken guess against the target word
//!
//! A guess is scored by Levenshtein distance normalized by the longer of the
//! two words, then bucketed into a feedback [`Tier`].

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{FlashcardError, Result};

/// Lowest score that counts as a correct answer.
pub const EXACT_THRESHOLD: f64 = 0.8;

/// Lowest score that earns "close" feedback.
pub const CLOSE_THRESHOLD: f64 = 0.6;

/// Feedback bucket for a scored guess
#[cfg_attr(feature = "python", pyclass(eq, eq_int))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Counted as correct
    Exact,
    /// Wrong, but worth another try
    Close,
    /// Wrong
    Low,
}

impl Tier {
    /// Only `Exact` earns a point and a new card
    pub fn is_correct(self) -> bool {
        matches!(self, Tier::Exact)
    }

    /// Message shown to the child for this tier
    pub fn feedback(self) -> &'static str {
        match self {
            Tier::Exact => "Perfect! 🌟",
            Tier::Close => "Close! Try again 💪",
            Tier::Low => "Keep practicing! 📚",
        }
    }

    /// Lowercase key stored in the `attempts` table
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Exact => "exact",
            Tier::Close => "close",
            Tier::Low => "low",
        }
    }

    /// Inverse of [`Tier::as_str`], case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Some(Tier::Exact),
            "close" => Some(Tier::Close),
            "low" => Some(Tier::Low),
            _ => None,
        }
    }
}

/// Score and tier for one comparison
#[cfg_attr(feature = "python", pyclass)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub score: f64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub tier: Tier,
}

#[cfg(feature = "python")]
#[pymethods]
impl SimilarityResult {
    fn __repr__(&self) -> String {
        format!("SimilarityResult(score={:.3}, tier='{}')", self.score, self.tier.as_str())
    }
}

/// Tier boundaries, both inclusive lower bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    exact: f64,
    close: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            exact: EXACT_THRESHOLD,
            close: CLOSE_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Build thresholds; requires `0 <= close <= exact <= 1`.
    pub fn new(exact: f64, close: f64) -> Result<Self> {
        let in_range = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_range(exact) || !in_range(close) || close > exact {
            return Err(FlashcardError::InvalidThresholds { exact, close });
        }
        Ok(Self { exact, close })
    }

    /// Lowest score counted as correct
    pub fn exact(&self) -> f64 {
        self.exact
    }

    /// Lowest score earning "close" feedback
    pub fn close(&self) -> f64 {
        self.close
    }

    /// First tier whose threshold `score` reaches; thresholds are inclusive.
    pub fn tier_for(&self, score: f64) -> Tier {
        if score >= self.exact {
            Tier::Exact
        } else if score >= self.close {
            Tier::Close
        } else {
            Tier::Low
        }
    }
}

/// Levenshtein distance over extended grapheme clusters (user-perceived characters).
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<&str> = a.graphemes(true).collect();
    let b: Vec<&str> = b.graphemes(true).collect();
    let (m, n) = (a.len(), b.len());

    let mut table = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in table[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            table[i][j] = if a[i - 1] == b[j - 1] {
                table[i - 1][j - 1]
            } else {
                1 + table[i - 1][j]
                    .min(table[i][j - 1])
                    .min(table[i - 1][j - 1])
            };
        }
    }

    table[m][n]
}

/// Case-insensitive similarity in `[0, 1]`; two empty words score 1.
pub fn similarity_score(guess: &str, target: &str) -> f64 {
    let guess = guess.to_lowercase();
    let target = target.to_lowercase();

    let length = guess.graphemes(true).count().max(target.graphemes(true).count());
    if length == 0 {
        return 1.0;
    }

    let distance = edit_distance(&guess, &target) as f64;
    (1.0 - distance / length as f64).clamp(0.0, 1.0)
}

/// Score a guess with the default thresholds (0.8 / 0.6).
pub fn classify(guess: &str, target: &str) -> SimilarityResult {
    classify_with(guess, target, &Thresholds::default())
}

/// Score a guess with caller-supplied thresholds.
pub fn classify_with(guess: &str, target: &str, thresholds: &Thresholds) -> SimilarityResult {
    let score = similarity_score(guess, target);
    SimilarityResult {
        score,
        tier: thresholds.tier_for(score),
    }
}

// ============= Python Bindings =============

/// `None` for the guess is treated as silence (empty string).
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "classify")]
#[pyo3(signature = (guess, target, exact_threshold=None, close_threshold=None))]
pub fn py_classify(
    guess: Option<&str>,
    target: &str,
    exact_threshold: Option<f64>,
    close_threshold: Option<f64>,
) -> PyResult<SimilarityResult> {
    let thresholds = Thresholds::new(
        exact_threshold.unwrap_or(EXACT_THRESHOLD),
        close_threshold.unwrap_or(CLOSE_THRESHOLD),
    )?;
    Ok(classify_with(guess.unwrap_or(""), target, &thresholds))
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "edit_distance")]
pub fn py_edit_distance(a: &str, b: &str) -> usize {
    edit_distance(a, b)
}
