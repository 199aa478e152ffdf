//! Heuristic language detection, used to preselect a voice that speaks the text's language.
//!
//! The classifier scores the text against a fixed table of [`LanguageSignature`]s. A signature's
//! score is the number of its keywords found in the text plus the number of characters from its
//! script. The best score wins; on a tie the signature that comes first in the table wins. If no
//! signature scores at all, the text is taken to be English.
//!
//! This is deliberately crude. Short texts, mixed scripts and loanwords can be misclassified.

use serde::{Deserialize, Serialize};
use tracing::debug;

mod signature;

pub use signature::{builtin_signatures, LanguageSignature};

/// Texts with at most this many characters (after trimming) are not classified.
pub const DEFAULT_MIN_CHARS: usize = 10;

/// The tag reported when no signature matches.
pub const FALLBACK_TAG: &str = "en-US";

/// The outcome of a detection.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    /// The BCP 47 tag of the detected language.
    pub tag: String,
    /// The human-readable name of the detected language.
    pub display_name: String,
    /// The winning signature's score, 0 for the English fallback.
    pub score: usize,
}

impl DetectionResult {
    fn fallback() -> Self {
        Self {
            tag: FALLBACK_TAG.to_owned(),
            display_name: "English".to_owned(),
            score: 0,
        }
    }
}

/// Guesses the language of a text.
#[derive(Debug, Clone)]
pub struct LanguageClassifier {
    signatures: Vec<LanguageSignature>,
    min_chars: usize,
}

impl Default for LanguageClassifier {
    fn default() -> Self {
        Self::new(builtin_signatures().to_vec())
    }
}

impl LanguageClassifier {
    /// Creates a classifier over the given signatures. Their order decides ties.
    pub fn new(signatures: Vec<LanguageSignature>) -> Self {
        Self {
            signatures,
            min_chars: DEFAULT_MIN_CHARS,
        }
    }

    /// Sets the length a text must exceed to be classified.
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// The signatures in scoring order.
    pub fn signatures(&self) -> &[LanguageSignature] {
        &self.signatures
    }

    /// Detects the language of the text. Returns `None` without scoring anything if the trimmed
    /// text is too short.
    pub fn detect(&self, text: &str) -> Option<DetectionResult> {
        let sample = text.trim();
        if sample.chars().count() <= self.min_chars {
            debug!(min_chars = self.min_chars, "text too short for language detection");
            return None;
        }

        let mut best: Option<(&LanguageSignature, usize)> = None;
        for signature in &self.signatures {
            let score = signature.score(sample);
            if score > best.map_or(0, |(_, best_score)| best_score) {
                best = Some((signature, score));
            }
        }

        let result = match best {
            Some((signature, score)) => DetectionResult {
                tag: signature.tag().to_owned(),
                display_name: signature.display_name().to_owned(),
                score,
            },
            None => DetectionResult::fallback(),
        };
        debug!(tag = %result.tag, score = result.score, "language detected");
        Some(result)
    }
}
