//! Heuristic response parsers.

use serde::{Deserialize, Serialize};

/// Marker separating the corrected sentence from the feedback.
pub const FEEDBACK_MARKER: &str = "Feedback:";

/// Label the model puts in front of the corrected sentence.
pub const CORRECTED_LABEL: &str = "Corrected:";

/// Feedback returned when the response has no feedback marker.
pub const NO_FEEDBACK_PLACEHOLDER: &str = "No feedback provided";

/// Lower-case keyword whose presence marks an answer as wrong.
pub const NEGATION_KEYWORD: &str = "incorrect";

/// Questions extracted from a generation response, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedQuestionSet(Vec<String>);

impl ParsedQuestionSet {
    pub fn questions(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

/// Verdict on a user's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectnessVerdict {
    pub is_correct: bool,
    /// The model's full explanation.
    pub explanation: String,
}

/// Corrected sentence plus feedback on the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub corrected_text: String,
    pub feedback: String,
}

/// Splits a response into one question per non-blank line.
///
/// Lines are kept verbatim apart from a trailing carriage return.
pub fn parse_questions(response: &str) -> ParsedQuestionSet {
    ParsedQuestionSet(
        response
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Judges an answer correct unless the response mentions [`NEGATION_KEYWORD`].
///
/// Low precision on purpose: "not correct" still counts as correct. The
/// explanation is the untouched response.
pub fn parse_correctness(response: &str) -> CorrectnessVerdict {
    CorrectnessVerdict {
        is_correct: !response.to_lowercase().contains(NEGATION_KEYWORD),
        explanation: response.to_string(),
    }
}

/// Extracts a correction from `Corrected: <sentence> Feedback: <message>`.
///
/// Without the feedback marker both fields fall back: the original sentence
/// and [`NO_FEEDBACK_PLACEHOLDER`]. With the marker but without the
/// `Corrected:` label, the original sentence is kept and the feedback used.
pub fn parse_correction(response: &str, original: &str) -> CorrectionResult {
    match response.split_once(FEEDBACK_MARKER) {
        Some((corrected_part, feedback_part)) => {
            let corrected_text = corrected_part
                .trim()
                .strip_prefix(CORRECTED_LABEL)
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| original.to_string());

            CorrectionResult {
                corrected_text,
                feedback: feedback_part.trim().to_string(),
            }
        }
        None => CorrectionResult {
            corrected_text: original.to_string(),
            feedback: NO_FEEDBACK_PLACEHOLDER.to_string(),
        },
    }
}
