//! Prompt templates, versioned together with the parsers that read the replies.
//!
//! Changing the wording of a prompt can break its parser, so a new wording
//! goes in as a new [`PromptFormat`] variant rather than an edit in place.

use super::parsers::{CORRECTED_LABEL, FEEDBACK_MARKER};

/// Version of the prompt wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PromptFormat {
    #[default]
    V1,
}

impl PromptFormat {
    /// Asks for `limit` questions on `topic`, one per line.
    pub fn questions(&self, topic: &str, limit: usize) -> String {
        match self {
            PromptFormat::V1 => format!(
                "Generate {} multiple-choice questions on {}.",
                limit, topic
            ),
        }
    }

    /// Asks whether `user_answer` matches `correct_answer`, with an explanation.
    pub fn answer_evaluation(
        &self,
        question: &str,
        user_answer: &str,
        correct_answer: &str,
    ) -> String {
        match self {
            PromptFormat::V1 => format!(
                "Question: {}\nUser Answer: {}\nCorrect Answer: {}\nIs the answer correct? Explain why.",
                question, user_answer, correct_answer
            ),
        }
    }

    /// Asks for a corrected sentence and feedback in the marker format.
    pub fn sentence_correction(&self, sentence: &str) -> String {
        match self {
            PromptFormat::V1 => format!(
                "Please correct the following sentence if needed and provide feedback in the format '{} <corrected sentence> {} <feedback message>': {}",
                CORRECTED_LABEL, FEEDBACK_MARKER, sentence
            ),
        }
    }

    /// Asks for a JSON analysis of a whole story.
    pub fn story_analysis(&self, content: &str) -> String {
        match self {
            PromptFormat::V1 => format!(
                r#"Please analyze the following story for structure, style, and common errors.
Return your response as JSON in the following format:
{{
	"analysis": "Your analysis text",
	"tips": ["Tip 1", "Tip 2", ...],
	"performance_score": 85
}}
Story Content:
{}"#,
                content
            ),
        }
    }
}
