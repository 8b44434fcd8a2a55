//! WritingAssistant - request/response helpers for the writing exercises.
//!
//! Each call sends one versioned prompt and reads the reply with the
//! matching heuristic parser. Only the generation call can fail.

use std::sync::Arc;

use crate::domain::feedback::{
    parse_correction, parse_correctness, parse_questions, CorrectionResult, CorrectnessVerdict,
    ParsedQuestionSet, PromptFormat,
};
use crate::ports::{GenerationError, TextGenerator};

pub struct WritingAssistant {
    generator: Arc<dyn TextGenerator>,
    prompts: PromptFormat,
}

impl WritingAssistant {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            prompts: PromptFormat::default(),
        }
    }

    /// Uses a specific prompt format.
    pub fn with_prompt_format(mut self, prompts: PromptFormat) -> Self {
        self.prompts = prompts;
        self
    }

    /// Asks for `limit` questions on `topic`.
    ///
    /// The set holds whatever lines came back; it is not truncated to `limit`.
    pub async fn generate_questions(
        &self,
        topic: &str,
        limit: usize,
    ) -> Result<ParsedQuestionSet, GenerationError> {
        let response = self
            .generator
            .generate(&self.prompts.questions(topic, limit))
            .await?;
        let questions = parse_questions(&response);
        tracing::debug!(topic, requested = limit, received = questions.len(), "Questions generated");
        Ok(questions)
    }

    /// Judges a user's answer against the expected one.
    pub async fn evaluate_answer(
        &self,
        question: &str,
        user_answer: &str,
        correct_answer: &str,
    ) -> Result<CorrectnessVerdict, GenerationError> {
        let prompt = self
            .prompts
            .answer_evaluation(question, user_answer, correct_answer);
        let response = self.generator.generate(&prompt).await?;
        Ok(parse_correctness(&response))
    }

    /// Corrects a sentence, falling back to the original when the reply is unstructured.
    pub async fn correct_sentence(&self, sentence: &str) -> Result<CorrectionResult, GenerationError> {
        let response = self
            .generator
            .generate(&self.prompts.sentence_correction(sentence))
            .await?;
        Ok(parse_correction(&response, sentence))
    }
}
