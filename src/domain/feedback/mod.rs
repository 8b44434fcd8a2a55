//! Feedback module - heuristic parsing of free-text model output.
//!
//! The generation service answers in free text. Each parser here pairs with
//! a prompt template in [`prompts`] that asks for a specific shape, and
//! degrades to a defined fallback when the model ignores the requested shape.
//! Parsers are pure and never fail.

mod parsers;
pub mod prompts;

pub use parsers::{
    parse_correction, parse_correctness, parse_questions, CorrectionResult, CorrectnessVerdict,
    ParsedQuestionSet, CORRECTED_LABEL, FEEDBACK_MARKER, NEGATION_KEYWORD, NO_FEEDBACK_PLACEHOLDER,
};
pub use prompts::PromptFormat;
