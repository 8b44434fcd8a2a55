//! Analysis module - structured story feedback.
//!
//! Unlike the heuristic parsers in `feedback`, the analysis tier asks the
//! model for a JSON object and rejects anything that does not match it.

mod story_analysis;

pub use story_analysis::{
    parse_structured_analysis, AnalysisDraft, AnalysisParseError, StoryAnalysis,
};
