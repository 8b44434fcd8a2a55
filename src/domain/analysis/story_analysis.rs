//! Story analysis value object and its structured response parser.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::Timestamp;

/// Analysis fields as the model returned them, before timestamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisDraft {
    pub analysis: String,
    pub tips: Vec<String>,
    pub performance_score: i64,
}

impl AnalysisDraft {
    /// Stamps the draft, producing the record written back to the story.
    pub fn finalize(self, analyzed_at: Timestamp) -> StoryAnalysis {
        StoryAnalysis {
            analysis: self.analysis,
            tips: self.tips,
            performance_score: self.performance_score,
            analyzed_at,
        }
    }
}

/// Feedback on a completed story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryAnalysis {
    pub analysis: String,
    pub tips: Vec<String>,
    pub performance_score: i64,
    pub analyzed_at: Timestamp,
}

/// Why a structured analysis response was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisParseError {
    #[error("response contains no JSON object")]
    NoJsonObject,

    #[error("analysis JSON does not match the expected shape: {0}")]
    InvalidShape(String),
}

#[derive(Deserialize)]
struct RawAnalysis {
    analysis: String,
    tips: Vec<String>,
    performance_score: serde_json::Number,
}

/// Parses the JSON object embedded in a model response.
///
/// The object may be surrounded by prose or a markdown fence; everything
/// from the first `{` to the last `}` is taken as the object. All three
/// fields are required. A fractional score is rounded.
pub fn parse_structured_analysis(response: &str) -> Result<AnalysisDraft, AnalysisParseError> {
    let start = response.find('{').ok_or(AnalysisParseError::NoJsonObject)?;
    let end = response.rfind('}').ok_or(AnalysisParseError::NoJsonObject)?;
    if end < start {
        return Err(AnalysisParseError::NoJsonObject);
    }

    let raw: RawAnalysis = serde_json::from_str(&response[start..=end])
        .map_err(|e| AnalysisParseError::InvalidShape(e.to_string()))?;

    let performance_score = match raw.performance_score.as_i64() {
        Some(score) => score,
        None => raw
            .performance_score
            .as_f64()
            .map(|f| f.round() as i64)
            .ok_or_else(|| {
                AnalysisParseError::InvalidShape("performance_score out of range".to_string())
            })?,
    };

    Ok(AnalysisDraft {
        analysis: raw.analysis,
        tips: raw.tips,
        performance_score,
    })
}
