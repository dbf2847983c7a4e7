//! Researcher identity, joined metadata, and ranked results

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

pub const UNKNOWN_FACULTY: &str = "Unknown Faculty";
pub const UNKNOWN_DEPARTMENT: &str = "Unknown Department";
pub const UNKNOWN_CENTER: &str = "Unknown Center";

/// Whitespace-trimmed researcher name.
///
/// Every ingestion and lookup point goes through [`ResearcherId::new`], so
/// keys from different sources always join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResearcherId(String);

impl ResearcherId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResearcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ResearcherId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResearcherId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Denormalized metadata for one researcher, with sentinels filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearcherRecord {
    pub name: ResearcherId,
    pub faculty: String,
    pub department: String,
    pub research_center: String,
    /// Top topics, descending by weight
    pub focus_topics: Vec<String>,
}

impl ResearcherRecord {
    /// Record for a researcher absent from every metadata source
    pub fn unknown(name: ResearcherId) -> Self {
        Self {
            name,
            faculty: UNKNOWN_FACULTY.to_string(),
            department: UNKNOWN_DEPARTMENT.to_string(),
            research_center: UNKNOWN_CENTER.to_string(),
            focus_topics: Vec::new(),
        }
    }
}

/// One entry of a recommendation list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub name: ResearcherId,
    pub score: f64,
    pub faculty: String,
    pub department: String,
    pub research_center: String,
    pub focus_topics: Vec<String>,
}

impl RankedResult {
    pub fn new(score: f64, record: ResearcherRecord) -> Self {
        Self {
            name: record.name,
            score,
            faculty: record.faculty,
            department: record.department,
            research_center: record.research_center,
            focus_topics: record.focus_topics,
        }
    }
}

/// Outcome of a recommendation request.
///
/// Misconfiguration (unknown model or metric, missing vectors) is an expected
/// outcome and is reported as `Error` rather than as a failure.
///
/// Serializes as `{"recommendations": [...]}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationResponse {
    Recommendations(Vec<RankedResult>),
    Error(String),
}

impl RecommendationResponse {
    pub fn error(reason: impl Into<String>) -> Self {
        Self::Error(reason.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn results(&self) -> Option<&[RankedResult]> {
        match self {
            Self::Recommendations(results) => Some(results),
            Self::Error(_) => None,
        }
    }

    pub fn error_reason(&self) -> Option<&str> {
        match self {
            Self::Recommendations(_) => None,
            Self::Error(reason) => Some(reason),
        }
    }
}

/// Researcher entry in the faculty directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearcherInfo {
    pub name: ResearcherId,
    pub research_center: String,
    pub focus_topics: Vec<String>,
}

/// All researchers of one faculty, grouped by department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacultyData {
    pub faculty: String,
    pub departments: BTreeMap<String, Vec<ResearcherInfo>>,
}
