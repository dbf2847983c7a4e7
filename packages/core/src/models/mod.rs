//! Data Models
//!
//! - `ResearcherId` - normalized researcher key shared by every source
//! - `ModelIdentifier` / `MetricIdentifier` - request selectors
//! - `ResearcherRecord`, `RankedResult` - joined metadata and ranked output
//! - `FacultyData` - faculty directory view

mod identifiers;
mod researcher;

pub use identifiers::{MetricIdentifier, ModelIdentifier, SortOrder};
pub use researcher::{
    FacultyData, RankedResult, RecommendationResponse, ResearcherId, ResearcherInfo,
    ResearcherRecord, UNKNOWN_CENTER, UNKNOWN_DEPARTMENT, UNKNOWN_FACULTY,
};
