//! Faculty directory endpoints
//!
//! - `GET /faculties` - Known faculty names
//! - `GET /faculty-data/:faculty` - Researchers of one faculty by department

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use resmatch_core::FacultyData;
use serde::{Deserialize, Serialize};

use crate::{AppState, HttpError};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/faculties", get(list_faculties))
        .route("/faculty-data/:faculty", get(faculty_data))
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FacultiesResponse {
    pub faculties: Vec<String>,
}

async fn list_faculties(State(state): State<AppState>) -> Json<FacultiesResponse> {
    Json(FacultiesResponse {
        faculties: state.engine.faculties(),
    })
}

/// # Errors
///
/// - `FACULTY_NOT_FOUND`: no researcher belongs to the faculty
async fn faculty_data(
    State(state): State<AppState>,
    Path(faculty): Path<String>,
) -> Result<Json<FacultyData>, HttpError> {
    state.engine.faculty_data(&faculty).map(Json).ok_or_else(|| {
        HttpError::new(
            format!("Faculty not found: {}", faculty),
            "FACULTY_NOT_FOUND",
        )
    })
}
