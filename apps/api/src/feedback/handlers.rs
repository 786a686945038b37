use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::feedback::{average_rating, FeedbackEntry, FeedbackRole};
use crate::state::AppState;
use crate::store::StoreError;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub name: String,
    pub role: FeedbackRole,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackSubmitted {
    pub index: usize,
    pub entry: FeedbackEntry,
}

#[derive(Debug, Serialize)]
pub struct FeedbackListResponse {
    pub entries: Vec<FeedbackEntry>,
    pub average_rating: Option<f64>,
}

/// POST /api/v1/feedback
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackSubmitted>, AppError> {
    let entry = FeedbackEntry {
        name: req.name.trim().to_string(),
        role: req.role,
        rating: req.rating,
        comment: req.comment,
    };

    // Rating bounds are enforced by the feedback schema on append.
    let record = entry.to_record();
    let index = state
        .feedback
        .modify(move |table| {
            let next = table.append(record)?;
            let index = next.len() - 1;
            Ok((Some(next), index))
        })
        .await?;

    info!("Recorded feedback #{index} ({} stars)", entry.rating);
    Ok(Json(FeedbackSubmitted { index, entry }))
}

/// GET /api/v1/feedback
pub async fn handle_list_feedback(
    State(state): State<AppState>,
) -> Result<Json<FeedbackListResponse>, AppError> {
    let table = state.feedback.read().await?;
    let entries = table
        .records()
        .iter()
        .map(FeedbackEntry::from_record)
        .collect::<Result<Vec<_>, StoreError>>()?;
    let average_rating = average_rating(&entries);

    Ok(Json(FeedbackListResponse {
        entries,
        average_rating,
    }))
}
