//! Claims handlers

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{Actor, ItemId};
use domain_claims::{ClaimAttempt, ReviewSheet, SubmitClaim};

use crate::dto::claims::*;
use crate::dto::items::ItemResponse;
use crate::error::ApiError;
use crate::extract::{AppJson, AppPath};
use crate::AppState;

/// Submits a claim with answers to the item's questions
pub async fn submit_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(item_id): AppPath<ItemId>,
    AppJson(submission): AppJson<SubmitClaim>,
) -> Result<(StatusCode, Json<ClaimOutcomeResponse>), ApiError> {
    let outcome = state.claims.submit_claim(&actor, item_id, submission).await?;
    Ok((StatusCode::CREATED, Json(ClaimOutcomeResponse::view(outcome, &actor))))
}

/// Approves or rejects a pending claim
pub async fn review_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(item_id): AppPath<ItemId>,
    AppJson(request): AppJson<ReviewClaimRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let outcome = state
        .claims
        .review_claim(&actor, item_id, request.claim_id, request.decision, request.response)
        .await?;
    Ok(Json(ItemResponse::view(outcome.item, Some(&actor))))
}

/// Claims on an item visible to the caller
pub async fn claims_for_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(item_id): AppPath<ItemId>,
) -> Result<Json<Vec<ClaimAttempt>>, ApiError> {
    let claims = state.claims.claims_for_item(&actor, item_id).await?;
    Ok(Json(claims))
}

/// The caller's own claims, newest first
pub async fn my_claims(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ClaimAttempt>>, ApiError> {
    let claims = state.claims.my_claims(&actor).await?;
    Ok(Json(claims))
}

/// Pending claims the caller may decide
pub async fn review_queue(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ReviewSheet>>, ApiError> {
    let sheets = state.claims.review_queue(&actor).await?;
    Ok(Json(sheets))
}
