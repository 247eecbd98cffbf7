//! Item handlers

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{Actor, ItemId};
use domain_items::{ItemStatus, UpdateItemRequest};

use crate::dto::items::*;
use crate::error::ApiError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::AppState;

type Viewer = Option<Extension<Actor>>;

fn viewer(ext: &Viewer) -> Option<&Actor> {
    ext.as_ref().map(|Extension(actor)| actor)
}

/// Lists items, filtered by the query string, newest first
pub async fn list_items(
    State(state): State<AppState>,
    actor: Viewer,
    AppQuery(params): AppQuery<ListItemsParams>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let query = params.into_query()?;
    let items = state.items.list_items(&query).await?;
    Ok(Json(ItemResponse::view_all(items, viewer(&actor))))
}

/// Lists items reported lost
pub async fn lost_items(
    State(state): State<AppState>,
    actor: Viewer,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let items = state.items.lost_items().await?;
    Ok(Json(ItemResponse::view_all(items, viewer(&actor))))
}

/// Lists the found pool, including claimed and returned items
pub async fn found_items(
    State(state): State<AppState>,
    actor: Viewer,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let items = state.items.found_items().await?;
    Ok(Json(ItemResponse::view_all(items, viewer(&actor))))
}

/// Lists items in one status
pub async fn items_by_status(
    State(state): State<AppState>,
    actor: Viewer,
    AppPath(status): AppPath<String>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let status: ItemStatus = status.parse()?;
    let items = state.items.items_by_status(status).await?;
    Ok(Json(ItemResponse::view_all(items, viewer(&actor))))
}

/// Dashboard counts
pub async fn stats(
    State(state): State<AppState>,
    actor: Viewer,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.items.stats().await?;
    Ok(Json(StatsResponse::view(stats, viewer(&actor))))
}

/// Gets an item by ID
pub async fn get_item(
    State(state): State<AppState>,
    actor: Viewer,
    AppPath(id): AppPath<ItemId>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = state.items.get_item(id).await?;
    Ok(Json(ItemResponse::view(item, viewer(&actor))))
}

/// Items in the opposite pool that may correspond to this one
pub async fn find_matches(
    State(state): State<AppState>,
    actor: Viewer,
    AppPath(id): AppPath<ItemId>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let matches = state.items.find_matches(id).await?;
    Ok(Json(ItemResponse::view_all(matches, viewer(&actor))))
}

/// Reports a found or lost item
pub async fn report_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppJson(request): AppJson<ReportItemRequest>,
) -> Result<(StatusCode, Json<ReportItemResponse>), ApiError> {
    let outcome = match request {
        ReportItemRequest::Found(report) => state.items.report_found(&actor, report).await?,
        ReportItemRequest::Lost(report) => state.items.report_lost(&actor, report).await?,
    };
    Ok((StatusCode::CREATED, Json(ReportItemResponse::view(outcome, &actor))))
}

/// Updates allow-listed item fields
pub async fn update_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(id): AppPath<ItemId>,
    AppJson(update): AppJson<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = state.items.update_item(&actor, id, update).await?;
    Ok(Json(ItemResponse::view(item, Some(&actor))))
}

/// Deletes an item
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(id): AppPath<ItemId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.items.delete_item(&actor, id).await?;
    Ok(Json(MessageResponse::new("Item deleted")))
}

/// Marks a claimed item as returned to its owner
pub async fn return_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(id): AppPath<ItemId>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = state.items.return_item(&actor, id).await?;
    Ok(Json(ItemResponse::view(item, Some(&actor))))
}

/// Marks a lost report as matched
pub async fn mark_matched(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppPath(id): AppPath<ItemId>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = state.items.mark_matched(&actor, id).await?;
    Ok(Json(ItemResponse::view(item, Some(&actor))))
}
