//! Channel Handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::application::dto::{ChannelDetails, ChannelSummary};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// List every configured channel with its current member count
pub async fn list_channels(State(state): State<AppState>) -> Json<Vec<ChannelSummary>> {
    Json(state.registry.list_channels())
}

/// Describe one channel
pub async fn get_channel(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<Json<ChannelDetails>, AppError> {
    state
        .registry
        .describe(&channel_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Channel not found".into()))
}
