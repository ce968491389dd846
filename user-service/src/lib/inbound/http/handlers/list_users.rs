use std::collections::HashMap;

use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::map_user_error;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::query::list_query_from_params;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ApiSuccess<ListUsersResponseData>, ApiError> {
    let query = list_query_from_params(&params);
    let page = query.page;
    let per_page = query.per_page;

    let result = state
        .user_service
        .list_users(query)
        .await
        .map_err(|e| map_user_error(e, "Failed to retrieve users"))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "OK",
        ListUsersResponseData {
            records: result.records.iter().map(UserData::from).collect(),
            metadata: ListMetadata {
                page,
                per_page,
                page_count: result.page_count,
                total_count: result.total_count,
            },
        },
    ))
}

#[derive(Debug, Clone, Serialize)]
pub struct ListUsersResponseData {
    pub records: Vec<UserData>,
    pub metadata: ListMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListMetadata {
    pub page: i64,
    pub per_page: i64,
    pub page_count: i64,
    pub total_count: i64,
}
