use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::search_dto::{SearchFilters, SearchParams, SearchResponse},
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/search",
    params(
        ("q" = Option<String>, Query, description = "Free-text query"),
        ("skills" = Option<String>, Query, description = "Comma-separated skill tags"),
        ("location" = Option<String>, Query, description = "Location substring"),
        ("sort" = Option<String>, Query, description = "relevance | likes | recent"),
        ("min_years" = Option<String>, Query, description = "Minimum seniority, clamped to 0..50"),
        ("language_code" = Option<String>, Query, description = "Language code filter"),
        ("language_min_level" = Option<String>, Query, description = "Minimum CEFR level"),
        ("remote_ok" = Option<String>, Query, description = "Only remote-friendly candidates"),
        ("relocation_ok" = Option<String>, Query, description = "Only relocation-friendly candidates")
    ),
    responses(
        (status = 200, description = "Ranked candidate summaries")
    )
)]
#[axum::debug_handler]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse> {
    let filters = SearchFilters::from_params(&params);
    let served = state.search_service.search(&filters).await?;
    Ok(Json(SearchResponse {
        note: served.note(),
        items: served.value,
    }))
}
