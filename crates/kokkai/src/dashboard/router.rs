use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Json, Router,
};

use super::dataset::{Speech, SpeechTable};
use super::page::render_page;
use super::query::DashboardQuery;
use super::view::DashboardView;
use crate::error::AppError;

type QueryPairs = Query<Vec<(String, String)>>;

/// Dashboard page plus its JSON twins, all reading the same query string.
pub fn dashboard_router(table: Arc<SpeechTable>) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/api/v1/dashboard", get(dashboard_handler))
        .route("/api/v1/speeches", get(speeches_handler))
        .with_state(table)
}

pub(crate) async fn page_handler(
    State(table): State<Arc<SpeechTable>>,
    Query(pairs): QueryPairs,
) -> Result<Html<String>, AppError> {
    let query = DashboardQuery::from_pairs(&pairs)?;
    let view = DashboardView::build(&table, &query);
    Ok(Html(render_page(&view)))
}

pub(crate) async fn dashboard_handler(
    State(table): State<Arc<SpeechTable>>,
    Query(pairs): QueryPairs,
) -> Result<Json<DashboardView>, AppError> {
    let query = DashboardQuery::from_pairs(&pairs)?;
    Ok(Json(DashboardView::build(&table, &query)))
}

pub(crate) async fn speeches_handler(
    State(table): State<Arc<SpeechTable>>,
    Query(pairs): QueryPairs,
) -> Result<Json<Vec<Speech>>, AppError> {
    let query = DashboardQuery::from_pairs(&pairs)?;
    let speeches = query.filter.apply(&table).into_iter().cloned().collect();
    Ok(Json(speeches))
}
