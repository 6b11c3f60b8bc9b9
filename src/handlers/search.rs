// Search handlers: engine listing and the redirect endpoint

use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect},
    Json,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::{
    domain::{PageContext, SearchEngine},
    error::AppError,
    AppState,
};

/// Bytes a Location header cannot carry as-is. Non-ASCII is always escaped.
const LOCATION_UNSAFE: &AsciiSet = &CONTROLS.add(b' ');

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    engines: Vec<EngineRow>,
}

struct EngineRow {
    alias: String,
    name: String,
    url: String,
    description: String,
}

// Query parameters for /search
#[derive(Deserialize)]
pub struct SearchParams {
    engine: String,
    #[serde(default)]
    text: String,
    page: Option<String>,
}

// GET / - List engines and their templates
pub async fn index(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let engines = state
        .catalog
        .engines()
        .into_iter()
        .map(|engine| EngineRow {
            alias: engine.alias.clone(),
            name: engine.name.clone(),
            url: engine.url.clone(),
            description: engine.description.clone().unwrap_or_default(),
        })
        .collect();

    let template = IndexTemplate { engines };
    Ok(Html(template.render()?))
}

// GET /engines - Engine catalog as JSON
pub async fn list_engines(State(state): State<Arc<AppState>>) -> Json<Vec<SearchEngine>> {
    Json(state.catalog.engines().into_iter().cloned().collect())
}

// GET /search?engine=..&text=..&page=.. - Redirect to the engine's URL for the selection
pub async fn search(
    Query(params): Query<SearchParams>,
    State(state): State<Arc<AppState>>,
) -> Result<Redirect, AppError> {
    let engine = state
        .catalog
        .get(&params.engine)
        .ok_or_else(|| AppError::NotFound(format!("Unknown engine: '{}'", params.engine)))?;

    let page = params
        .page
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(PageContext::from_url)
        .transpose()?;

    let redirect_url = engine.build_url(&params.text, page.as_ref());
    info!(engine = %engine.alias, "redirecting selection search");

    // Unencoded chains (`disableuriencoding`, `encode: false`) may leave raw text behind
    let location = utf8_percent_encode(&redirect_url, LOCATION_UNSAFE).to_string();
    Ok(Redirect::to(&location))
}
