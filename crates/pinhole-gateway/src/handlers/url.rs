use crate::error::{AppError, Result};
use crate::handlers::host::base_url;
use crate::model::ShortenForm;
use crate::state::AppState;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query, State};
use axum::http::{header, HeaderMap, StatusCode, Uri as RequestUri};
use axum::response::{Html, IntoResponse, Response};
use pinhole_core::Uri;
use tracing::debug;

const LANDING_PAGE: &str = include_str!("../../assets/index.html");

/// `POST /shorten/`: answers `201 Created` with the short link in `Location`.
///
/// `url` is read from the form body, falling back to the query string.
pub async fn shorten_post_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ShortenForm>,
    body: std::result::Result<Form<ShortenForm>, FormRejection>,
) -> Result<Response> {
    let form = match body {
        Ok(Form(form)) if !form.url.is_empty() => form,
        _ => query,
    };
    let location = shorten(&state, &headers, form).await?;
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
}

/// `GET /shorten/?url=...`: answers `201 Created` with the short link as body.
pub async fn shorten_get_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ShortenForm>,
) -> Result<Response> {
    let location = shorten(&state, &headers, form).await?;
    Ok((StatusCode::CREATED, location).into_response())
}

async fn shorten(state: &AppState, headers: &HeaderMap, form: ShortenForm) -> Result<String> {
    if form.url.is_empty() {
        return Err(AppError::MissingUrl);
    }

    let uri = state.storage().put(&form.url, state.ttl()).await?;
    let location = uri.to_url(&base_url(headers, state.hostname()));

    debug!(uri = %uri, url = %form.url, "shortened url");
    Ok(location)
}

/// Every other path: redirect if it names a live short link.
pub async fn expand_handler(
    State(state): State<AppState>,
    request_uri: RequestUri,
) -> Result<Response> {
    let path = request_uri.path();
    if path == "/" {
        return Ok(Html(LANDING_PAGE).into_response());
    }

    let uri = Uri::parse(path);
    match state.storage().get(&uri).await? {
        Some(url) => Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}
