use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// GET /
///
/// The single-page answer form. All state changes go through `/api/session`; the
/// page renders statuses and feedback inline from the JSON envelope.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
