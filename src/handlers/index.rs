use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../files/public/index.html");

/// Serves the lookup form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
