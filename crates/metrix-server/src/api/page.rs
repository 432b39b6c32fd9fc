//! HTML listing of every stored metric (`GET /`).

use std::fmt::Write;

use axum::{extract::State, response::Html};

use crate::app_state::AppState;
use crate::storage::MetricsSnapshot;

pub async fn index(State(app): State<AppState>) -> Html<String> {
    Html(render(&app.dispatcher().snapshot()))
}

pub fn render(snap: &MetricsSnapshot) -> String {
    let mut rows = String::new();
    for (name, value) in snap.iter() {
        let _ = writeln!(
            rows,
            "      <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            html_escape(name),
            value.kind(),
            value
        );
    }

    format!(
        "<!DOCTYPE html>
<html>
  <head><meta charset=\"utf-8\"><title>metrix</title></head>
  <body>
    <h2>Metrics List</h2>
    <table>
      <tr><th>Name</th><th>Type</th><th>Value</th></tr>
{rows}    </table>
  </body>
</html>
"
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
