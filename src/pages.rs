//! Server-rendered pages.
//!
//! Each page takes a typed view-model and returns a full HTML document.
//! User-supplied text always goes through `escape`; the result payload is
//! embedded as JSON with `<` escaped so it cannot break out of its script
//! element.

use serde::Serialize;

use crate::{database::DrawSummary, draw::Winner};

pub struct DashboardView {
    pub draws: Vec<DrawSummary>,
}

pub struct ResultView {
    pub title: String,
    pub winners: Vec<Winner>,
    pub labels: Vec<String>,
}

#[derive(Serialize)]
struct RevealPayload<'a> {
    winners: &'a [Winner],
    labels: &'a [String],
}

pub fn login_page(error: Option<&str>) -> String {
    let alert = match error {
        Some(message) => format!("<div class=\"alert\">{}</div>\n", escape(message)),
        None => String::new(),
    };

    let body = format!(
        r#"{alert}<form method="post" action="/admin/login" class="card">
  <label>Username</label>
  <input name="username" required placeholder="admin"/>
  <label>Password</label>
  <input name="password" type="password" required placeholder="********"/>
  <button type="submit">Sign in</button>
</form>"#
    );

    layout("Admin Login", &body)
}

pub fn dashboard_page(view: &DashboardView) -> String {
    let rows: String = view
        .draws
        .iter()
        .map(|draw| {
            format!(
                r#"        <tr>
          <td>{}</td>
          <td>{}</td>
          <td>{}</td>
          <td><a href="/r/{}" target="_blank">Open</a></td>
        </tr>
"#,
                escape(&draw.created_at),
                escape(draw.title.as_deref().unwrap_or("-")),
                draw.winners_count,
                escape(&draw.id),
            )
        })
        .collect();

    let body = format!(
        r#"<div class="card">
  <h2>New Draw</h2>
  <form method="post" action="/admin/create">
    <label>Title (optional)</label>
    <input name="title" placeholder="e.g. November Grand Draw"/>
    <div class="grid">
      <div>
        <label>Names (one per line)</label>
        <textarea name="names" rows="10" required placeholder="Full Name"></textarea>
      </div>
      <div>
        <label>Amounts (comma separated)</label>
        <input name="amounts" placeholder="50,100,200,500"/>
        <p class="muted">Left blank, every winner gets 100₺.</p>
        <label>Number of winners</label>
        <input name="winners" type="number" min="1" max="1000" value="15"/>
      </div>
    </div>
    <button type="submit">Run the draw</button>
  </form>
</div>

<div class="card">
  <h2>Recent Draws</h2>
  <table>
    <thead><tr><th>Date</th><th>Title</th><th>Winners</th><th>Link</th></tr></thead>
    <tbody>
{rows}    </tbody>
  </table>
</div>

<p><a href="/admin/logout">Sign out</a></p>"#
    );

    layout("Admin Dashboard", &body)
}

pub fn result_page(view: &ResultView) -> String {
    let payload = RevealPayload {
        winners: &view.winners,
        labels: &view.labels,
    };
    let data = serde_json::to_string(&payload)
        .unwrap_or_else(|_| "{}".to_string())
        .replace('<', "\\u003c");

    let body = format!(
        r#"<div class="card">
  <h2>{}</h2>
  <p class="muted">The reveal below is animated, but the outcome is fixed.</p>
  <div class="anim" id="animBox">Drawing winners...</div>
  <div id="tableBox" style="display:none">
    <table>
      <thead><tr><th>#</th><th>Name</th><th>Prize</th></tr></thead>
      <tbody id="rows"></tbody>
    </table>
  </div>
</div>
<script type="application/json" id="draw-data">{data}</script>
<script src="/public/app.js"></script>"#,
        escape(&view.title),
    );

    layout("Draw Result", &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"<div class="alert">Error: {}</div>
<a href="/admin">Go back</a>"#,
        escape(message),
    );

    layout("Error", &body)
}

pub fn not_found_page() -> String {
    layout("Not Found", r#"<div class="alert">Draw not found</div>"#)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<title>{title}</title>
<link rel="stylesheet" href="/public/style.css"/>
</head>
<body>
<div class="container">
  <header><h1>{title}</h1></header>
  {body}
  <footer><p class="muted">Grand Raffle</p></footer>
</div>
</body>
</html>"#,
        title = escape(title),
    )
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
