//! Page shell: document head, inline CSS and escaping

/// Wrap a rendered body in the full HTML document
pub fn render_page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Heart Disease Prediction</title>
    <style>{css}</style>
</head>
<body>
    <div class="block-container">
        <h1 class="title">🫀 Heart Disease Prediction App</h1>
        <p class="subtitle">Enter your health details to check risk.</p>
        {body}
    </div>
</body>
</html>"#,
        css = inline_css(),
        body = body,
    )
}

/// Escape text for HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn inline_css() -> &'static str {
    r#"
body {
    margin: 0;
    min-height: 100vh;
    font-family: Arial, Helvetica, sans-serif;
    background: linear-gradient(to right, #ffecd2 0%, #fcb69f 100%);
    background-attachment: fixed;
}
.block-container {
    max-width: 760px;
    margin: 2rem auto;
    backdrop-filter: blur(8px);
    background-color: rgba(255, 255, 255, 0.8);
    border-radius: 15px;
    padding: 2rem;
}
.title { text-align: center; color: red; }
.subtitle { text-align: center; }
.columns { display: flex; gap: 1.5rem; }
.columns > div { flex: 1; }
label { display: block; margin-top: 0.75rem; font-size: 14px; }
input[type=number], select { width: 100%; padding: 6px; box-sizing: border-box; }
input[type=range] { width: 100%; }
button { margin-top: 1rem; padding: 8px 16px; border-radius: 8px; border: 1px solid #ccc; cursor: pointer; }
.error { background-color: #f8d7da; padding: 12px; border-radius: 10px; margin: 1rem 0; }
.card { padding: 15px; border-radius: 10px; margin: 1rem 0; }
.summary { background-color: #f0f8ff; }
.guide { background-color: #fff3cd; border-left: 6px solid #ffeeba; }
.guide table { width: 100%; font-size: 14px; border-collapse: collapse; }
.guide th, .guide td { padding: 8px; border: 1px solid #ccc; }
.guide tr.head { background-color: #f8d7da; }
.dashboard { background-color: #f9f9f9; padding: 15px 20px; border-radius: 12px; box-shadow: 2px 2px 8px rgba(0,0,0,0.1); }
.dashboard h3 { color: #d63384; }
.dashboard ul { list-style-type: none; padding-left: 0; font-size: 16px; }
.banner-risk { background-color: #ffe5e5; border-left: 8px solid red; }
.banner-healthy { background-color: #e5ffe5; border-left: 8px solid green; }
.chart { display: block; margin: 1rem auto; }
"#
}
