use std::fmt::Write;

use crate::translate::Language;

const STYLE: &str = include_str!("style.css");
const TITLE: &str = "Chat-Mate...your trusted translator";
const DESCRIPTION: &str =
    "Enter your text, select a target language, and get your translation instantly.";
const FOOTER: &str = "&copy; Raunak-2024 | Made in India";

/// Render the translator page. `output` is `None` when no request was made.
pub fn render(text: &str, language: Language, output: Option<&str>) -> String {
    let mut options = String::new();
    for candidate in Language::ALL {
        let selected = if candidate == language { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{name}"{selected}>{name}</option>"#,
            name = candidate.as_str()
        );
    }

    let output_block = output
        .map(|o| format!(r#"<div class="output-container">{}</div>"#, escape_html(o)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Language Translator</title>
<style>{STYLE}</style>
</head>
<body>
<div class="main">
<div class="title">{TITLE}</div>
<div class="description">{DESCRIPTION}</div>
<form method="get" action="/">
<label for="text">Enter the text:</label>
<div class="field"><input id="text" name="text" type="text" placeholder="Type your text here..." value="{text}" onchange="this.form.submit()" autofocus></div>
<label for="language">Select the target language</label>
<div class="field"><select id="language" name="language" onchange="this.form.submit()">{options}</select></div>
</form>
{output_block}
<div class="footer">{FOOTER}</div>
</div>
</body>
</html>
"#,
        text = escape_html(text),
    )
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
