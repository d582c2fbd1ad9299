use crate::domain::driftavbrott::Severity;
use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, RewriteStrSettings};

/// Prepends a banner carrying `message` as the first child of the document
/// body. Head-only documents get a body appended; anything without an
/// `<html>` element is wrapped in a minimal document.
pub fn annotate_html(html: &str, message: &str, severity: Severity) -> anyhow::Result<String> {
    let banner = banner_html(message, severity);

    let mut injected = false;
    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("body", |el| {
                el.prepend(&banner, ContentType::Html);
                injected = true;
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )?;
    if injected {
        return Ok(rewritten);
    }

    let with_body = rewrite_str(
        &rewritten,
        RewriteStrSettings {
            element_content_handlers: vec![element!("html", |el| {
                el.append(&format!("<body>{banner}</body>"), ContentType::Html);
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )?;
    // The append anchors on the closing tag, so a truncated document falls
    // through to the wrap below.
    if with_body.contains(&banner) {
        return Ok(with_body);
    }

    Ok(format!("<html><head></head><body>{banner}{rewritten}</body></html>"))
}

fn banner_html(message: &str, severity: Severity) -> String {
    let tone = match severity {
        Severity::Warn => "bg-warning",
        _ => "bg-info",
    };
    format!(
        r#"<div class="{tone} pt-2 pb-2 text-center">{}</div>"#,
        escape_text(message)
    )
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
