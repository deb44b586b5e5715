//! Minimal markdown-to-HTML conversion: `#` headers, bullet lists, `**bold**`,
//! blank-line paragraphs. Used for generic sections and as the degraded
//! rendering for every other formatter. Never fails.

use crate::document::markup::{inline_markup, is_numbered, strip_bullet, Markup};
use crate::document::formatters::FormatResult;

pub fn format_generic(content: &str) -> FormatResult {
    Ok(markdown_to_html(content))
}

pub fn markdown_to_html(content: &str) -> Markup {
    let mut html = String::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut list_open = false;

    for line in content.lines().map(str::trim) {
        if line.is_empty() {
            flush_paragraph(&mut html, &mut paragraph);
            close_list(&mut html, &mut list_open);
            continue;
        }

        if let Some((level, text)) = heading(line) {
            flush_paragraph(&mut html, &mut paragraph);
            close_list(&mut html, &mut list_open);
            html.push_str(&format!("<h{level}>{}</h{level}>", inline_markup(text)));
            continue;
        }

        let item = strip_bullet(line).or_else(|| numbered_text(line));
        match item {
            Some(text) => {
                flush_paragraph(&mut html, &mut paragraph);
                if !list_open {
                    html.push_str("<ul>");
                    list_open = true;
                }
                html.push_str(&format!("<li>{}</li>", inline_markup(text)));
            }
            None => {
                close_list(&mut html, &mut list_open);
                paragraph.push(line);
            }
        }
    }

    flush_paragraph(&mut html, &mut paragraph);
    close_list(&mut html, &mut list_open);
    Markup(html)
}

/// `#`..`######` headings render as `h3`..`h6`; section titles own `h2`.
fn heading(line: &str) -> Option<(usize, &str)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let text = line[hashes..].strip_prefix(' ')?.trim();
    if text.is_empty() {
        return None;
    }
    Some(((hashes + 2).min(6), text))
}

fn numbered_text(line: &str) -> Option<&str> {
    if !is_numbered(line) {
        return None;
    }
    line.find(|c: char| c == '.' || c == ')')
        .map(|idx| line[idx + 1..].trim_start())
}

fn flush_paragraph(html: &mut String, paragraph: &mut Vec<&str>) {
    if paragraph.is_empty() {
        return;
    }
    html.push_str(&format!("<p>{}</p>", inline_markup(&paragraph.join(" "))));
    paragraph.clear();
}

fn close_list(html: &mut String, list_open: &mut bool) {
    if *list_open {
        html.push_str("</ul>");
        *list_open = false;
    }
}
