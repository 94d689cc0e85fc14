//! # Views
//!
//! Server-rendered HTML pages.
//!
//! Pages are plain `String`s assembled with `format!`. Every value that
//! comes from the database or the request goes through [`escape`] first.

pub mod layout;
pub mod sale_form;
pub mod sale_list;

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
