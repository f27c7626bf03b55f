//! Embedded calculator page.

/// The single-page UI: keypad, browser speech input/output, and local
/// history. Served verbatim from `GET /`.
pub const INDEX_HTML: &str = include_str!("../../static/index.html");
