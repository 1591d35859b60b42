//! Markdown to HTML conversion with GitHub Flavored Markdown support.

use comrak::{markdown_to_html, Options};

/// Render Markdown to HTML.
///
/// Enables the GFM extensions the docs repository relies on: tables,
/// strikethrough, autolinks, task lists and footnotes. Raw HTML is passed
/// through since the content repository is trusted. Never fails; malformed
/// Markdown just renders imperfectly.
pub fn convert_to_html(markdown: &str) -> String {
    markdown_to_html(markdown, &render_options())
}

fn render_options() -> Options<'static> {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    options.render.unsafe_ = true;

    options
}
