//! Question and option text arrives as HTML from the quiz API and is treated
//! as untrusted.

/// Render untrusted HTML as a single line of plain text for the terminal.
///
/// Tags are removed (script and style bodies included), entities are decoded
/// and runs of whitespace collapse to one space.
#[must_use]
pub fn to_plain_text(html: &str) -> String {
    let cleaned = ammonia::Builder::empty()
        .clean_content_tags(["script", "style"].into_iter().collect())
        .clean(html)
        .to_string();

    // The serializer re-escapes only these; `&amp;` must go last.
    let decoded = cleaned
        .replace("&nbsp;", " ")
        .replace('\u{a0}', " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
