//! Content extraction functionality for the crawler module

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node};

static NEWLINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("newline pattern is valid"));

/// Extract the visible text of an HTML document
///
/// # Arguments
///
/// * `html` - The raw HTML of the page
/// * `exclude_tags` - Element names whose whole subtree is dropped
///
/// # Returns
///
/// Every remaining text node, trimmed, joined by newlines, with runs of
/// newlines collapsed to one
pub fn extract_visible_text(html: &str, exclude_tags: &[String]) -> String {
    let document = Html::parse_document(html);

    let mut fragments = Vec::new();
    collect_text(document.root_element(), exclude_tags, &mut fragments);

    let joined = fragments.join("\n");
    NEWLINE_RUNS.replace_all(&joined, "\n").into_owned()
}

fn collect_text(element: ElementRef<'_>, exclude_tags: &[String], out: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed.to_string());
                }
            }
            Node::Element(el) => {
                if exclude_tags.iter().any(|tag| tag.eq_ignore_ascii_case(el.name())) {
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, exclude_tags, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::config::default_exclude_tags;

    #[test]
    fn test_boilerplate_is_removed() {
        let html = r#"
            <html>
              <head><title>GM</title><meta name="description" content="cars"></head>
              <body>
                <nav><a href="/">Home</a></nav>
                <script>var tracking = 1;</script>
                <style>body { color: red; }</style>
                <h1>General Motors</h1>
                <p>We build   vehicles.</p>
                <footer>Copyright</footer>
              </body>
            </html>
        "#;

        let text = extract_visible_text(html, &default_exclude_tags());
        assert_eq!(text, "General Motors\nWe build   vehicles.");
    }

    #[test]
    fn test_blank_lines_are_collapsed() {
        let html = "<body><pre>first\n\n\n\nsecond</pre><p></p><p>   </p><p>third</p></body>";

        let text = extract_visible_text(html, &default_exclude_tags());
        assert_eq!(text, "first\nsecond\nthird");
    }

    #[test]
    fn test_comments_are_not_text() {
        let html = "<body><!-- hidden --><p>shown</p></body>";
        assert_eq!(extract_visible_text(html, &default_exclude_tags()), "shown");
    }

    #[test]
    fn test_custom_exclusions() {
        let html = "<body><aside>ads</aside><main>content</main></body>";
        let text = extract_visible_text(html, &["aside".to_string()]);
        assert_eq!(text, "content");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(extract_visible_text("", &default_exclude_tags()), "");
    }
}
