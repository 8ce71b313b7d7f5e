//! HTML to plain text

use scraper::{Html, Node};

/// Elements whose text never reaches the output
const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Extract readable text from an HTML page.
///
/// Text nodes are taken in document order (outside `script`/`style`), one
/// per line, then passed through [`clean_text`].
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = Vec::new();
    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if !skipped {
            raw.push(&**text);
        }
    }

    clean_text(&raw.join("\n"))
}

/// Trim every line, break lines into phrases on double spaces, and drop
/// everything that ends up empty. Phrases are joined with newlines.
pub fn clean_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
