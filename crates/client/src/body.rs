//! Episode body extraction.
//!
//! Bodies are paragraph elements inside a `.widget-episodeBody` container,
//! each carrying an id whose numeric suffix is the line number.

use std::sync::LazyLock;

use episearch_core::{Error, Line};
use regex::Regex;
use scraper::{Html, Selector};

static EPISODE_BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".widget-episodeBody").expect("invalid selector"));
static NUMBERED_PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p[id]").expect("invalid selector"));
static LINE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("invalid regex"));

/// Lazily yield the numbered lines of an episode page.
///
/// Paragraphs whose id has no parseable number are skipped; that is source
/// noise, not an error. Whitespace-only bodies are the caller's concern.
/// Calling again on the same document restarts the sequence.
///
/// # Errors
///
/// Returns `MalformedBodyElement` if the page has no episode body
/// container.
pub fn body_lines(doc: &Html) -> Result<impl Iterator<Item = Line> + '_, Error> {
    let container = doc
        .select(&EPISODE_BODY)
        .next()
        .ok_or_else(|| Error::MalformedBodyElement("episode body container not found".to_string()))?;

    Ok(container.select(&NUMBERED_PARAGRAPH).filter_map(|paragraph| {
        let id = paragraph.value().attr("id")?;
        let number = LINE_ID.find(id)?.as_str().parse().ok()?;
        Some(Line { number, body: paragraph.text().collect() })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPISODE_HTML: &str = r#"
        <html><body>
        <div class="widget-episodeBody">
            <p id="p1">First line.</p>
            <p id="p2">Second line.</p>
            <p id="intro">No number here.</p>
            <p>No id at all.</p>
            <p id="p5">   </p>
            <p id="p12">Twelfth line.</p>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_numbered_lines() {
        let doc = Html::parse_document(EPISODE_HTML);
        let lines: Vec<Line> = body_lines(&doc).unwrap().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], Line { number: 1, body: "First line.".to_string() });
        assert_eq!(lines[1], Line { number: 2, body: "Second line.".to_string() });
        assert_eq!(lines[3], Line { number: 12, body: "Twelfth line.".to_string() });
    }

    #[test]
    fn test_whitespace_bodies_are_not_filtered_here() {
        let doc = Html::parse_document(EPISODE_HTML);
        let lines: Vec<Line> = body_lines(&doc).unwrap().collect();

        assert!(lines.iter().any(|line| line.number == 5 && line.body.trim().is_empty()));
    }

    #[test]
    fn test_line_numbers_need_not_be_contiguous() {
        let doc = Html::parse_document(EPISODE_HTML);
        let numbers: Vec<u32> = body_lines(&doc).unwrap().map(|line| line.number).collect();
        assert_eq!(numbers, vec![1, 2, 5, 12]);
    }

    #[test]
    fn test_missing_container_is_an_error() {
        let doc = Html::parse_document("<html><body><p id='p1'>stray</p></body></html>");
        let result = body_lines(&doc).map(|lines| lines.count());
        assert!(matches!(result, Err(Error::MalformedBodyElement(_))));
    }

    #[test]
    fn test_restartable_from_source() {
        let doc = Html::parse_document(EPISODE_HTML);
        let first: Vec<Line> = body_lines(&doc).unwrap().collect();
        let second: Vec<Line> = body_lines(&doc).unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_nested_markup_text_is_concatenated() {
        let html = r#"
            <div class="widget-episodeBody">
                <p id="p1">Before <em>emphasis</em> after.</p>
            </div>
        "#;
        let doc = Html::parse_document(html);
        let lines: Vec<Line> = body_lines(&doc).unwrap().collect();
        assert_eq!(lines[0].body, "Before emphasis after.");
    }
}
