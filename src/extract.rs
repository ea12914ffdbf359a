//! Document text extraction for HTML and PDF content.
//!
//! The HTML backend walks the parsed tree collecting visible text (anything
//! outside `script`/`style` subtrees), then tidies the result: lines are
//! trimmed, run-together headlines are split on internal double-space
//! boundaries, and blank fragments are dropped. Pages that link to PDFs get
//! one level of link-following: each `a[href]` whose target contains "pdf"
//! is fetched and its extracted text appended after the page text.
//!
//! The PDF backend reads pages in page order. Encrypted documents and
//! unparseable bytes degrade to literal marker strings instead of errors so
//! that a document always yields *some* body value.

use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};
use tracing::{debug, error, warn};
use url::Url;

/// Marker returned for PDFs that cannot be decrypted.
pub const ENCRYPTED_PDF_MARKER: &str = "PDF is encrypted, cannot extract text";
/// Marker returned when PDF parsing or text extraction fails outright.
pub const PDF_ERROR_MARKER: &str = "Error extracting text from PDF";

/// Extract visible text from an HTML document.
///
/// Script and style subtrees are skipped entirely. The collected text is
/// split into lines, each line is trimmed and further split on internal
/// double-space runs (which separate headlines the markup ran together),
/// empty fragments are dropped, and the rest is rejoined with single
/// newlines.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    for node in document.root_element().descendants() {
        if let Some(text) = node.value().as_text() {
            if in_hidden_subtree(&node) {
                continue;
            }
            raw.push_str(&text.text);
        }
    }

    let mut chunks: Vec<&str> = Vec::new();
    for line in raw.lines() {
        for phrase in line.trim().split("  ") {
            let phrase = phrase.trim();
            if !phrase.is_empty() {
                chunks.push(phrase);
            }
        }
    }
    chunks.join("\n")
}

/// Check whether a node sits under a `script` or `style` element.
fn in_hidden_subtree(node: &NodeRef<'_, Node>) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if let Some(elem) = parent.value().as_element() {
            if matches!(elem.name(), "script" | "style") {
                return true;
            }
        }
        current = parent.parent();
    }
    false
}

/// Collect the targets of anchors pointing at PDF documents.
///
/// Only elements that actually carry an `href` are considered; relative
/// targets are resolved against `base` when one is available, and dropped
/// when they cannot be resolved.
pub fn linked_pdf_urls(html: &str, base: Option<&Url>) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a[href]").unwrap();

    let mut urls = Vec::new();
    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !href.contains("pdf") {
            continue;
        }
        match base {
            Some(base) => match base.join(href) {
                Ok(resolved) => urls.push(resolved.to_string()),
                Err(e) => debug!(href, error = %e, "Skipping unresolvable PDF link"),
            },
            None => {
                if Url::parse(href).is_ok() {
                    urls.push(href.to_string());
                } else {
                    debug!(href, "Skipping relative PDF link with no base URL");
                }
            }
        }
    }
    urls
}

/// Extract text from PDF bytes, page by page in page order.
///
/// Encrypted documents return [`ENCRYPTED_PDF_MARKER`]; documents that fail
/// to parse return [`PDF_ERROR_MARKER`]. A page whose text cannot be
/// extracted is logged and skipped without aborting the remaining pages.
pub fn pdf_text(bytes: &[u8]) -> String {
    let document = match lopdf::Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(e) => {
            error!(error = %e, "Failed to parse PDF document");
            return PDF_ERROR_MARKER.to_string();
        }
    };

    if document.is_encrypted() {
        warn!("PDF is encrypted, cannot extract text");
        return ENCRYPTED_PDF_MARKER.to_string();
    }

    let mut text = String::new();
    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Err(e) => warn!(page = page_number, error = %e, "Failed to extract PDF page text"),
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_skips_script_and_style() {
        let html = r#"
            <html><head>
                <style>body { color: red; }</style>
                <script>var tracking = "beacon";</script>
            </head><body>
                <h1>Headline</h1>
                <p>First paragraph.</p>
            </body></html>
        "#;
        let text = visible_text(html);
        assert!(text.contains("Headline"));
        assert!(text.contains("First paragraph."));
        assert!(!text.contains("beacon"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn test_visible_text_splits_run_together_headlines() {
        let html = "<body><div>First headline  Second headline</div></body>";
        assert_eq!(visible_text(html), "First headline\nSecond headline");
    }

    #[test]
    fn test_visible_text_drops_blank_lines() {
        let html = "<body>\n\n  <p>Only line</p>\n\n   \n</body>";
        assert_eq!(visible_text(html), "Only line");
    }

    #[test]
    fn test_linked_pdf_urls_resolves_against_base() {
        let base = Url::parse("https://example.com/reports/").unwrap();
        let html = r#"
            <a href="annual.pdf">Annual report</a>
            <a href="/docs/q3-report.pdf">Q3</a>
            <a href="https://other.org/w.pdf">External</a>
            <a href="/about">About</a>
        "#;
        let urls = linked_pdf_urls(html, Some(&base));
        assert_eq!(
            urls,
            vec![
                "https://example.com/reports/annual.pdf",
                "https://example.com/docs/q3-report.pdf",
                "https://other.org/w.pdf",
            ]
        );
    }

    #[test]
    fn test_linked_pdf_urls_skips_anchor_without_target() {
        let html = r#"<a name="pdf-section">PDF downloads</a><a href="x.pdf">x</a>"#;
        let base = Url::parse("https://example.com/").unwrap();
        let urls = linked_pdf_urls(html, Some(&base));
        assert_eq!(urls, vec!["https://example.com/x.pdf"]);
    }

    #[test]
    fn test_linked_pdf_urls_without_base_keeps_only_absolute() {
        let html = r#"<a href="relative.pdf">r</a><a href="https://a.com/b.pdf">a</a>"#;
        let urls = linked_pdf_urls(html, None);
        assert_eq!(urls, vec!["https://a.com/b.pdf"]);
    }

    #[test]
    fn test_pdf_text_on_garbage_bytes_returns_marker() {
        assert_eq!(pdf_text(b"this is not a pdf"), PDF_ERROR_MARKER);
    }

    #[test]
    fn test_pdf_text_on_encrypted_document_returns_marker() {
        use lopdf::{Document, Object, StringFormat, dictionary};

        // A minimal document whose trailer carries a standard-security
        // /Encrypt dictionary. The O/U values are not valid keys; parsing
        // still succeeds and the document reports itself encrypted.
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(vec![]),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "P" => -44,
            "O" => Object::String(vec![0u8; 32], StringFormat::Hexadecimal),
            "U" => Object::String(vec![0u8; 32], StringFormat::Hexadecimal),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Encrypt", encrypt_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        assert_eq!(pdf_text(&bytes), ENCRYPTED_PDF_MARKER);
    }
}
