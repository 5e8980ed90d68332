//! HTML index generation.
//!
//! The index is a full regeneration every run — a pure function of the
//! flattened bookmark list, newest first — so there is no incremental state
//! to get wrong and two runs over the same tree produce byte-identical
//! output. Sorting uses `sort_by` (stable) so bookmarks sharing a date keep
//! their traversal order.

use crate::error::ArchiveError;
use crate::pipeline::walk::FlatBookmark;
use std::path::{Path, PathBuf};
use tracing::info;

/// Fixed index filename inside the output directory.
pub const INDEX_FILENAME: &str = "Bookmarks.html";

/// Render the index document for the given bookmarks.
///
/// The input order is the tree traversal order; it is the tie-break for
/// bookmarks sharing a date. The caller's slice is not mutated.
pub fn generate_index(bookmarks: &[FlatBookmark]) -> String {
    let mut sorted: Vec<&FlatBookmark> = bookmarks.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut html = String::from(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\
         <style>li { margin-bottom: 10px; }</style>\
         <title>Bookmarks</title></head><body><h1>Bookmarks</h1><ul>",
    );

    for bm in sorted {
        let date = bm.date.format("%m-%d-%Y");
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a>    {}</li>",
            escape_html(&bm.url),
            escape_html(&bm.name),
            date
        ));
    }

    html.push_str("</ul></body></html>");
    html
}

/// Write the index to `<output_dir>/Bookmarks.html`, overwriting any prior
/// version. Returns the path written.
pub async fn write_index(output_dir: &Path, html: &str) -> Result<PathBuf, ArchiveError> {
    let path = output_dir.join(INDEX_FILENAME);
    tokio::fs::write(&path, html)
        .await
        .map_err(|e| ArchiveError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;
    info!("Index written: {}", path.display());
    Ok(path)
}

/// Minimal escaping for text and attribute positions. Bookmark names come
/// from page titles, which routinely contain `&` and `<`.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn bm(name: &str, url: &str, date: DateTime<Utc>) -> FlatBookmark {
        FlatBookmark {
            name: name.into(),
            url: url.into(),
            date,
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 9, 30, 0).unwrap()
    }

    #[test]
    fn newest_first() {
        let input = vec![
            bm("oldest", "http://a", day(1)),
            bm("newest", "http://b", day(20)),
            bm("middle", "http://c", day(10)),
        ];
        let html = generate_index(&input);
        let p_new = html.find("newest").unwrap();
        let p_mid = html.find("middle").unwrap();
        let p_old = html.find("oldest").unwrap();
        assert!(p_new < p_mid && p_mid < p_old, "expected descending order");
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let input = vec![
            bm("first", "http://a", day(5)),
            bm("second", "http://b", day(5)),
        ];
        let html = generate_index(&input);
        assert!(html.find("first").unwrap() < html.find("second").unwrap());
    }

    #[test]
    fn byte_identical_across_calls() {
        let input = vec![
            bm("a", "http://a", day(3)),
            bm("b", "http://b", day(7)),
        ];
        assert_eq!(generate_index(&input), generate_index(&input));
    }

    #[test]
    fn date_is_month_day_year() {
        let input = vec![bm("x", "http://x", day(5))];
        let html = generate_index(&input);
        assert!(html.contains("03-05-2024"), "got: {html}");
    }

    #[test]
    fn link_uses_url_with_name_as_text() {
        let input = vec![bm("Example", "http://example.com", day(5))];
        let html = generate_index(&input);
        assert!(html.contains("<a href=\"http://example.com\">Example</a>"));
    }

    #[test]
    fn names_are_escaped() {
        let input = vec![bm("Tips & <tricks>", "http://t", day(5))];
        let html = generate_index(&input);
        assert!(html.contains("Tips &amp; &lt;tricks&gt;"));
        assert!(!html.contains("<tricks>"));
    }

    #[test]
    fn empty_input_still_renders_shell() {
        let html = generate_index(&[]);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Bookmarks</h1><ul></ul>"));
    }

    #[tokio::test]
    async fn write_overwrites_prior_version() {
        let dir = tempfile::tempdir().unwrap();
        write_index(dir.path(), "old").await.unwrap();
        let path = write_index(dir.path(), "new").await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "new");
    }
}
