//! Tree traversal: candidate selection and flat projection.
//!
//! Both operations walk the bookmark tree depth-first in document order
//! (children in the order Chrome stored them). They differ only in what they
//! keep:
//!
//! * [`collect_candidates`] applies the archiving gate — the only business
//!   logic in this crate. A url node qualifies iff **both** hold:
//!   its date is within the trailing window ending at `now`
//!   (`date >= now - window`), **and** its date is strictly newer than the
//!   last-run watermark (`date > last_run`). A bookmark added ten days ago is
//!   excluded even when the watermark is older; one added since the watermark
//!   but outside the window is excluded too.
//!
//! * [`flatten`] keeps every url node unconditionally — the HTML index always
//!   covers the whole tree, not just this run's additions.

use crate::error::ArchiveError;
use crate::pipeline::store::BookmarkNode;
use crate::pipeline::timestamp::chrome_time_to_utc;
use chrono::{DateTime, Duration, Utc};

/// A url bookmark that passed the archiving gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub url: String,
    pub date: DateTime<Utc>,
}

/// A url bookmark projected for the index, filter-free.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatBookmark {
    pub name: String,
    pub url: String,
    pub date: DateTime<Utc>,
}

/// Select the bookmarks to archive from one root's children.
///
/// Appends to `out` in traversal order so the caller can accumulate across
/// the three roots in their fixed order.
pub fn collect_candidates(
    nodes: &[&BookmarkNode],
    now: DateTime<Utc>,
    last_run: DateTime<Utc>,
    window: Duration,
    out: &mut Vec<Candidate>,
) -> Result<(), ArchiveError> {
    let window_start = now - window;
    for node in nodes {
        visit_candidates(node, window_start, last_run, out)?;
    }
    Ok(())
}

fn visit_candidates(
    node: &BookmarkNode,
    window_start: DateTime<Utc>,
    last_run: DateTime<Utc>,
    out: &mut Vec<Candidate>,
) -> Result<(), ArchiveError> {
    match node {
        BookmarkNode::Folder { children, .. } => {
            for child in children {
                visit_candidates(child, window_start, last_run, out)?;
            }
        }
        BookmarkNode::Url {
            name,
            url,
            date_added,
        } => {
            let date = chrome_time_to_utc(*date_added)?;
            if date >= window_start && date > last_run {
                out.push(Candidate {
                    name: name.clone(),
                    url: url.clone(),
                    date,
                });
            }
        }
    }
    Ok(())
}

/// Project every url node into a [`FlatBookmark`], folders ignored.
pub fn flatten(nodes: &[&BookmarkNode]) -> Result<Vec<FlatBookmark>, ArchiveError> {
    let mut out = Vec::new();
    for node in nodes {
        visit_flatten(node, &mut out)?;
    }
    Ok(out)
}

fn visit_flatten(node: &BookmarkNode, out: &mut Vec<FlatBookmark>) -> Result<(), ArchiveError> {
    match node {
        BookmarkNode::Folder { children, .. } => {
            for child in children {
                visit_flatten(child, out)?;
            }
        }
        BookmarkNode::Url {
            name,
            url,
            date_added,
        } => {
            out.push(FlatBookmark {
                name: name.clone(),
                url: url.clone(),
                date: chrome_time_to_utc(*date_added)?,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::timestamp::tests_support::utc_to_chrome_micros;
    use chrono::TimeZone;

    fn url(name: &str, date: DateTime<Utc>) -> BookmarkNode {
        BookmarkNode::Url {
            name: name.into(),
            url: format!("http://example.com/{name}"),
            date_added: utc_to_chrome_micros(date),
        }
    }

    fn folder(name: &str, children: Vec<BookmarkNode>) -> BookmarkNode {
        BookmarkNode::Folder {
            name: name.into(),
            children,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn candidates_of(
        tree: &BookmarkNode,
        now: DateTime<Utc>,
        last_run: DateTime<Utc>,
    ) -> Vec<Candidate> {
        let mut out = Vec::new();
        collect_candidates(&[tree], now, last_run, Duration::days(7), &mut out).unwrap();
        out
    }

    #[test]
    fn three_days_old_with_stale_watermark_is_included() {
        let now = fixed_now();
        let tree = folder("bar", vec![url("fresh", now - Duration::days(3))]);
        let got = candidates_of(&tree, now, now - Duration::days(10));
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "fresh");
    }

    #[test]
    fn ten_days_old_is_excluded_regardless_of_watermark() {
        let now = fixed_now();
        let tree = folder("bar", vec![url("stale", now - Duration::days(10))]);
        assert!(candidates_of(&tree, now, now - Duration::days(30)).is_empty());
    }

    #[test]
    fn newer_than_window_but_older_than_watermark_is_excluded() {
        let now = fixed_now();
        let tree = folder("bar", vec![url("seen", now - Duration::days(1))]);
        assert!(candidates_of(&tree, now, now - Duration::hours(12)).is_empty());
    }

    #[test]
    fn exactly_on_watermark_is_excluded() {
        // The gate is strictly greater-than the watermark.
        let now = fixed_now();
        let date = now - Duration::days(2);
        let tree = folder("bar", vec![url("boundary", date)]);
        assert!(candidates_of(&tree, now, date).is_empty());
    }

    #[test]
    fn nested_folders_are_walked_depth_first() {
        let now = fixed_now();
        let tree = folder(
            "bar",
            vec![
                url("a", now - Duration::days(1)),
                folder(
                    "inner",
                    vec![url("b", now - Duration::days(2)), url("c", now - Duration::days(3))],
                ),
                url("d", now - Duration::days(4)),
            ],
        );
        let got = candidates_of(&tree, now, now - Duration::days(30));
        let names: Vec<_> = got.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn flatten_ignores_the_gate() {
        let now = fixed_now();
        let tree = folder(
            "bar",
            vec![
                url("old", now - Duration::days(400)),
                folder("inner", vec![url("new", now - Duration::days(1))]),
            ],
        );
        let flat = flatten(&[&tree]).unwrap();
        let names: Vec<_> = flat.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["old", "new"]);
    }
}
