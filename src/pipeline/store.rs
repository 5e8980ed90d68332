//! Bookmark store: parse Chrome's JSON export and back it up.
//!
//! ## The Chrome `Bookmarks` file
//!
//! Chrome keeps the live bookmark tree as a JSON document in the profile
//! directory. The shape that matters here:
//!
//! ```json
//! {
//!   "roots": {
//!     "bookmark_bar": { "type": "folder", "name": "...", "children": [...] },
//!     "other":        { "type": "folder", ... },
//!     "synced":       { "type": "folder", ... }
//!   }
//! }
//! ```
//!
//! Nodes are discriminated by a `"type"` field (`folder` | `url`), which maps
//! directly onto an internally tagged serde enum — each variant carries only
//! the fields valid for its kind, so there is no `Option<Vec<children>>` on a
//! url node and no nullable `url` on a folder. Chrome also writes `guid`,
//! `id`, `date_modified`, sync metadata, … — all ignored on deserialisation.

use crate::error::ArchiveError;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Fixed backup filename inside the output directory.
pub const BACKUP_FILENAME: &str = "BookmarksBackup.json";

/// A node in the bookmark tree, discriminated by Chrome's `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BookmarkNode {
    /// A folder: display name plus ordered children.
    Folder {
        name: String,
        #[serde(default)]
        children: Vec<BookmarkNode>,
    },
    /// A leaf bookmark: display name, target URL, and the Chrome-epoch
    /// `date_added` (microseconds since 1601-01-01, see
    /// [`crate::pipeline::timestamp`]).
    Url {
        name: String,
        url: String,
        #[serde(deserialize_with = "de_chrome_micros")]
        date_added: i64,
    },
}

impl BookmarkNode {
    /// Display name regardless of kind.
    pub fn name(&self) -> &str {
        match self {
            BookmarkNode::Folder { name, .. } => name,
            BookmarkNode::Url { name, .. } => name,
        }
    }
}

/// The named root folders of a Chrome export.
///
/// Only the three well-known roots are read; any other keys in `roots`
/// (e.g. `trash` on some builds) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookmarkRoots {
    #[serde(default)]
    pub bookmark_bar: Option<BookmarkNode>,
    #[serde(default)]
    pub other: Option<BookmarkNode>,
    #[serde(default)]
    pub synced: Option<BookmarkNode>,
}

impl BookmarkRoots {
    /// The roots present in the document, in the traversal order
    /// `bookmark_bar`, `other`, `synced`.
    pub fn in_order(&self) -> impl Iterator<Item = (&'static str, &BookmarkNode)> + '_ {
        [
            ("bookmark_bar", self.bookmark_bar.as_ref()),
            ("other", self.other.as_ref()),
            ("synced", self.synced.as_ref()),
        ]
        .into_iter()
        .filter_map(|(key, node)| node.map(|n| (key, n)))
    }

    /// The union of the children of every present root, in traversal order.
    ///
    /// The index is generated over this union, so a bookmark's position here
    /// is its tie-break order for equal dates.
    pub fn all_children(&self) -> Vec<&BookmarkNode> {
        self.in_order()
            .flat_map(|(_, root)| match root {
                BookmarkNode::Folder { children, .. } => children.iter(),
                url @ BookmarkNode::Url { .. } => std::slice::from_ref(url).iter(),
            })
            .collect()
    }
}

/// A parsed Chrome bookmark export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkFile {
    pub roots: BookmarkRoots,
}

/// Chrome writes `date_added` as a decimal string ("13345000000000000");
/// older exports and some tools emit a bare integer. Accept both.
fn de_chrome_micros<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Micros {
        Int(i64),
        Str(String),
    }

    match Micros::deserialize(deserializer)? {
        Micros::Int(v) => Ok(v),
        Micros::Str(s) => s.trim().parse::<i64>().map_err(serde::de::Error::custom),
    }
}

/// Load and parse the bookmark export at `path`.
///
/// # Errors
/// * [`ArchiveError::SourceNotFound`] — the file does not exist
/// * [`ArchiveError::PermissionDenied`] — the file cannot be opened
/// * [`ArchiveError::ParseFailed`] — the content is not a Chrome export
///
/// All are fatal to the run; there is no recovery path.
pub async fn load_bookmarks(path: &Path) -> Result<BookmarkFile, ArchiveError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ArchiveError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ArchiveError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(ArchiveError::ParseFailed {
                path: path.to_path_buf(),
                detail: e.to_string(),
            });
        }
    };

    let file: BookmarkFile =
        serde_json::from_str(&raw).map_err(|e| ArchiveError::ParseFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    debug!("Parsed bookmark file: {}", path.display());
    Ok(file)
}

/// Copy the source export verbatim to `<output_dir>/BookmarksBackup.json`.
///
/// Overwrite semantics — no versioning of backups. Returns the backup path.
pub async fn backup_bookmarks(
    source: &Path,
    output_dir: &Path,
) -> Result<PathBuf, ArchiveError> {
    let dest = output_dir.join(BACKUP_FILENAME);
    tokio::fs::copy(source, &dest)
        .await
        .map_err(|e| ArchiveError::OutputWriteFailed {
            path: dest.clone(),
            source: e,
        })?;
    info!("Backed up {} → {}", source.display(), dest.display());
    Ok(dest)
}
