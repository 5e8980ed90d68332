//! Pipeline stages for bookmark archiving.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a mock renderer in tests) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! store ──▶ timestamp ──▶ walk ──▶ render        (per candidate)
//! (JSON)    (1601 epoch)  (filter) (headless browser)
//!                           └────▶ index          (all bookmarks)
//! ```
//!
//! 1. [`store`]     — parse the Chrome `Bookmarks` export and back it up
//! 2. [`timestamp`] — convert Chrome's 1601-epoch microseconds to UTC
//! 3. [`walk`]      — depth-first traversal; the 7-day + watermark gate for
//!    archiving, and the unfiltered flat projection for the index
//! 4. [`render`]    — capture one URL as a PDF via a headless browser; the
//!    only stage with an external dependency
//! 5. [`index`]     — regenerate the static HTML listing, newest first

pub mod index;
pub mod render;
pub mod store;
pub mod timestamp;
pub mod walk;
