//! Feed loading: per-source HTTP fetch plus raw-entry normalization.
//!
//! The loader turns an ordered list of source URLs into a flat collection
//! of normalized [`Entry`] records:
//!
//! - [`fetcher`] - sequential HTTP retrieval with per-source failure
//!   isolation (a broken source is warned about and skipped, never fatal)
//! - [`parser`] - mapping from the uniform `feed-rs` entry structure into
//!   the internal entry record, applying the URL, HTML, and timestamp
//!   normalizers

mod fetcher;
mod parser;

pub use fetcher::{load_all, FetchError, USER_AGENT};
pub use parser::{map_entries, source_title, Entry};
