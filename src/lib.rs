//! feedmux aggregates a list of RSS/Atom source feeds into a single
//! normalized Atom feed.
//!
//! The pipeline runs fetch -> parse -> normalize -> dedup -> filter ->
//! sort -> serialize, fresh on every invocation:
//!
//! - [`sources`] reads the newline-delimited source list
//! - [`feed`] fetches each source sequentially and maps raw entries into
//!   normalized [`feed::Entry`] records, isolating per-source failures
//! - [`aggregate`] deduplicates, applies keyword and recency filters,
//!   sorts, caps, and assigns fallback timestamps
//! - [`atom`] renders the result as an Atom document
//!
//! Behavior is driven by an immutable [`config::Config`] derived from
//! environment variables; nothing is persisted between runs.

pub mod aggregate;
pub mod atom;
pub mod config;
pub mod feed;
pub mod sources;
pub mod util;
