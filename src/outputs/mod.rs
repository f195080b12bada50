//! Output generation modules for RSS feeds and JSON record dumps.
//!
//! # Submodules
//!
//! - [`rss`]: Renders extracted records as an RSS 2.0 document and writes
//!   one feed file per configured source
//! - [`json`]: Optionally dumps the raw extracted records as JSON for
//!   API-style consumption and debugging

pub mod json;
pub mod rss;
