//! Client code for episearch.
//!
//! This crate provides the HTTP fetch pipeline with robots.txt compliance,
//! plus the HTML extractors for table-of-contents sidebars and episode
//! bodies.

pub mod body;
pub mod fetch;
pub mod sidebar;

pub use body::body_lines;
pub use fetch::{FetchClient, FetchConfig, FetchResponse, PageSource};
pub use sidebar::{TocEntry, extract_episodes, fold_episodes, parse_toc};
