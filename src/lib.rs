//! Kanpo Feed - a government gazette feed archiver
//!
//! This crate fetches the official gazette RSS feed, merges it into a JSON
//! archive of every entry seen so far, and splices a rendered article list
//! into a static HTML page.

pub mod archive;
pub mod config;
pub mod entry;
pub mod fetcher;
pub mod merge;
pub mod patcher;
pub mod pipeline;
pub mod published;
pub mod render;
