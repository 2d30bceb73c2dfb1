// ABOUTME: Listing extraction: selector profiles, chain evaluation, and the record builder.
// ABOUTME: Profiles are data; the extraction logic is shared by every platform profile.

//! Extraction module.
//!
//! Submodules:
//! - `profile`: serde model of per-field selector chains.
//! - `loader`: builtin and file-based profile loading.
//! - `select`: first-usable-value evaluation of a chain against one item.
//! - `listing`: item discovery and per-item record building.

pub mod listing;
pub mod loader;
pub mod profile;
pub mod select;
