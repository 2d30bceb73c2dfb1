// ABOUTME: Loads listing profiles from the embedded builtin JSON or from a user-supplied file.
// ABOUTME: Every loaded profile is validated (placeholder present, selectors compile) before use.

use std::fs;
use std::path::Path;

use crate::error::{Result, ScoutError};
use crate::extractors::profile::ListingProfile;

/// Embedded JSON for the note platform's search listing.
const BUILTIN_PROFILE_JSON: &str = include_str!("../../data/xiaohongshu.json");

/// Parses and validates a profile from JSON text. `origin` names it in errors.
pub fn parse_profile(json: &str, origin: &str) -> Result<ListingProfile> {
    let profile: ListingProfile = serde_json::from_str(json)
        .map_err(|e| ScoutError::profile(origin, "parse", Some(anyhow::Error::new(e))))?;
    profile.validate()?;
    Ok(profile)
}

/// Loads the builtin profile.
pub fn load_builtin_profile() -> Result<ListingProfile> {
    parse_profile(BUILTIN_PROFILE_JSON, "builtin")
}

/// Loads a profile from a JSON file.
pub fn load_profile_file(path: &Path) -> Result<ListingProfile> {
    let origin = path.display().to_string();
    let json = fs::read_to_string(path)
        .map_err(|e| ScoutError::profile(&origin, "read", Some(anyhow::Error::new(e))))?;
    parse_profile(&json, &origin)
}
