// ABOUTME: Error types for notescout including the ErrorCode enum and ScoutError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the different categories of crawl failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Navigate,
    Selector,
    Element,
    Browser,
    Profile,
    Input,
    Output,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Navigate => "navigation error",
            ErrorCode::Selector => "invalid selector",
            ErrorCode::Element => "element error",
            ErrorCode::Browser => "browser error",
            ErrorCode::Profile => "profile error",
            ErrorCode::Input => "input error",
            ErrorCode::Output => "output error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for notescout operations.
///
/// `target` names what the operation acted on: a URL, a selector, a file path.
#[derive(Debug, thiserror::Error)]
pub struct ScoutError {
    pub code: ErrorCode,
    pub target: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ScoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notescout: {} {}: {}", self.op, self.target, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScoutError>;

impl ScoutError {
    fn with_code(
        code: ErrorCode,
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            target: target.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Navigate error (page could not be loaded).
    pub fn navigate(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Navigate, url, op, source)
    }

    /// Create a Selector error (selector failed to compile).
    pub fn selector(
        css: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Selector, css, op, source)
    }

    /// Create an Element error (stale or unreadable handle).
    pub fn element(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Element, target, op, source)
    }

    /// Create a Browser error (session setup or script execution).
    pub fn browser(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Browser, target, op, source)
    }

    /// Create a Profile error (selector profile missing or malformed).
    pub fn profile(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Profile, target, op, source)
    }

    /// Create an Input error (keyword list or snapshot unreadable).
    pub fn input(
        path: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Input, path, op, source)
    }

    /// Create an Output error (workbook or JSON could not be written).
    pub fn output(
        path: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Output, path, op, source)
    }

    /// Returns true if this is a Navigate error.
    pub fn is_navigate(&self) -> bool {
        self.code == ErrorCode::Navigate
    }

    /// Returns true if this is a Selector error.
    pub fn is_selector(&self) -> bool {
        self.code == ErrorCode::Selector
    }

    /// Returns true if this is an Element error.
    pub fn is_element(&self) -> bool {
        self.code == ErrorCode::Element
    }

    /// Returns true if this is a Profile error.
    pub fn is_profile(&self) -> bool {
        self.code == ErrorCode::Profile
    }

    /// Returns true if this is an Input error.
    pub fn is_input(&self) -> bool {
        self.code == ErrorCode::Input
    }

    /// Returns true if this is an Output error.
    pub fn is_output(&self) -> bool {
        self.code == ErrorCode::Output
    }
}
