//! Configuration shared by all pdfmix operations.
//!
//! Operation-specific inputs (which file, which pages) are passed to the
//! functions in [`crate::ops`] directly. This module holds the settings that
//! apply across every operation:
//! - Output overwrite behaviour
//! - Output verbosity
//! - Compression of written files
//! - Batch failure policy
//! - Whether the metadata-stripping pass runs

use std::str::FromStr;

use crate::error::{PdfMixError, Result};

/// Compression level for written PDFs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - streams are written as assembled.
    None,
    /// Flate-compress uncompressed streams.
    #[default]
    Standard,
    /// Compress and drop unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfMixError;

    /// Parse compression level from "none", "standard" or "maximum".
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfMixError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Page rotation, normalised to a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// Rotate 90 degrees clockwise.
    Clockwise90,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 270 degrees clockwise (90 counter-clockwise).
    Clockwise270,
}

impl Rotation {
    /// Build a rotation from any degree value.
    ///
    /// The value is normalised modulo 360, so `-90` and `450` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMixError::InvalidRotation`] if the value is not a
    /// multiple of 90, which PDF page rotation requires.
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Self::None),
            90 => Ok(Self::Clockwise90),
            180 => Ok(Self::Rotate180),
            270 => Ok(Self::Clockwise270),
            _ => Err(PdfMixError::InvalidRotation { degrees }),
        }
    }

    /// Get rotation as degrees in `0..360`.
    pub fn as_degrees(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 90,
            Self::Rotate180 => 180,
            Self::Clockwise270 => 270,
        }
    }

    /// Whether applying this rotation changes anything.
    pub fn is_none(&self) -> bool {
        *self == Self::None
    }

    /// Add this rotation to an existing `/Rotate` value.
    ///
    /// Rotation is additive, not absolute; the result is in `0..360`.
    pub fn compose(&self, existing: i64) -> i64 {
        (existing + self.as_degrees()).rem_euclid(360)
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// What a batch does when one of its items fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Stop at the first failed item. Outputs already produced are kept.
    #[default]
    AbortOnFirstFailure,
    /// Record the failure and move on to the next item.
    ContinueOnFailure,
}

impl BatchPolicy {
    /// Policy from a `--continue-on-error` style flag.
    pub fn from_continue_flag(continue_on_error: bool) -> Self {
        if continue_on_error {
            Self::ContinueOnFailure
        } else {
            Self::AbortOnFirstFailure
        }
    }
}

/// Settings shared by every operation.
#[derive(Debug, Clone)]
pub struct Config {
    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Compression applied when writing.
    pub compression: CompressionLevel,

    /// Failure policy for multi-file conversions.
    pub batch_policy: BatchPolicy,

    /// Run the metadata-stripping pass after each write.
    pub sanitize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overwrite_mode: OverwriteMode::default(),
            verbose: false,
            quiet: false,
            compression: CompressionLevel::default(),
            batch_policy: BatchPolicy::default(),
            sanitize: true,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if verbose and quiet modes are both enabled.
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            return Err(PdfMixError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        Ok(())
    }

    /// Check if non-error output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }
}
