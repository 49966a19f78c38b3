//! Compatibility classification
//!
//! Answers, for a document's declared schema version: is it the version the
//! software natively produces, an older migratable one, a tolerated newer
//! minor, or outside the supported window entirely?

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::registry::SchemaRegistry;
use crate::version::SchemaVersion;

/// Relationship between a declared version and the supported window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compatibility {
    /// Exactly the version the software natively produces.
    Current,
    /// Older but inside the window; migration is required before use.
    BackwardsCompatible,
    /// Newer minor of the current major; unknown fields are tolerated.
    ForwardMinor,
    /// Too old or too new for this release to handle.
    Unsupported,
}

/// Outcome of classifying one declared version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityVerdict {
    pub compatibility: Compatibility,
    pub version: SchemaVersion,
    pub recommendation: String,
}

impl CompatibilityVerdict {
    /// Whether a document at this version can be processed at all.
    pub fn is_usable(&self) -> bool {
        self.compatibility != Compatibility::Unsupported
    }

    /// Whether the document must be migrated before validation.
    pub fn requires_migration(&self) -> bool {
        self.compatibility == Compatibility::BackwardsCompatible
    }
}

/// Classifies declared schema versions against the supported window.
pub struct CompatibilityClassifier {
    registry: Arc<SchemaRegistry>,
}

impl CompatibilityClassifier {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Classify a declared version.
    ///
    /// The equality check runs before the range checks, so a current version
    /// that equals the minimum (single-supported-version deployments) is
    /// `Current`, not `BackwardsCompatible`.
    pub fn classify(&self, version: &str) -> Result<CompatibilityVerdict> {
        let parsed = SchemaVersion::parse(version)?;
        let current = self.registry.current_version();
        let minimum = self.registry.minimum_version();

        let (compatibility, recommendation) = if parsed == current {
            (
                Compatibility::Current,
                format!("schema version {} is natively supported", parsed),
            )
        } else if parsed < current && parsed >= minimum {
            (
                Compatibility::BackwardsCompatible,
                format!(
                    "schema version {} will be migrated to {} before use",
                    parsed, current
                ),
            )
        } else if parsed > current && parsed.is_same_major(&current) {
            (
                Compatibility::ForwardMinor,
                format!(
                    "schema version {} is a newer minor than {}; unknown fields are tolerated and reported as warnings",
                    parsed, current
                ),
            )
        } else if parsed > current {
            (
                Compatibility::Unsupported,
                format!(
                    "schema version {} is newer than the supported {}; upgrade the software to process this document",
                    parsed, current
                ),
            )
        } else {
            (
                Compatibility::Unsupported,
                format!(
                    "schema version {} is older than the supported minimum {}; upgrade the document with an earlier release first",
                    parsed, minimum
                ),
            )
        };

        debug!(version = %parsed, ?compatibility, "classified schema version");
        Ok(CompatibilityVerdict {
            compatibility,
            version: parsed,
            recommendation,
        })
    }
}
