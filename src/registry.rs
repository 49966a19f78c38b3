//! Schema Registry
//!
//! Resolves the structural contract that applies to a given schema version
//! and tracks the window of versions the running software supports. The
//! contracts are JSON Schema documents bundled with the release and embedded
//! at compile time; nothing is fetched or cached on disk.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use include_dir::{include_dir, Dir};
use jsonschema::{Draft, JSONSchema};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::checksum::Checksum;
use crate::error::{Result, SchemaError};
use crate::version::SchemaVersion;

/// Schema definitions bundled with the release.
///
/// Layout: `versions.json` plus one `v{major}.{minor}/` directory per
/// supported version, each holding the three schema artifacts.
static DEFINITIONS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/schemas");

/// Top-level media plan schema artifact.
pub const MEDIAPLAN_SCHEMA: &str = "mediaplan.schema.json";
/// Standalone campaign schema artifact.
pub const CAMPAIGN_SCHEMA: &str = "campaign.schema.json";
/// Standalone line item schema artifact.
pub const LINEITEM_SCHEMA: &str = "lineitem.schema.json";

const VERSION_MANIFEST: &str = "versions.json";

/// The supported-version window declared by the bundled manifest.
#[derive(Debug, Clone, Deserialize)]
struct VersionManifest {
    current: SchemaVersion,
    minimum: SchemaVersion,
    supported: Vec<SchemaVersion>,
}

/// The structural contract for one (version, artifact) pair.
///
/// Immutable after load; shared between callers through the registry cache.
pub struct SchemaDefinition {
    version: SchemaVersion,
    artifact: String,
    document: Value,
    checksum: Checksum,
    compiled: JSONSchema,
}

impl SchemaDefinition {
    /// Version this contract applies to.
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Artifact name this contract was loaded from.
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// The raw JSON Schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Checksum of the bundled artifact text.
    pub fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    /// The compiled validator for this contract.
    pub fn compiled(&self) -> &JSONSchema {
        &self.compiled
    }
}

/// Registry for media plan schema versions.
///
/// Owns the supported window (minimum through current, ascending) and a
/// lazy, process-lifetime cache of loaded definitions. Loads happen under
/// the cache lock, so concurrent first access for the same key performs
/// exactly one load and every caller receives the same shared instance.
pub struct SchemaRegistry {
    minimum: SchemaVersion,
    current: SchemaVersion,
    versions: Vec<SchemaVersion>,
    cache: Mutex<HashMap<(SchemaVersion, String), Arc<SchemaDefinition>>>,
}

impl SchemaRegistry {
    /// Build a registry over the bundled schema definitions.
    pub fn new() -> Result<Self> {
        let manifest_text = DEFINITIONS
            .get_file(VERSION_MANIFEST)
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| SchemaError::SchemaParse {
                version: "-".to_string(),
                artifact: VERSION_MANIFEST.to_string(),
                reason: "bundled version manifest is missing".to_string(),
            })?;
        let manifest: VersionManifest =
            serde_json::from_str(manifest_text).map_err(|e| SchemaError::SchemaParse {
                version: "-".to_string(),
                artifact: VERSION_MANIFEST.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_manifest(manifest)
    }

    fn from_manifest(manifest: VersionManifest) -> Result<Self> {
        let coherent = !manifest.supported.is_empty()
            && manifest.supported.windows(2).all(|pair| pair[0] < pair[1])
            && manifest.supported.first() == Some(&manifest.minimum)
            && manifest.supported.last() == Some(&manifest.current);
        if !coherent {
            return Err(SchemaError::SchemaParse {
                version: "-".to_string(),
                artifact: VERSION_MANIFEST.to_string(),
                reason: format!(
                    "supported window must ascend from minimum {} to current {}",
                    manifest.minimum, manifest.current
                ),
            });
        }
        debug!(
            minimum = %manifest.minimum,
            current = %manifest.current,
            "initialized schema registry"
        );
        Ok(Self {
            minimum: manifest.minimum,
            current: manifest.current,
            versions: manifest.supported,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// The version the running software natively produces.
    pub fn current_version(&self) -> SchemaVersion {
        self.current
    }

    /// The oldest version that can still be migrated forward.
    pub fn minimum_version(&self) -> SchemaVersion {
        self.minimum
    }

    /// Every supported version, minimum through current, ascending.
    pub fn supported_versions(&self) -> &[SchemaVersion] {
        &self.versions
    }

    /// Whether a version falls inside the supported window.
    pub fn is_version_supported(&self, version: SchemaVersion) -> bool {
        self.versions.contains(&version)
    }

    /// Position of `version` in the supported window, if present.
    pub(crate) fn window_position(&self, version: SchemaVersion) -> Option<usize> {
        self.versions.iter().position(|v| *v == version)
    }

    /// Resolve the cached structural contract for (version, artifact).
    pub fn load_schema(
        &self,
        version: SchemaVersion,
        artifact: &str,
    ) -> Result<Arc<SchemaDefinition>> {
        if !self.is_version_supported(version) {
            return Err(SchemaError::SchemaNotFound {
                version: version.to_string(),
                artifact: artifact.to_string(),
            });
        }

        let key = (version, artifact.to_string());
        let mut cache = self.lock_cache();
        if let Some(cached) = cache.get(&key) {
            return Ok(Arc::clone(cached));
        }

        debug!(version = %version, artifact, "loading schema definition");
        let definition = Arc::new(load_definition(version, artifact)?);
        cache.insert(key, Arc::clone(&definition));
        Ok(definition)
    }

    /// Registry over an explicit window, for exercising edge-case windows.
    #[cfg(test)]
    pub(crate) fn with_window(versions: Vec<SchemaVersion>) -> Self {
        Self {
            minimum: versions[0],
            current: *versions.last().expect("non-empty window"),
            versions,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<(SchemaVersion, String), Arc<SchemaDefinition>>> {
        // A poisoned cache still holds only fully-constructed definitions.
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn load_definition(version: SchemaVersion, artifact: &str) -> Result<SchemaDefinition> {
    let path = format!("v{}/{}", version, artifact);
    let text = DEFINITIONS
        .get_file(&path)
        .and_then(|f| f.contents_utf8())
        .ok_or_else(|| SchemaError::SchemaNotFound {
            version: version.to_string(),
            artifact: artifact.to_string(),
        })?;

    let document: Value = serde_json::from_str(text).map_err(|e| SchemaError::SchemaParse {
        version: version.to_string(),
        artifact: artifact.to_string(),
        reason: e.to_string(),
    })?;

    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&document)
        .map_err(|e| SchemaError::SchemaParse {
            version: version.to_string(),
            artifact: artifact.to_string(),
            reason: e.to_string(),
        })?;

    Ok(SchemaDefinition {
        version,
        artifact: artifact.to_string(),
        checksum: Checksum::from_text(text),
        document,
        compiled,
    })
}
