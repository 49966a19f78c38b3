//! Media Plan Schema Engine
//!
//! Versioned, schema-validated media plan documents: classify a document's
//! declared schema version against the window this release supports,
//! validate it against the bundled structural contract, and migrate it
//! forward across version boundaries with no silent data loss.
//!
//! ## Features
//!
//! - **Two-component versioning**: every accepted surface form ("2", "2.0",
//!   "v2.0.0") normalizes to one canonical major.minor value
//! - **Bundled contracts**: JSON Schema definitions ship inside the binary,
//!   loaded lazily and cached for the process lifetime
//! - **Batch validation**: structural and business-rule problems come back
//!   as one list of messages, not a first-failure exception
//! - **Forward-only migration**: adjacent, pure transformation steps carry
//!   documents from older versions to the current one
//!
//! ## Control flow
//!
//! ```text
//! document (declared version V)
//!        |
//!        v
//! CompatibilityClassifier ---- UNSUPPORTED ----> classified error
//!        |
//!        +-- CURRENT / FORWARD_MINOR ----------> SchemaValidator
//!        |
//!        +-- BACKWARDS_COMPATIBLE --> SchemaMigrator --> SchemaValidator
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use mediaplan_schemas::{SchemaMigrator, SchemaRegistry, SchemaValidator};
//!
//! # fn main() -> mediaplan_schemas::Result<()> {
//! let registry = Arc::new(SchemaRegistry::new()?);
//! let validator = SchemaValidator::new(Arc::clone(&registry));
//! let migrator = SchemaMigrator::new(Arc::clone(&registry))?;
//!
//! let plan = serde_json::json!({
//!     "meta": { "id": "mp-001", "schema_version": "1.0", "created_by_name": "Planner" },
//!     "campaign": {
//!         "id": "c-001",
//!         "name": "Spring Launch",
//!         "objective": "awareness",
//!         "start_date": "2026-03-01",
//!         "end_date": "2026-05-31",
//!         "budget": 100000
//!     }
//! });
//!
//! let migrated = migrator.migrate(&plan, "1.0", "2.0")?;
//! let problems = validator.validate(&migrated, None)?;
//! assert!(problems.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod checksum;
pub mod compatibility;
pub mod document;
pub mod error;
pub mod migration;
pub mod registry;
pub mod validator;
pub mod version;

pub use checksum::Checksum;
pub use compatibility::{Compatibility, CompatibilityClassifier, CompatibilityVerdict};
pub use error::{Result, SchemaError};
pub use migration::{MigrationStep, SchemaMigrator};
pub use registry::{SchemaDefinition, SchemaRegistry};
pub use validator::SchemaValidator;
pub use version::SchemaVersion;
