//! Schema migration
//!
//! Carries a media plan document forward across schema version boundaries
//! through an ordered chain of adjacent, pure transformation steps. Each
//! step consumes the previous step's output and returns a new document;
//! inputs are never mutated and no partial result escapes a failing chain.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::document;
use crate::error::{Result, SchemaError};
use crate::registry::SchemaRegistry;
use crate::version::SchemaVersion;

/// A pure transformation from one version's document shape to the next.
pub type StepFn = Box<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// A single version-to-version transformation.
///
/// Source and target must be adjacent in the registry's supported window;
/// chains are built from consecutive steps, never by skipping.
pub struct MigrationStep {
    from: SchemaVersion,
    to: SchemaVersion,
    run: StepFn,
}

impl MigrationStep {
    /// Source version of this step.
    pub fn from_version(&self) -> SchemaVersion {
        self.from
    }

    /// Target version of this step.
    pub fn to_version(&self) -> SchemaVersion {
        self.to
    }

    fn apply(&self, media_plan: &Value) -> Result<Value> {
        (self.run)(media_plan)
    }
}

/// Migrator for media plan documents between schema versions.
pub struct SchemaMigrator {
    registry: Arc<SchemaRegistry>,
    steps: HashMap<(SchemaVersion, SchemaVersion), MigrationStep>,
}

impl SchemaMigrator {
    /// Migrator with the built-in steps registered.
    pub fn new(registry: Arc<SchemaRegistry>) -> Result<Self> {
        let mut migrator = Self::empty(registry);
        migrator.register_step(
            SchemaVersion::new(1, 0),
            SchemaVersion::new(2, 0),
            Box::new(migrate_10_to_20),
        )?;
        Ok(migrator)
    }

    /// Migrator with no steps registered; callers compose their own chain.
    pub fn empty(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            steps: HashMap::new(),
        }
    }

    /// Register a step between two adjacent supported versions.
    pub fn register_step(
        &mut self,
        from: SchemaVersion,
        to: SchemaVersion,
        run: StepFn,
    ) -> Result<()> {
        let from_pos = self.registry.window_position(from).ok_or_else(|| {
            SchemaError::Migration {
                from: from.to_string(),
                to: to.to_string(),
                reason: format!("source version {} is not in the supported window", from),
                source: None,
            }
        })?;
        let to_pos = self.registry.window_position(to).ok_or_else(|| {
            SchemaError::Migration {
                from: from.to_string(),
                to: to.to_string(),
                reason: format!("target version {} is not in the supported window", to),
                source: None,
            }
        })?;
        if to_pos != from_pos + 1 {
            return Err(SchemaError::Migration {
                from: from.to_string(),
                to: to.to_string(),
                reason: "steps must connect adjacent supported versions".to_string(),
                source: None,
            });
        }

        debug!(from = %from, to = %to, "registered migration step");
        self.steps.insert((from, to), MigrationStep { from, to, run });
        Ok(())
    }

    /// Whether a fully-registered chain connects the two versions.
    pub fn can_migrate(&self, from_version: &str, to_version: &str) -> bool {
        let (Ok(from), Ok(to)) = (
            SchemaVersion::parse(from_version),
            SchemaVersion::parse(to_version),
        ) else {
            return false;
        };
        from == to || (from < to && self.find_path(from, to).is_ok())
    }

    /// Migrate a media plan from one schema version to another.
    ///
    /// Equal versions are a no-op; the document is returned unchanged, which
    /// also makes re-running a completed migration safe. Downgrades are
    /// refused. A gap in the registered chain or a failing step surfaces as
    /// a `Migration` error naming the offending (from, to) pair; the input
    /// document is never modified.
    pub fn migrate(
        &self,
        media_plan: &Value,
        from_version: &str,
        to_version: &str,
    ) -> Result<Value> {
        let from = SchemaVersion::parse(from_version)?;
        let to = SchemaVersion::parse(to_version)?;

        if from == to {
            debug!(version = %from, "versions are equivalent, no migration needed");
            return Ok(media_plan.clone());
        }
        if to < from {
            return Err(SchemaError::UnsupportedMigration {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let path = self.find_path(from, to)?;
        info!(from = %from, to = %to, steps = path.len(), "starting migration");

        let mut current = media_plan.clone();
        for step in path {
            debug!(from = %step.from, to = %step.to, "applying migration step");
            current = step.apply(&current).map_err(|e| SchemaError::Migration {
                from: step.from.to_string(),
                to: step.to.to_string(),
                reason: "transformation step failed".to_string(),
                source: Some(Box::new(e)),
            })?;
            current = document::with_schema_version(&current, step.to);
        }

        info!(from = %from, to = %to, "migration completed");
        Ok(current)
    }

    /// Ordered steps connecting `from` to `to` through the supported window.
    fn find_path(&self, from: SchemaVersion, to: SchemaVersion) -> Result<Vec<&MigrationStep>> {
        let from_pos = self.registry.window_position(from).ok_or_else(|| {
            SchemaError::Migration {
                from: from.to_string(),
                to: to.to_string(),
                reason: format!("source version {} is not in the supported window", from),
                source: None,
            }
        })?;
        let to_pos = self.registry.window_position(to).ok_or_else(|| {
            SchemaError::Migration {
                from: from.to_string(),
                to: to.to_string(),
                reason: format!("target version {} is not in the supported window", to),
                source: None,
            }
        })?;

        let window = self.registry.supported_versions();
        let mut path = Vec::with_capacity(to_pos - from_pos);
        for pair in window[from_pos..=to_pos].windows(2) {
            let step = self.steps.get(&(pair[0], pair[1])).ok_or_else(|| {
                SchemaError::Migration {
                    from: pair[0].to_string(),
                    to: pair[1].to_string(),
                    reason: "no migration step registered for this version boundary".to_string(),
                    source: None,
                }
            })?;
            path.push(step);
        }
        Ok(path)
    }
}

/// 1.0 -> 2.0: the scalar campaign budget becomes a budget object, flat
/// audience and location targeting fields move into their array forms, and
/// the dictionary's custom_dimensions section is renamed.
fn migrate_10_to_20(media_plan: &Value) -> Result<Value> {
    let mut result = media_plan.clone();

    if let Some(campaign) = result.get_mut("campaign").and_then(Value::as_object_mut) {
        restructure_budget(campaign);
        restructure_audience(campaign);
        restructure_locations(campaign);
    }

    if let Some(dictionary) = result.get_mut("dictionary").and_then(Value::as_object_mut) {
        if let Some(dimensions) = dictionary.remove("custom_dimensions") {
            dictionary.insert("lineitem_custom_dimensions".to_string(), dimensions);
        }
    }

    Ok(result)
}

fn restructure_budget(campaign: &mut Map<String, Value>) {
    if let Some(total) = campaign.get("budget").filter(|b| b.is_number()).cloned() {
        campaign.insert("budget".to_string(), json!({ "total": total }));
    }
}

fn restructure_audience(campaign: &mut Map<String, Value>) {
    let name = take_field(campaign, "audience_name");
    let age_start = take_field(campaign, "audience_age_start");
    let age_end = take_field(campaign, "audience_age_end");
    let gender = take_field(campaign, "audience_gender");
    let interests = take_field(campaign, "audience_interests");

    // Only materialize target_audiences when any audience field carried data.
    if name.is_none()
        && age_start.is_none()
        && age_end.is_none()
        && gender.is_none()
        && interests.is_none()
    {
        return;
    }

    let display_name = match name.as_ref().and_then(Value::as_str) {
        Some(n) => n.to_string(),
        None => audience_display_name(
            age_start.as_ref(),
            age_end.as_ref(),
            gender.as_ref().and_then(Value::as_str),
        ),
    };

    let mut audience = Map::new();
    audience.insert("name".to_string(), Value::String(display_name));
    if let Some(value) = age_start {
        audience.insert("demo_age_start".to_string(), value);
    }
    if let Some(value) = age_end {
        audience.insert("demo_age_end".to_string(), value);
    }
    if let Some(value) = gender {
        audience.insert("demo_gender".to_string(), value);
    }
    if let Some(value) = interests {
        let joined = match &value {
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        audience.insert("interest_attributes".to_string(), Value::String(joined));
    }

    campaign.insert(
        "target_audiences".to_string(),
        Value::Array(vec![Value::Object(audience)]),
    );
}

/// Generated audience name: gender plus age range when present, with a
/// generic fallback. "Males 35-55", "Adults 21+", "General Audience".
fn audience_display_name(
    age_start: Option<&Value>,
    age_end: Option<&Value>,
    gender: Option<&str>,
) -> String {
    let prefix = match gender {
        Some(g) if !g.eq_ignore_ascii_case("any") => format!("{}s", g),
        _ => "Adults".to_string(),
    };

    let start = age_start.and_then(Value::as_i64);
    let end = age_end.and_then(Value::as_i64);
    match (start, end) {
        (Some(s), Some(e)) => format!("{} {}-{}", prefix, s, e),
        (Some(s), None) => format!("{} {}+", prefix, s),
        (None, Some(e)) => format!("{} up to {}", prefix, e),
        (None, None) if prefix != "Adults" => prefix,
        (None, None) => "General Audience".to_string(),
    }
}

fn restructure_locations(campaign: &mut Map<String, Value>) {
    let location_type = take_field(campaign, "location_type");
    let Some(locations) = take_field(campaign, "locations") else {
        return;
    };

    // target_locations is only created when the list carries data; a bare
    // location_type has nothing to describe and is dropped.
    let display_name = {
        let names: Vec<&str> = locations
            .as_array()
            .map(|a| a.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        if names.is_empty() {
            return;
        }
        location_display_name(&names)
    };

    let mut location = Map::new();
    location.insert("name".to_string(), Value::String(display_name));
    location.insert("location_list".to_string(), locations);
    if let Some(value) = location_type {
        location.insert("location_type".to_string(), value);
    }

    campaign.insert(
        "target_locations".to_string(),
        Value::Array(vec![Value::Object(location)]),
    );
}

/// Generated location name: one, two, or three entries joined in prose,
/// longer lists comma-joined and truncated at 50 characters.
fn location_display_name(names: &[&str]) -> String {
    match names {
        [only] => (*only).to_string(),
        [a, b] => format!("{} and {}", a, b),
        [a, b, c] => format!("{}, {}, and {}", a, b, c),
        _ => {
            let full = names.join(", ");
            if full.chars().count() <= 50 {
                full
            } else {
                let head: String = full.chars().take(47).collect();
                format!("{}...", head)
            }
        }
    }
}

/// Remove a field, treating an explicit null the same as absent.
fn take_field(section: &mut Map<String, Value>, field: &str) -> Option<Value> {
    section.remove(field).filter(|v| !v.is_null())
}
