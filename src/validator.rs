//! Media plan validation
//!
//! Structural validation against the versioned JSON Schema contract, plus
//! the business rules the schema cannot express (date ordering, budget
//! positivity, enumerated value membership, dictionary configuration).
//!
//! Data-level problems are returned as a list of human-readable strings so
//! a caller can batch-report every issue in one pass; only infrastructure
//! failures (unreadable stream, unresolvable schema) surface as errors.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::compatibility::{Compatibility, CompatibilityClassifier};
use crate::document;
use crate::error::{Result, SchemaError};
use crate::registry::{SchemaDefinition, SchemaRegistry, MEDIAPLAN_SCHEMA};
use crate::version::SchemaVersion;

/// Channel categories a line item may declare.
pub const VALID_CHANNELS: &[&str] = &[
    "social", "search", "display", "video", "audio", "tv", "ooh", "print", "other",
];

/// KPI designations a line item may declare.
pub const VALID_KPIS: &[&str] = &["cpm", "cpc", "cpa", "ctr", "cpv", "cpl", "roas", "other"];

/// Target gender designations.
pub const VALID_GENDERS: &[&str] = &["male", "female", "any"];

/// Location targeting granularities.
pub const VALID_LOCATION_TYPES: &[&str] = &["country", "state"];

const CUSTOM_FIELD_STATUSES: &[&str] = &["enabled", "disabled"];
const MAX_CAPTION_LENGTH: usize = 100;

/// Validator for media plan documents.
pub struct SchemaValidator {
    registry: Arc<SchemaRegistry>,
    classifier: CompatibilityClassifier,
}

impl SchemaValidator {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        let classifier = CompatibilityClassifier::new(Arc::clone(&registry));
        Self {
            registry,
            classifier,
        }
    }

    /// Validate a media plan against its schema version.
    ///
    /// When `version` is omitted it is read from the document's embedded
    /// `meta.schema_version` field. Returns every problem found; an empty
    /// list means the document is valid. Entries prefixed with `Warning:`
    /// are advisory, not failures.
    pub fn validate(&self, media_plan: &Value, version: Option<&str>) -> Result<Vec<String>> {
        let declared = match version {
            Some(v) => v.to_string(),
            None => document::schema_version(media_plan)
                .ok_or(SchemaError::MissingVersion)?
                .to_string(),
        };

        let verdict = self.classifier.classify(&declared)?;
        if verdict.compatibility == Compatibility::Unsupported {
            return Err(SchemaError::SchemaNotFound {
                version: verdict.version.to_string(),
                artifact: MEDIAPLAN_SCHEMA.to_string(),
            });
        }

        // A newer minor of the current major has no bundled contract of its
        // own; it is validated against the current one and unknown fields
        // are reported as warnings rather than errors.
        let effective = if verdict.compatibility == Compatibility::ForwardMinor {
            self.registry.current_version()
        } else {
            verdict.version
        };

        let definition = self.registry.load_schema(effective, MEDIAPLAN_SCHEMA)?;

        let mut errors = structural_errors(&definition, media_plan);
        errors.extend(enum_errors(media_plan));
        errors.extend(business_rule_errors(media_plan, effective));
        if verdict.compatibility == Compatibility::ForwardMinor {
            errors.extend(unknown_field_warnings(&definition, media_plan));
        }

        debug!(
            version = %effective,
            declared = %verdict.version,
            problems = errors.len(),
            "validation completed"
        );
        Ok(errors)
    }

    /// Validate a media plan read from a caller-supplied byte stream.
    ///
    /// Read or deserialization failures are wrapped as a `Validation` error
    /// with the original cause preserved.
    pub fn validate_reader<R: Read>(&self, reader: R, version: Option<&str>) -> Result<Vec<String>> {
        let media_plan: Value =
            serde_json::from_reader(reader).map_err(|e| SchemaError::Validation {
                context: "document stream".to_string(),
                source: Box::new(e),
            })?;
        self.validate(&media_plan, version)
    }

    /// Validate a media plan JSON file.
    pub fn validate_file(&self, path: impl AsRef<Path>, version: Option<&str>) -> Result<Vec<String>> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| SchemaError::Validation {
            context: path.display().to_string(),
            source: Box::new(e),
        })?;
        self.validate_reader(std::io::BufReader::new(file), version)
    }
}

fn structural_errors(definition: &SchemaDefinition, media_plan: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    if let Err(violations) = definition.compiled().validate(media_plan) {
        for violation in violations {
            let path = readable_path(&violation.instance_path.to_string());
            errors.push(format!("Validation error at {}: {}", path, violation));
        }
    }
    errors
}

/// Render a JSON pointer ("/campaign/budget") as "campaign -> budget".
fn readable_path(pointer: &str) -> String {
    let segments: Vec<&str> = pointer.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "root".to_string()
    } else {
        segments.join(" -> ")
    }
}

fn enum_errors(media_plan: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(campaign) = media_plan.get("campaign") {
        check_enum(
            &mut errors,
            "campaign",
            "audience_gender",
            campaign.get("audience_gender"),
            VALID_GENDERS,
        );
        check_enum(
            &mut errors,
            "campaign",
            "location_type",
            campaign.get("location_type"),
            VALID_LOCATION_TYPES,
        );
        for (i, audience) in array_items(campaign.get("target_audiences")) {
            check_enum(
                &mut errors,
                &format!("campaign target audience {}", i),
                "demo_gender",
                audience.get("demo_gender"),
                VALID_GENDERS,
            );
        }
        for (i, location) in array_items(campaign.get("target_locations")) {
            check_enum(
                &mut errors,
                &format!("campaign target location {}", i),
                "location_type",
                location.get("location_type"),
                VALID_LOCATION_TYPES,
            );
        }
    }

    for (i, item) in array_items(media_plan.get("lineitems")) {
        let context = lineitem_context(i, item);
        check_enum(&mut errors, &context, "channel", item.get("channel"), VALID_CHANNELS);
        check_enum(&mut errors, &context, "kpi", item.get("kpi"), VALID_KPIS);
    }

    errors
}

/// Membership check for a closed value set; comparison is case-insensitive
/// and an unrecognized value names the field and lists the alternatives.
fn check_enum(
    errors: &mut Vec<String>,
    context: &str,
    field: &str,
    value: Option<&Value>,
    valid: &[&str],
) {
    if let Some(text) = value.and_then(Value::as_str) {
        if !valid.iter().any(|v| v.eq_ignore_ascii_case(text)) {
            errors.push(format!(
                "{}: unrecognized {} '{}'. Valid values are: {}",
                context,
                field,
                text,
                valid.join(", ")
            ));
        }
    }
}

fn business_rule_errors(media_plan: &Value, version: SchemaVersion) -> Vec<String> {
    let mut errors = Vec::new();

    errors.extend(meta_errors(media_plan.get("meta")));

    let campaign = media_plan.get("campaign");
    let campaign_window = campaign.map(date_window).unwrap_or((None, None));
    if let Some(campaign) = campaign {
        errors.extend(campaign_errors(campaign, campaign_window));
    }

    for (i, item) in array_items(media_plan.get("lineitems")) {
        errors.extend(lineitem_errors(i, item, campaign_window));
    }

    if version.major() >= 2 {
        if let Some(dictionary) = media_plan.get("dictionary") {
            errors.extend(dictionary_errors(dictionary));
        }
    }

    errors
}

fn meta_errors(meta: Option<&Value>) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(meta) = meta else {
        return errors;
    };

    let is_current = meta.get("is_current").and_then(Value::as_bool);
    let is_archived = meta.get("is_archived").and_then(Value::as_bool);
    if is_current == Some(true) && is_archived == Some(true) {
        errors.push(
            "Media plan cannot be both current (is_current: true) and archived (is_archived: true)"
                .to_string(),
        );
    }

    let parent_id = meta.get("parent_id").and_then(Value::as_str);
    let plan_id = meta.get("id").and_then(Value::as_str);
    if let (Some(parent), Some(id)) = (parent_id, plan_id) {
        if parent == id {
            errors.push("Media plan parent_id cannot reference itself".to_string());
        }
    }

    errors
}

fn campaign_errors(
    campaign: &Value,
    window: (Option<NaiveDate>, Option<NaiveDate>),
) -> Vec<String> {
    let mut errors = Vec::new();

    errors.extend(date_field_errors("campaign", campaign));
    if let (Some(start), Some(end)) = window {
        if start > end {
            errors.push(format!(
                "campaign start_date ({}) is after end_date ({})",
                start, end
            ));
        }
    }

    // Budget is a scalar in v1.0 and an object with a total in v2.0; the
    // total must be strictly positive in either shape.
    let total = match campaign.get("budget") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::Object(budget)) => budget.get("total").and_then(Value::as_f64),
        _ => None,
    };
    if let Some(total) = total {
        if total <= 0.0 {
            errors.push(format!(
                "campaign budget total must be strictly positive, got: {}",
                total
            ));
        }
    }

    errors
}

fn lineitem_errors(
    index: usize,
    item: &Value,
    campaign_window: (Option<NaiveDate>, Option<NaiveDate>),
) -> Vec<String> {
    let mut errors = Vec::new();
    let context = lineitem_context(index, item);

    errors.extend(date_field_errors(&context, item));
    let (start, end) = date_window(item);
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            errors.push(format!(
                "{}: start_date ({}) must be before or equal to end_date ({})",
                context, start, end
            ));
        }
    }

    // Line items must fall inside the campaign flight dates.
    if let (Some(item_start), Some(campaign_start)) = (start, campaign_window.0) {
        if item_start < campaign_start {
            errors.push(format!(
                "{}: starts before campaign: {} < {}",
                context, item_start, campaign_start
            ));
        }
    }
    if let (Some(item_end), Some(campaign_end)) = (end, campaign_window.1) {
        if item_end > campaign_end {
            errors.push(format!(
                "{}: ends after campaign: {} > {}",
                context, item_end, campaign_end
            ));
        }
    }

    // Cost and metric fields must be non-negative.
    for (field, value) in item.as_object().into_iter().flatten() {
        let field = field.as_str();
        if (field.starts_with("cost_") && field != "cost_currency") || field.starts_with("metric_") {
            if let Some(number) = value.as_f64() {
                if number < 0.0 {
                    errors.push(format!(
                        "{}: {} must be non-negative, got: {}",
                        context, field, number
                    ));
                }
            }
        }
    }

    // Custom labels are only meaningful when the main field is 'other'.
    for (main_field, custom_field) in [("channel", "channel_custom"), ("kpi", "kpi_custom")] {
        let main = item.get(main_field).and_then(Value::as_str);
        let custom = item.get(custom_field).and_then(Value::as_str);
        if let (Some(main), Some(_)) = (main, custom) {
            if !main.eq_ignore_ascii_case("other") {
                errors.push(format!(
                    "{}: {} should only be set when {} is 'other'",
                    context, custom_field, main_field
                ));
            }
        }
    }

    if let Some(currency) = item.get("cost_currency").and_then(Value::as_str) {
        let trimmed = currency.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.push(format!(
                "{}: cost_currency should be a 3-letter currency code, got: {}",
                context, currency
            ));
        }
    }

    errors
}

fn dictionary_errors(dictionary: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(dimensions) = dictionary
        .get("lineitem_custom_dimensions")
        .and_then(Value::as_object)
    else {
        return errors;
    };

    for (field_name, config) in dimensions {
        if !is_custom_dimension_name(field_name) {
            errors.push(format!("Invalid custom dimension field name: {}", field_name));
        }

        let Some(config) = config.as_object() else {
            errors.push(format!(
                "Custom dimension field '{}' configuration must be an object",
                field_name
            ));
            continue;
        };

        let status = config.get("status").and_then(Value::as_str);
        match status {
            None => errors.push(format!(
                "Custom dimension field '{}' missing required 'status' field",
                field_name
            )),
            Some(status) if !CUSTOM_FIELD_STATUSES.contains(&status) => errors.push(format!(
                "Custom dimension field '{}' status must be 'enabled' or 'disabled', got: {}",
                field_name, status
            )),
            _ => {}
        }

        if status == Some("enabled") {
            match config.get("caption").and_then(Value::as_str) {
                None => errors.push(format!(
                    "Custom dimension field '{}' requires 'caption' when status is 'enabled'",
                    field_name
                )),
                Some(caption) if caption.trim().is_empty() => errors.push(format!(
                    "Custom dimension field '{}' caption cannot be empty when enabled",
                    field_name
                )),
                Some(caption) if caption.chars().count() > MAX_CAPTION_LENGTH => {
                    errors.push(format!(
                        "Custom dimension field '{}' caption too long (max {} characters)",
                        field_name, MAX_CAPTION_LENGTH
                    ))
                }
                _ => {}
            }
        }
    }

    errors
}

/// dim_custom1 through dim_custom10.
fn is_custom_dimension_name(name: &str) -> bool {
    name.strip_prefix("dim_custom")
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| (1..=10).contains(&n))
}

/// Unknown-field scan for forward-minor documents: fields the current
/// contract does not declare are advisory, never fatal.
fn unknown_field_warnings(definition: &SchemaDefinition, media_plan: &Value) -> Vec<String> {
    let mut warnings = Vec::new();
    collect_unknown_fields(
        definition.document(),
        definition.document(),
        media_plan,
        "root",
        &mut warnings,
    );
    warnings
}

fn collect_unknown_fields(
    root_schema: &Value,
    schema: &Value,
    instance: &Value,
    path: &str,
    warnings: &mut Vec<String>,
) {
    let schema = resolve_ref(root_schema, schema);

    match instance {
        Value::Object(fields) => {
            let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
                return;
            };
            for (name, value) in fields {
                match properties.get(name) {
                    Some(field_schema) => {
                        let child_path = format!("{} -> {}", path, name);
                        collect_unknown_fields(root_schema, field_schema, value, &child_path, warnings);
                    }
                    None => warnings.push(format!(
                        "Warning: unknown field '{}' at {} is not part of the current schema and is ignored",
                        name, path
                    )),
                }
            }
        }
        Value::Array(items) => {
            if let Some(item_schema) = schema.get("items") {
                for (i, item) in items.iter().enumerate() {
                    let child_path = format!("{} -> {}", path, i);
                    collect_unknown_fields(root_schema, item_schema, item, &child_path, warnings);
                }
            }
        }
        _ => {}
    }
}

/// Resolve a local `$ref` ("#/definitions/...") against the root schema.
fn resolve_ref<'a>(root_schema: &'a Value, schema: &'a Value) -> &'a Value {
    if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
        if let Some(pointer) = reference.strip_prefix('#') {
            if let Some(resolved) = root_schema.pointer(pointer) {
                return resolved;
            }
        }
    }
    schema
}

fn lineitem_context(index: usize, item: &Value) -> String {
    let id = item.get("id").and_then(Value::as_str).unwrap_or("unnamed");
    format!("Line item {} ({})", index, id)
}

fn array_items(value: Option<&Value>) -> impl Iterator<Item = (usize, &Value)> {
    value
        .and_then(Value::as_array)
        .map(|a| a.as_slice())
        .unwrap_or_default()
        .iter()
        .enumerate()
}

fn date_window(section: &Value) -> (Option<NaiveDate>, Option<NaiveDate>) {
    (
        parse_date(section.get("start_date")),
        parse_date(section.get("end_date")),
    )
}

fn parse_date(value: Option<&Value>) -> Option<NaiveDate> {
    value
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// Dates that are present as strings but unparseable are their own error;
/// the structural pass only asserts the string type.
fn date_field_errors(context: &str, section: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    for field in ["start_date", "end_date"] {
        if let Some(text) = section.get(field).and_then(Value::as_str) {
            if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() {
                errors.push(format!(
                    "{}: invalid {} '{}' (expected YYYY-MM-DD)",
                    context, field, text
                ));
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> SchemaValidator {
        SchemaValidator::new(Arc::new(SchemaRegistry::new().unwrap()))
    }

    fn valid_v2_plan() -> Value {
        json!({
            "meta": {
                "id": "mp-001",
                "schema_version": "2.0",
                "created_by_name": "Planner"
            },
            "campaign": {
                "id": "c-001",
                "name": "Spring Launch",
                "objective": "awareness",
                "start_date": "2026-03-01",
                "end_date": "2026-05-31",
                "budget": { "total": 100000, "currency": "USD" },
                "target_audiences": [
                    { "name": "Males 25-40", "demo_age_start": 25, "demo_age_end": 40, "demo_gender": "Male" }
                ],
                "target_locations": [
                    { "name": "United States", "location_type": "Country", "location_list": ["United States"] }
                ]
            },
            "lineitems": [
                {
                    "id": "li-001",
                    "name": "Social push",
                    "start_date": "2026-03-01",
                    "end_date": "2026-04-15",
                    "cost_total": 40000,
                    "cost_currency": "USD",
                    "channel": "social",
                    "kpi": "cpm",
                    "metric_impressions": 1000000
                }
            ],
            "dictionary": {
                "lineitem_custom_dimensions": {
                    "dim_custom1": { "status": "enabled", "caption": "Region" }
                }
            }
        })
    }

    #[test]
    fn test_valid_current_plan_has_no_errors() {
        let errors = validator().validate(&valid_v2_plan(), None).unwrap();
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_version_read_from_document() {
        let mut plan = valid_v2_plan();
        plan["meta"]["schema_version"] = json!("v2.0.0");
        let errors = validator().validate(&plan, None).unwrap();
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_missing_version_is_an_error() {
        let mut plan = valid_v2_plan();
        plan["meta"]
            .as_object_mut()
            .unwrap()
            .remove("schema_version");
        let result = validator().validate(&plan, None);
        assert!(matches!(result, Err(SchemaError::MissingVersion)));
    }

    #[test]
    fn test_explicit_version_overrides_embedded() {
        // Declared 2.0 in the document but validated as 1.0: the v1.0
        // contract expects a scalar budget, so the v2.0 shape fails.
        let errors = validator().validate(&valid_v2_plan(), Some("1.0")).unwrap();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_missing_required_field_names_it() {
        let mut plan = valid_v2_plan();
        plan["campaign"].as_object_mut().unwrap().remove("objective");
        let errors = validator().validate(&plan, None).unwrap();
        assert!(
            errors.iter().any(|e| e.contains("objective")),
            "errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_wrong_type_is_reported_with_path() {
        let mut plan = valid_v2_plan();
        plan["campaign"]["budget"]["total"] = json!("lots");
        let errors = validator().validate(&plan, None).unwrap();
        assert!(
            errors
                .iter()
                .any(|e| e.contains("campaign -> budget -> total")),
            "errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_unknown_channel_lists_alternatives() {
        let mut plan = valid_v2_plan();
        plan["lineitems"][0]["channel"] = json!("skywriting");
        let errors = validator().validate(&plan, None).unwrap();
        let error = errors
            .iter()
            .find(|e| e.contains("unrecognized channel 'skywriting'"))
            .expect("channel error");
        for channel in VALID_CHANNELS {
            assert!(error.contains(channel), "missing {} in {}", channel, error);
        }
    }

    #[test]
    fn test_enum_membership_is_case_insensitive() {
        let mut plan = valid_v2_plan();
        plan["lineitems"][0]["channel"] = json!("Social");
        plan["lineitems"][0]["kpi"] = json!("CPM");
        let errors = validator().validate(&plan, None).unwrap();
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_lineitem_date_order_is_business_rule() {
        let mut plan = valid_v2_plan();
        plan["lineitems"][0]["start_date"] = json!("2026-04-20");
        plan["lineitems"][0]["end_date"] = json!("2026-04-10");
        let errors = validator().validate(&plan, None).unwrap();
        assert!(
            errors
                .iter()
                .any(|e| e.contains("li-001") && e.contains("before or equal")),
            "errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_lineitem_outside_campaign_window() {
        let mut plan = valid_v2_plan();
        plan["lineitems"][0]["end_date"] = json!("2026-07-01");
        let errors = validator().validate(&plan, None).unwrap();
        assert!(
            errors.iter().any(|e| e.contains("ends after campaign")),
            "errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let mut plan = valid_v2_plan();
        plan["campaign"]["budget"]["total"] = json!(0);
        let errors = validator().validate(&plan, None).unwrap();
        assert!(
            errors.iter().any(|e| e.contains("strictly positive")),
            "errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_negative_cost_is_rejected() {
        let mut plan = valid_v2_plan();
        plan["lineitems"][0]["cost_media"] = json!(-10);
        let errors = validator().validate(&plan, None).unwrap();
        assert!(
            errors.iter().any(|e| e.contains("cost_media")),
            "errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_custom_label_requires_other() {
        let mut plan = valid_v2_plan();
        plan["lineitems"][0]["channel_custom"] = json!("podcasts");
        let errors = validator().validate(&plan, None).unwrap();
        assert!(
            errors
                .iter()
                .any(|e| e.contains("channel_custom should only be set when channel is 'other'")),
            "errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_bad_currency_code() {
        let mut plan = valid_v2_plan();
        plan["lineitems"][0]["cost_currency"] = json!("US");
        let errors = validator().validate(&plan, None).unwrap();
        assert!(
            errors.iter().any(|e| e.contains("3-letter currency code")),
            "errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_invalid_date_text() {
        let mut plan = valid_v2_plan();
        plan["campaign"]["start_date"] = json!("March 1st");
        let errors = validator().validate(&plan, None).unwrap();
        assert!(
            errors.iter().any(|e| e.contains("invalid start_date")),
            "errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_dictionary_rules() {
        let mut plan = valid_v2_plan();
        plan["dictionary"]["lineitem_custom_dimensions"] = json!({
            "dim_custom11": { "status": "enabled", "caption": "Too many" },
            "dim_custom2": { "status": "paused" },
            "dim_custom3": { "status": "enabled" }
        });
        let errors = validator().validate(&plan, None).unwrap();
        assert!(errors.iter().any(|e| e.contains("dim_custom11")));
        assert!(errors
            .iter()
            .any(|e| e.contains("dim_custom2") && e.contains("'enabled' or 'disabled'")));
        assert!(errors
            .iter()
            .any(|e| e.contains("dim_custom3") && e.contains("requires 'caption'")));
    }

    #[test]
    fn test_meta_flags_are_mutually_exclusive() {
        let mut plan = valid_v2_plan();
        plan["meta"]["is_current"] = json!(true);
        plan["meta"]["is_archived"] = json!(true);
        let errors = validator().validate(&plan, None).unwrap();
        assert!(
            errors.iter().any(|e| e.contains("both current")),
            "errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_forward_minor_unknown_fields_are_warnings() {
        let mut plan = valid_v2_plan();
        plan["meta"]["schema_version"] = json!("2.1");
        plan["campaign"]["pacing_strategy"] = json!("even");
        let errors = validator().validate(&plan, None).unwrap();
        let warning = errors
            .iter()
            .find(|e| e.contains("pacing_strategy"))
            .expect("unknown-field warning");
        assert!(warning.starts_with("Warning:"), "got: {}", warning);
        assert!(
            errors.iter().all(|e| e.starts_with("Warning:")),
            "errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_unsupported_version_is_infrastructure_error() {
        let result = validator().validate(&valid_v2_plan(), Some("3.0"));
        assert!(matches!(result, Err(SchemaError::SchemaNotFound { .. })));
    }

    #[test]
    fn test_validate_reader_wraps_parse_failures() {
        let result = validator().validate_reader("not json".as_bytes(), None);
        assert!(matches!(result, Err(SchemaError::Validation { .. })));
    }
}
