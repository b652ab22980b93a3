//! # Configuration Document
//!
//! The plugin/native configuration document: typed model, outer
//! document validation, and assembly of the per-native validator map.
//!
//! ## Design
//!
//! Validation happens in two layers. The embedded JSON Schema checks
//! everything expressible structurally (required fields, string bounds,
//! enums, patterns). Two rules it cannot express — `max` must exceed
//! `min` within one constraint, and the constraint count must match the
//! declared dimensionality — are checked on the typed model afterwards,
//! reported with the same path convention as schema violations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use sgr_core::StructureDescription;

use crate::constraint::{DEFAULT_MAX, DEFAULT_MIN};
use crate::engine::{ArraySpec, NumberSpec, ObjectSpec, ValidatorEngine};
use crate::error::{display_path, CompileError, ValidationError};
use crate::native::{native_schemas, NativeSchemas};

/// The embedded outer document schema (JSON Schema draft 2020-12).
const CONFIG_SCHEMA: &str = include_str!("../schemas/config.schema.json");

/// Key pattern for dynamically named objects: anything but `*`, bounded.
pub const ANY_KEY_PATTERN: &str = "[^*]{1,100}";

/// Separator accepted between a key-family prefix and the key body.
const KEY_SEP: &str = "[_.-]";

/// A plugin author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A rendering declaration: the structures a native's renderers accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendering {
    pub structures: Vec<StructureDescription>,
}

/// One named rendering backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Native {
    pub name: String,
    /// Keys allowed in this native's configuration section.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conf: Vec<String>,
    pub rendering: Rendering,
}

/// One plugin: metadata plus the natives it provides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub author: Author,
    pub natives: Vec<Native>,
}

/// The whole configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub plugins: Vec<Plugin>,
}

/// Compiled validator for the outer configuration document.
pub struct DocumentValidator {
    validator: jsonschema::Validator,
}

impl DocumentValidator {
    /// Build the validator from the embedded schema.
    pub fn new() -> Result<Self, CompileError> {
        let schema: Value = serde_json::from_str(CONFIG_SCHEMA)
            .map_err(|e| CompileError::Schema(e.to_string()))?;
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        let validator = opts
            .build(&schema)
            .map_err(|e| CompileError::Schema(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Check a raw document against the outer schema, reporting the
    /// first violation with its instance path.
    pub fn assert_valid(&self, instance: &Value) -> Result<(), ValidationError> {
        if let Some(err) = self.validator.iter_errors(instance).next() {
            return Err(ValidationError::ConfigShape {
                path: display_path(&err.instance_path.to_string()),
                message: err.to_string(),
            });
        }
        Ok(())
    }
}

/// Cross-field rules the document schema cannot express.
fn semantic_checks(config: &Configuration) -> Result<(), ValidationError> {
    for (p, plugin) in config.plugins.iter().enumerate() {
        for (n, native) in plugin.natives.iter().enumerate() {
            for (s, structure) in native.rendering.structures.iter().enumerate() {
                let base = format!("/plugins/{p}/natives/{n}/rendering/structures/{s}");
                if structure.constraints.len() != structure.dim as usize {
                    return Err(ValidationError::ConfigShape {
                        path: format!("{base}/constraints"),
                        message: format!(
                            "dim {} requires exactly {} constraints, found {}",
                            structure.dim,
                            structure.dim,
                            structure.constraints.len()
                        ),
                    });
                }
                for (c, constraint) in structure.constraints.iter().enumerate() {
                    let min = constraint.min.unwrap_or(DEFAULT_MIN);
                    let max = constraint.max.unwrap_or(DEFAULT_MAX);
                    if max <= min {
                        return Err(ValidationError::ConfigShape {
                            path: format!("{base}/constraints/{c}"),
                            message: format!(
                                "\"max\" ({max}) must be greater than \"min\" ({min})"
                            ),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

impl Configuration {
    /// Validate a raw document and parse it into the typed model.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        DocumentValidator::new()
            .map_err(|e| ValidationError::ConfigShape {
                path: "(root)".to_string(),
                message: e.to_string(),
            })?
            .assert_valid(value)?;
        let config: Configuration =
            serde_json::from_value(value.clone()).map_err(|e| ValidationError::ConfigShape {
                path: "(root)".to_string(),
                message: e.to_string(),
            })?;
        semantic_checks(&config)?;
        Ok(config)
    }

    /// Compile every native's validators and the key-regex families.
    pub fn build<E: ValidatorEngine>(
        &self,
        engine: &E,
    ) -> Result<Build<E::Schema>, CompileError> {
        let mut natives = BTreeMap::new();
        for plugin in &self.plugins {
            for native in &plugin.natives {
                natives.insert(native.name.clone(), native_schemas(engine, native)?);
            }
        }
        debug!(natives = natives.len(), "compiled configuration validators");

        let validators = Validators {
            natives,
            unique_data: engine.object(
                ObjectSpec {
                    min_properties: Some(1),
                    ..Default::default()
                },
                vec![],
            ),
            transition_data: engine.array(ArraySpec::default(), engine.any()),
            edge_data: engine.number(NumberSpec::default()),
        };
        Ok(Build {
            validators,
            regexes: KeyRegexes::new(),
        })
    }
}

/// Everything `build` produces: validators plus key-naming patterns.
#[derive(Debug, Clone)]
pub struct Build<S> {
    pub validators: Validators<S>,
    pub regexes: KeyRegexes,
}

/// The compiled validator map for one configuration document.
#[derive(Debug, Clone)]
pub struct Validators<S> {
    /// Per-native validators, keyed by native name.
    pub natives: BTreeMap<String, NativeSchemas<S>>,
    /// Unique-row data: a non-empty object of caller-defined shape.
    pub unique_data: S,
    /// Transition data: an array of caller-defined items.
    pub transition_data: S,
    /// Edge weight data: a single number.
    pub edge_data: S,
}

/// Key-naming patterns for the dynamically keyed sections of the
/// surrounding document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRegexes {
    pub renderers: String,
    pub transitions: String,
    pub transitions_item: String,
    pub iterators: String,
    pub aliases: String,
    pub aliases_item: String,
    pub uniques: String,
    pub nodes: String,
}

impl KeyRegexes {
    /// The fixed pattern set: prefixed families use a one-letter prefix
    /// plus a separator, the rest accept any bounded key.
    pub fn new() -> Self {
        Self {
            renderers: format!("r{KEY_SEP}{ANY_KEY_PATTERN}"),
            transitions: ANY_KEY_PATTERN.to_string(),
            transitions_item: "[A-Za-z0-9]{2,10}".to_string(),
            iterators: format!("i{KEY_SEP}{ANY_KEY_PATTERN}"),
            aliases: ANY_KEY_PATTERN.to_string(),
            aliases_item: ANY_KEY_PATTERN.to_string(),
            uniques: format!("u{KEY_SEP}{ANY_KEY_PATTERN}"),
            nodes: ANY_KEY_PATTERN.to_string(),
        }
    }
}

impl Default for KeyRegexes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::JsonEngine;
    use regex::Regex;
    use serde_json::json;

    fn minimal_config() -> Value {
        json!({
            "plugins": [{
                "name": "plugin1",
                "version": "1.2.3",
                "description": "first plugin",
                "author": {"name": "author1", "url": "https://example.com/author1"},
                "natives": [{
                    "name": "native1",
                    "conf": ["optionA"],
                    "rendering": {
                        "structures": [{
                            "description": "labels",
                            "type": "strings",
                            "tags": ["label"],
                            "constraints": [{"min": 1, "max": 5}]
                        }]
                    }
                }]
            }]
        })
    }

    // ---- outer schema ----

    #[test]
    fn test_valid_document_accepted() {
        let config = Configuration::from_value(&minimal_config()).unwrap();
        assert_eq!(config.plugins.len(), 1);
        assert_eq!(config.plugins[0].natives[0].name, "native1");
    }

    #[test]
    fn test_missing_plugins_rejected() {
        let err = Configuration::from_value(&json!({})).unwrap_err();
        assert!(matches!(err, ValidationError::ConfigShape { .. }));
    }

    #[test]
    fn test_bad_version_rejected() {
        let mut doc = minimal_config();
        doc["plugins"][0]["version"] = json!("not-semver");
        let err = Configuration::from_value(&doc).unwrap_err();
        assert!(err.path().contains("/plugins/0/version"), "{err}");
    }

    #[test]
    fn test_unknown_structure_type_rejected() {
        let mut doc = minimal_config();
        doc["plugins"][0]["natives"][0]["rendering"]["structures"][0]["type"] = json!("xyz");
        assert!(Configuration::from_value(&doc).is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut doc = minimal_config();
        doc["plugins"][0]["unexpected"] = json!(1);
        let err = Configuration::from_value(&doc).unwrap_err();
        assert!(err.path().contains("/plugins/0"), "{err}");
    }

    // ---- semantic checks ----

    #[test]
    fn test_max_not_above_min_rejected() {
        let mut doc = minimal_config();
        doc["plugins"][0]["natives"][0]["rendering"]["structures"][0]["constraints"][0] =
            json!({"min": 5, "max": 5});
        let err = Configuration::from_value(&doc).unwrap_err();
        assert!(
            err.path()
                .ends_with("/rendering/structures/0/constraints/0"),
            "{err}"
        );
        assert!(err.to_string().contains("greater than"), "{err}");
    }

    #[test]
    fn test_constraint_arity_rejected() {
        let mut doc = minimal_config();
        doc["plugins"][0]["natives"][0]["rendering"]["structures"][0]["dim"] = json!(2);
        let err = Configuration::from_value(&doc).unwrap_err();
        assert!(
            err.path().ends_with("/rendering/structures/0/constraints"),
            "{err}"
        );
    }

    // ---- build ----

    #[test]
    fn test_build_reports_oversized_multiple() {
        use crate::error::CompileError;

        // Shape-valid document whose scaled bounds leave u64: the
        // default max of 1000 times this multiple overflows. Build must
        // fail cleanly, not panic.
        let mut doc = minimal_config();
        doc["plugins"][0]["natives"][0]["rendering"]["structures"][0]["constraints"][0] =
            json!({"multiple": 100_000_000_000_000_000u64});
        let config = Configuration::from_value(&doc).unwrap();
        let err = config.build(&JsonEngine).unwrap_err();
        assert!(matches!(err, CompileError::BoundsOverflow { .. }), "{err}");
    }

    #[test]
    fn test_build_maps_natives_by_name() {
        let config = Configuration::from_value(&minimal_config()).unwrap();
        let build = config.build(&JsonEngine).unwrap();
        let names: Vec<&String> = build.validators.natives.keys().collect();
        assert_eq!(names, vec!["native1"]);

        let schemas = &build.validators.natives["native1"];
        assert!(schemas.renderer.validate(&json!([{"L": ["alpha"]}])).is_ok());
    }

    #[test]
    fn test_build_shared_validators() {
        let config = Configuration::from_value(&minimal_config()).unwrap();
        let build = config.build(&JsonEngine).unwrap();
        assert!(build.validators.unique_data.validate(&json!({"k": 1})).is_ok());
        assert!(build.validators.unique_data.validate(&json!({})).is_err());
        assert!(build
            .validators
            .transition_data
            .validate(&json!([1, "two"]))
            .is_ok());
        assert!(build.validators.edge_data.validate(&json!(0.5)).is_ok());
        assert!(build.validators.edge_data.validate(&json!("0.5")).is_err());
    }

    // ---- key regexes ----

    #[test]
    fn test_key_regex_families() {
        let regexes = KeyRegexes::new();
        let renderers = Regex::new(&format!("^{}$", regexes.renderers)).unwrap();
        assert!(renderers.is_match("r_main"));
        assert!(renderers.is_match("r.main"));
        assert!(renderers.is_match("r-main"));
        assert!(!renderers.is_match("x_main"));
        assert!(!renderers.is_match("r_has*star"));

        let item = Regex::new(&format!("^{}$", regexes.transitions_item)).unwrap();
        assert!(item.is_match("ab12"));
        assert!(!item.is_match("a"));
        assert!(!item.is_match("toolongtoolong"));

        let uniques = Regex::new(&format!("^{}$", regexes.uniques)).unwrap();
        assert!(uniques.is_match("u_rows"));
        assert!(!uniques.is_match("q_rows"));
    }
}
