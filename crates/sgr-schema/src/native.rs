//! # Native Schema Assembly
//!
//! A native declares its own configuration keys and the structure
//! descriptions its renderers accept. Assembly maps the key list into a
//! closed object of optional bounded strings, and the structure list
//! into an array whose items may match any one of the compiled
//! structure schemas.

use tracing::debug;

use crate::config::Native;
use crate::engine::{ArraySpec, Field, ObjectSpec, StringSpec, ValidatorEngine};
use crate::error::CompileError;
use crate::structure::structure_schema;

/// Upper bound on one configuration value.
const MAX_CONF_VALUE_LEN: usize = 1000;

/// The compiled validators for one native.
#[derive(Debug, Clone)]
pub struct NativeSchemas<S> {
    /// Validator for the native's configuration object.
    pub native: S,
    /// Validator for a renderer's data: an array of structure payloads.
    pub renderer: S,
    /// Validator for node-selection data. Currently the same policy as
    /// [`renderer`](Self::renderer).
    pub node_select: S,
}

/// Compile the validators for one native declaration.
pub fn native_schemas<E: ValidatorEngine>(
    engine: &E,
    native: &Native,
) -> Result<NativeSchemas<E::Schema>, CompileError> {
    debug!(
        native = %native.name,
        conf_keys = native.conf.len(),
        structures = native.rendering.structures.len(),
        "assembling native schemas"
    );

    let conf_fields = native
        .conf
        .iter()
        .map(|key| {
            Field::optional(
                key.as_str(),
                engine.string(StringSpec {
                    min_len: Some(1),
                    max_len: Some(MAX_CONF_VALUE_LEN),
                    ..Default::default()
                }),
            )
        })
        .collect();
    let conf = engine.object(
        ObjectSpec {
            closed: true,
            ..Default::default()
        },
        conf_fields,
    );

    let structures = native
        .rendering
        .structures
        .iter()
        .map(|d| structure_schema(engine, d))
        .collect::<Result<Vec<_>, _>>()?;
    let item = engine.one_of("structures", structures);
    let renderer = engine.array(ArraySpec::default(), item);

    Ok(NativeSchemas {
        native: conf,
        node_select: renderer.clone(),
        renderer,
    })
}
