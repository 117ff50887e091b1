use std::sync::Arc;

use garde::Validate;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{ApiError, Source};
use crate::meta::SchemaInfo;

/// Bound bundle for types usable as a body/query/params schema:
/// deserializable, garde-validated, and schema-bearing.
pub trait Schema:
    DeserializeOwned + Serialize + Validate + JsonSchema + Send + Sync + 'static
{
}

impl<T> Schema for T where
    T: DeserializeOwned + Serialize + Validate + JsonSchema + Send + Sync + 'static
{
}

type RunFn = Arc<dyn Fn(Value) -> Result<Value, ApiError> + Send + Sync>;

/// Type-erased validation step for one request field.
///
/// Running it parses the designated field, validates the result with garde
/// and returns the replacement value, so serde defaults and string
/// coercions are visible to the handler. On failure it reports the first
/// offending field and message, aborting the chain before the handler runs.
pub struct SchemaValidator {
    source: Source,
    info: SchemaInfo,
    run_fn: RunFn,
}

impl SchemaValidator {
    pub fn of<T>(source: Source) -> Self
    where
        T: Schema,
        T::Context: Default,
    {
        let schema = serde_json::to_value(schemars::schema_for!(T))
            .unwrap_or_else(|_| json!({ "type": "object" }));
        let info = SchemaInfo {
            name: T::schema_name().into_owned(),
            schema: schema.clone(),
        };
        // Query and path parameters always arrive as strings.
        let coercible = matches!(source, Source::Query | Source::Params);
        let run_fn: RunFn = Arc::new(move |mut value: Value| {
            if coercible {
                coerce_strings(&schema, &mut value);
            }
            let parsed: T = serde_json::from_value(value)
                .map_err(|err| ApiError::validation(source, source.as_str(), err.to_string()))?;
            if let Err(report) = parsed.validate() {
                return Err(first_issue(source, &report));
            }
            serde_json::to_value(&parsed).map_err(|err| ApiError::Internal(err.to_string()))
        });
        Self {
            source,
            info,
            run_fn,
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn info(&self) -> &SchemaInfo {
        &self.info
    }

    /// Validate the raw field value, returning its replacement.
    pub fn run(&self, value: Value) -> Result<Value, ApiError> {
        (self.run_fn)(value).inspect_err(|err| {
            tracing::warn!(source = %self.source, error = %err, "validation failed");
        })
    }
}

/// First validation issue of a garde report, as the structured error.
fn first_issue(source: Source, report: &garde::Report) -> ApiError {
    match report.iter().next() {
        Some((path, error)) => {
            let field = {
                let s = path.to_string();
                if s.is_empty() {
                    source.as_str().to_string()
                } else {
                    s
                }
            };
            ApiError::validation(source, field, error.message().to_string())
        }
        None => ApiError::validation(source, source.as_str(), "validation failed"),
    }
}

/// Best-effort coercion of string values into the scalar types the schema
/// expects. Leaves values untouched when parsing fails, so the subsequent
/// deserialization reports the error.
fn coerce_strings(schema: &Value, value: &mut Value) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };
    let Value::Object(fields) = value else {
        return;
    };
    for (name, field) in fields.iter_mut() {
        if let Some(prop) = properties.get(name) {
            coerce_one(prop, field);
        }
    }
}

fn coerce_one(prop: &Value, field: &mut Value) {
    // "type" may be a single string or a list (e.g. ["integer", "null"]).
    let kinds: Vec<&str> = match prop.get("type") {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(list)) => list.iter().filter_map(Value::as_str).collect(),
        _ => return,
    };

    if kinds.contains(&"array") {
        // A single occurrence of a repeatable key parses as a lone string.
        if field.is_string() {
            let single = field.take();
            *field = Value::Array(vec![single]);
        }
        if let (Value::Array(items), Some(item_schema)) = (&mut *field, prop.get("items")) {
            for item in items {
                coerce_one(item_schema, item);
            }
        }
        return;
    }

    let Value::String(raw) = &*field else {
        return;
    };
    for kind in kinds {
        let coerced = match kind {
            "integer" => raw.parse::<i64>().ok().map(Value::from),
            "number" => raw.parse::<f64>().ok().map(Value::from),
            "boolean" => raw.parse::<bool>().ok().map(Value::Bool),
            "null" if raw.is_empty() => Some(Value::Null),
            _ => None,
        };
        if let Some(new_value) = coerced {
            *field = new_value;
            return;
        }
    }
}
