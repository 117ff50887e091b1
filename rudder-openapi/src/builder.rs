use rudder::meta::RouteRecord;
use serde_json::{json, Map, Value};

/// Recursively rewrite `$ref` paths from schemars format to OpenAPI
/// components format.
///
/// schemars 1.x generates JSON Schema Draft 2020-12 using `$defs` and
/// `$ref: "#/$defs/X"`. OpenAPI 3.1.0 expects schemas under
/// `#/components/schemas/X`.
fn sanitize_schema(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(ref_str)) = obj.get_mut("$ref") {
                if ref_str.starts_with("#/$defs/") {
                    *ref_str = ref_str.replace("#/$defs/", "#/components/schemas/");
                }
            }
            for (_, v) in obj.iter_mut() {
                sanitize_schema(v);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                sanitize_schema(v);
            }
        }
        _ => {}
    }
}

/// Insert a schema into the schemas map, promoting `$defs` to top-level
/// components.
fn insert_schema(
    schemas: &mut Map<String, Value>,
    extra_definitions: &mut Vec<(String, Value)>,
    type_name: &str,
    root_schema: &Value,
) {
    let mut schema = root_schema.clone();
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        if let Some(Value::Object(defs)) = obj.remove("$defs") {
            for (def_name, def_schema) in defs {
                extra_definitions.push((def_name, def_schema));
            }
        }
    }
    sanitize_schema(&mut schema);
    schemas.insert(type_name.to_string(), schema);
}

/// One `parameters` entry per property of a recorded query/params schema.
fn schema_parameters(location: &str, schema: &Value) -> Vec<Value> {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    properties
        .iter()
        .map(|(name, prop)| {
            // Path parameters are always required.
            let is_required = location == "path" || required.contains(&name.as_str());
            json!({
                "name": name,
                "in": location,
                "required": is_required,
                "schema": { "type": parameter_type(prop) }
            })
        })
        .collect()
}

fn parameter_type(prop: &Value) -> String {
    match prop.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .find(|kind| *kind != "null")
            .unwrap_or("string")
            .to_string(),
        _ => "string".to_string(),
    }
}

fn operation_id(method: &str, path: &str) -> String {
    let mut id = method.to_lowercase();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        id.push('_');
        id.push_str(
            segment
                .trim_start_matches('{')
                .trim_end_matches('}')
                .trim_start_matches('*'),
        );
    }
    id
}

/// A server entry for the generated document.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub url: String,
    pub description: Option<String>,
}

/// A documentation tag with an optional description.
#[derive(Debug, Clone)]
pub struct TagInfo {
    pub name: String,
    pub description: Option<String>,
}

/// Configuration for the generated OpenAPI specification.
pub struct OpenApiConfig {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub servers: Vec<ServerInfo>,
    pub tags: Vec<TagInfo>,
}

impl OpenApiConfig {
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            title: title.to_string(),
            version: version.to_string(),
            description: None,
            servers: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_server(mut self, url: &str) -> Self {
        self.servers.push(ServerInfo {
            url: url.to_string(),
            description: None,
        });
        self
    }

    pub fn with_server_described(mut self, url: &str, description: &str) -> Self {
        self.servers.push(ServerInfo {
            url: url.to_string(),
            description: Some(description.to_string()),
        });
        self
    }

    pub fn with_tag(mut self, name: &str) -> Self {
        self.tags.push(TagInfo {
            name: name.to_string(),
            description: None,
        });
        self
    }

    pub fn with_tag_described(mut self, name: &str, description: &str) -> Self {
        self.tags.push(TagInfo {
            name: name.to_string(),
            description: Some(description.to_string()),
        });
        self
    }
}

/// Build an OpenAPI 3.1.0 JSON document from config and route metadata.
///
/// Pure transform: no caching, no incremental update; calling it twice on
/// an unchanged record list yields equivalent documents.
pub fn build_spec(config: &OpenApiConfig, routes: &[RouteRecord]) -> Value {
    let mut paths: Map<String, Value> = Map::new();

    for route in routes {
        let method_lower = route.method.to_lowercase();

        let mut operation: Map<String, Value> = Map::new();
        operation.insert(
            "operationId".into(),
            json!(operation_id(&route.method, &route.path)),
        );

        if !route.tags.is_empty() {
            operation.insert("tags".into(), json!(route.tags));
        }
        if let Some(ref summary) = route.summary {
            operation.insert("summary".into(), json!(summary));
        }
        if let Some(ref description) = route.description {
            operation.insert("description".into(), json!(description));
        }

        let mut parameters: Vec<Value> = Vec::new();
        if let Some(ref params_schema) = route.params {
            parameters.extend(schema_parameters("path", params_schema));
        }
        if let Some(ref query) = route.query {
            parameters.extend(schema_parameters("query", &query.schema));
        }
        if !parameters.is_empty() {
            operation.insert("parameters".into(), json!(parameters));
        }

        if let Some(ref body) = route.body {
            operation.insert(
                "requestBody".into(),
                json!({
                    "required": true,
                    "content": {
                        (route.content_type.as_str()): {
                            "schema": { "$ref": format!("#/components/schemas/{}", body.name) }
                        }
                    }
                }),
            );
        }

        operation.insert(
            "responses".into(),
            json!({ "200": { "description": "Success" } }),
        );

        let path_entry = paths.entry(route.path.clone()).or_insert_with(|| json!({}));
        if let Some(obj) = path_entry.as_object_mut() {
            obj.insert(method_lower, Value::Object(operation));
        }
    }

    let mut info: Map<String, Value> = Map::new();
    info.insert("title".into(), json!(config.title));
    info.insert("version".into(), json!(config.version));
    if let Some(ref description) = config.description {
        info.insert("description".into(), json!(description));
    }

    // Collect referenced body schemas into components/schemas. schemars 1.x
    // generates Draft 2020-12 (aligned with OpenAPI 3.1.0): strip `$schema`,
    // promote `$defs` entries and rewrite their `$ref` paths.
    let mut schemas: Map<String, Value> = Map::new();
    let mut extra_definitions: Vec<(String, Value)> = Vec::new();

    for route in routes {
        if let Some(ref body) = route.body {
            if !schemas.contains_key(&body.name) {
                insert_schema(&mut schemas, &mut extra_definitions, &body.name, &body.schema);
            }
        }
    }
    for (def_name, mut def_schema) in extra_definitions {
        sanitize_schema(&mut def_schema);
        schemas.entry(def_name).or_insert(def_schema);
    }

    let mut document: Map<String, Value> = Map::new();
    document.insert("openapi".into(), json!("3.1.0"));
    document.insert("info".into(), Value::Object(info));

    if !config.servers.is_empty() {
        let servers: Vec<Value> = config
            .servers
            .iter()
            .map(|server| match &server.description {
                Some(description) => json!({ "url": server.url, "description": description }),
                None => json!({ "url": server.url }),
            })
            .collect();
        document.insert("servers".into(), json!(servers));
    }

    if !config.tags.is_empty() {
        let tags: Vec<Value> = config
            .tags
            .iter()
            .map(|tag| match &tag.description {
                Some(description) => json!({ "name": tag.name, "description": description }),
                None => json!({ "name": tag.name }),
            })
            .collect();
        document.insert("tags".into(), json!(tags));
    }

    document.insert("paths".into(), Value::Object(paths));

    if !schemas.is_empty() {
        document.insert(
            "components".into(),
            json!({ "schemas": schemas }),
        );
    }

    Value::Object(document)
}
