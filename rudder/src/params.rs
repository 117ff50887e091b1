use serde_json::{json, Map, Value};

/// Parse a query string into a JSON object of string values.
///
/// Repeated keys accumulate into an array, so `?tag=a&tag=b` becomes
/// `{"tag": ["a", "b"]}`.
pub fn parse_query(query: Option<&str>) -> Value {
    let mut map = Map::new();
    if let Some(q) = query {
        for (k, v) in form_urlencoded::parse(q.as_bytes()) {
            let key = k.into_owned();
            let val = Value::String(v.into_owned());
            match map.get_mut(&key) {
                None => {
                    map.insert(key, val);
                }
                Some(Value::Array(items)) => items.push(val),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, val]);
                }
            }
        }
    }
    Value::Object(map)
}

/// Named parameter segments of a route template, in order of appearance.
///
/// Accepts both `:name` segments and axum-style `{name}` / `{*name}`
/// segments. Duplicate names collapse to the first occurrence.
pub fn template_params(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for segment in template.split('/') {
        let name = if let Some(rest) = segment.strip_prefix(':') {
            rest
        } else if segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}') {
            segment[1..segment.len() - 1].trim_start_matches('*')
        } else {
            continue;
        };
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Rewrite `:name` segments to `{name}` so the template can be mounted on
/// axum 0.8 and used verbatim as an OpenAPI path.
pub fn normalize_template(template: &str) -> String {
    template
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) if !name.is_empty() => format!("{{{name}}}"),
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// JSON Schema requiring each named segment to be present as a string.
///
/// Returns `None` for a parameter-less template.
pub fn derived_params_schema(names: &[String]) -> Option<Value> {
    if names.is_empty() {
        return None;
    }
    let mut properties = Map::new();
    for name in names {
        properties.insert(name.clone(), json!({ "type": "string" }));
    }
    Some(json!({
        "type": "object",
        "properties": properties,
        "required": names,
    }))
}
