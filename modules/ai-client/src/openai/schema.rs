use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Types that can be requested as strict JSON-schema structured output.
///
/// Strict mode wants `additionalProperties: false` on every object, every
/// property listed in `required` (nullable ones included), and no `$ref`s.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    fn strict_schema() -> Value {
        let mut value = serde_json::to_value(schema_for!(Self)).unwrap_or_default();

        let definitions = value.get("definitions").cloned();
        if let Some(defs) = definitions {
            inline_refs(&mut value, &defs);
        }
        close_objects(&mut value);

        if let Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
        }

        value
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type") == Some(&Value::String("object".to_string())) {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
                let keys: Option<Vec<Value>> = map
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| props.keys().cloned().map(Value::String).collect());
                if let Some(keys) = keys {
                    map.insert("required".to_string(), Value::Array(keys));
                }
            }
            map.values_mut().for_each(close_objects);
        }
        Value::Array(items) => items.iter_mut().for_each(close_objects),
        _ => {}
    }
}

fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(path)) = map.get("$ref").cloned() {
                if let Some(def) = path
                    .strip_prefix("#/definitions/")
                    .and_then(|name| definitions.get(name))
                {
                    *value = def.clone();
                    inline_refs(value, definitions);
                    return;
                }
            }

            // schemars wraps documented refs as `allOf: [ { $ref } ]`
            if let Some(Value::Array(all_of)) = map.get("allOf").cloned() {
                if let [single] = all_of.as_slice() {
                    *value = single.clone();
                    inline_refs(value, definitions);
                    return;
                }
            }

            map.values_mut().for_each(|v| inline_refs(v, definitions));
        }
        Value::Array(items) => items.iter_mut().for_each(|v| inline_refs(v, definitions)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct Step {
        kind: String,
        target: Option<String>,
    }

    #[derive(Deserialize, JsonSchema)]
    struct Plan {
        steps: Vec<Step>,
        note: Option<String>,
    }

    #[test]
    fn nullable_fields_are_still_required() {
        let schema = Plan::strict_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"steps"));
        assert!(required.contains(&"note"));
        assert_eq!(schema["additionalProperties"], Value::Bool(false));
    }

    #[test]
    fn nested_definitions_are_inlined_and_closed() {
        let schema = Plan::strict_schema();
        let obj = schema.as_object().unwrap();
        assert!(!obj.contains_key("definitions"));
        assert!(!obj.contains_key("$schema"));

        let item = &schema["properties"]["steps"]["items"];
        assert!(item.get("$ref").is_none());
        assert_eq!(item["type"], Value::String("object".into()));
        assert_eq!(item["additionalProperties"], Value::Bool(false));
    }
}
