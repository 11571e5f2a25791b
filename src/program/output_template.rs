use schemars::JsonSchema;
use serde_json::Value;

use crate::error::{QuestionGenError, Result};

/// 根据类型的 JSON Schema 生成输出模板
pub fn output_template_for<T: JsonSchema>() -> Result<String> {
    let schema = serde_json::to_value(schemars::schema_for!(T))
        .map_err(|e| QuestionGenError::InvalidSchema(e.to_string()))?;
    json_schema_to_output_template(&schema, None, 0, &schema)
}

/// 将 JSON Schema 转换为带生成指令的输出模板
///
/// 对象逐字段展开，数组用 `#geneach` 循环，字符串/数字用 `gen`，
/// 布尔用 `#select`。`$ref` 在 `root` 的 `definitions`/`$defs` 中解析。
/// 数组元素总是从缩进 0 开始渲染。
pub fn json_schema_to_output_template(
    schema: &Value,
    key: Option<&str>,
    indent: usize,
    root: &Value,
) -> Result<String> {
    if schema.get("type").is_none() {
        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            let resolved = resolve_ref(root, reference)?;
            return json_schema_to_output_template(resolved, key, indent, root);
        }
    }

    let schema_type = schema_type(schema).ok_or_else(|| {
        QuestionGenError::InvalidSchema(format!("schema has no type: {}", schema))
    })?;

    match schema_type {
        "object" => {
            let properties = schema
                .get("properties")
                .and_then(Value::as_object)
                .ok_or_else(|| {
                    QuestionGenError::InvalidSchema("object schema has no properties".to_string())
                })?;

            let fields = properties
                .iter()
                .map(|(name, property)| {
                    let value =
                        json_schema_to_output_template(property, Some(name), indent + 1, root)?;
                    Ok(format!("{}\"{}\": {}", pad(indent + 1), name, value))
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(format!("{}{{\n{}\n{}}}", pad(indent), fields.join(",\n"), pad(indent)))
        }
        "array" => {
            let key = require_key(key, schema_type)?;
            let items = schema.get("items").ok_or_else(|| {
                QuestionGenError::InvalidSchema(format!("array `{}` has no items", key))
            })?;
            let extra_args = schema
                .get("maxItems")
                .and_then(Value::as_u64)
                .map(|n| format!(" max_iterations={}", n))
                .unwrap_or_default();

            Ok(format!(
                "[{{{{#geneach '{}' stop=']'{}}}}}{{{{#unless @first}}}}, {{{{/unless}}}}{}{{{{/geneach}}}}]",
                key,
                extra_args,
                json_schema_to_output_template(items, Some("this"), 0, root)?
            ))
        }
        "string" => {
            let key = require_key(key, schema_type)?;
            Ok(format!("\"{{{{gen '{}' stop='\"'}}}}\"", key))
        }
        "integer" | "number" => {
            let key = require_key(key, schema_type)?;
            Ok(format!("\"{{{{gen '{}' stop=',\"'}}}}\"", key))
        }
        "boolean" => {
            let key = require_key(key, schema_type)?;
            Ok(format!("{{{{#select '{}'}}}}True{{{{or}}}}False{{{{/select}}}}", key))
        }
        other => Err(QuestionGenError::InvalidSchema(format!(
            "unsupported schema type `{}`",
            other
        ))),
    }
}

/// 取 schema 的类型；`["string", "null"]` 这类联合类型取第一个非 null
fn schema_type(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(t) => Some(t.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null"),
        _ => None,
    }
}

fn resolve_ref<'a>(root: &'a Value, reference: &str) -> Result<&'a Value> {
    let name = reference.rsplit('/').next().unwrap_or(reference);
    ["definitions", "$defs"]
        .iter()
        .find_map(|section| root.get(section).and_then(|defs| defs.get(name)))
        .ok_or_else(|| {
            QuestionGenError::InvalidSchema(format!("unresolved reference `{}`", reference))
        })
}

fn require_key<'a>(key: Option<&'a str>, schema_type: &str) -> Result<&'a str> {
    key.ok_or_else(|| {
        QuestionGenError::InvalidSchema(format!("{} schema requires a key", schema_type))
    })
}

fn pad(indent: usize) -> String {
    "  ".repeat(indent)
}
