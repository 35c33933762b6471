//! Forgiving field deserializers for model replies and request bodies.
//!
//! A body that is valid JSON should never be rejected because one field has
//! the wrong type. These helpers coerce what they can and default the rest.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a string, accepting numbers and booleans in their text form.
///
/// `null`, arrays and objects become the empty string.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(value).unwrap_or_default())
}

/// Like [`lenient_string`], but `null` and non-scalars become `None`.
pub fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(value))
}

/// Reads a list of strings.
///
/// A lone scalar becomes a one-element list; non-scalar items are skipped.
pub fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    })
}

/// Reads a list of `T`, dropping items that do not deserialize.
///
/// Anything other than an array becomes an empty list.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Reads a `T`, falling back to its default on `null` or a type mismatch.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Row {
        #[serde(deserialize_with = "lenient_string")]
        line: String,
        #[serde(deserialize_with = "lenient_strings")]
        steps: Vec<String>,
        #[serde(deserialize_with = "lenient_list")]
        children: Vec<Child>,
        #[serde(deserialize_with = "or_default")]
        kind: Kind,
        #[serde(deserialize_with = "lenient_opt_string")]
        note: Option<String>,
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Child {
        id: String,
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Kind {
        #[default]
        Plain,
        Fancy,
    }

    #[test]
    fn numbers_and_booleans_become_text() {
        let row: Row = serde_json::from_value(json!({"line": 12})).unwrap();
        assert_eq!(row.line, "12");

        let row: Row = serde_json::from_value(json!({"line": true, "note": 42})).unwrap();
        assert_eq!(row.line, "true");
        assert_eq!(row.note.as_deref(), Some("42"));
    }

    #[test]
    fn null_fields_take_defaults() {
        let row: Row = serde_json::from_value(json!({
            "line": null,
            "steps": null,
            "children": null,
            "kind": null,
            "note": null
        }))
        .unwrap();
        assert_eq!(row, Row::default());
    }

    #[test]
    fn string_lists_accept_scalars_and_skip_objects() {
        let row: Row =
            serde_json::from_value(json!({"steps": ["open", 2, {"x": 1}, null]})).unwrap();
        assert_eq!(row.steps, vec!["open", "2"]);

        let row: Row = serde_json::from_value(json!({"steps": "only step"})).unwrap();
        assert_eq!(row.steps, vec!["only step"]);
    }

    #[test]
    fn bad_list_items_are_dropped() {
        let row: Row =
            serde_json::from_value(json!({"children": [{"id": "a"}, "junk", {"id": "b"}]}))
                .unwrap();
        assert_eq!(
            row.children,
            vec![Child { id: "a".into() }, Child { id: "b".into() }]
        );
    }

    #[test]
    fn mismatched_enum_takes_default() {
        let row: Row = serde_json::from_value(json!({"kind": 3})).unwrap();
        assert_eq!(row.kind, Kind::Plain);

        let row: Row = serde_json::from_value(json!({"kind": "fancy"})).unwrap();
        assert_eq!(row.kind, Kind::Fancy);
    }
}
