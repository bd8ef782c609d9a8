use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single field value as the catalog reports it.
///
/// Falsy scalars (`null`, `false`, `""`, `0`) collapse into `Missing` so the
/// views can print "Unknown" for them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Missing,
    Scalar(String),
    Sequence(Vec<String>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => FieldValue::Sequence(items.iter().map(scalar_text).collect()),
            v if is_falsy(&v) => FieldValue::Missing,
            v => FieldValue::Scalar(scalar_text(&v)),
        }
    }
}

/// One catalog entry. Fields keep the order the API sent them in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, FieldValue::from(v)))
                .collect(),
        }
    }
}

impl From<Record> for Map<String, Value> {
    fn from(record: Record) -> Self {
        record
            .fields
            .into_iter()
            .map(|(k, v)| {
                let v = match v {
                    FieldValue::Missing => Value::Null,
                    FieldValue::Scalar(s) => Value::String(s),
                    FieldValue::Sequence(items) => {
                        Value::Array(items.into_iter().map(Value::String).collect())
                    }
                };
                (k, v)
            })
            .collect()
    }
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn display_name(&self) -> &str {
        ["name", "title"]
            .iter()
            .find_map(|key| self.get(key).and_then(FieldValue::as_scalar))
            .unwrap_or("Unknown")
    }

    /// The record id is the last path segment of its canonical url,
    /// e.g. `https://swapi.py4e.com/api/people/1/` -> `1`.
    pub fn id(&self) -> Option<&str> {
        let url = self.get("url")?.as_scalar()?;
        url.trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecordPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<Record>,
}

// the search endpoint reports a count too, but it is not used for paging
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<Record>,
}
