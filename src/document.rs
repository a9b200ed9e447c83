use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;
use serde_yaml::value::TaggedValue;

/// A decoded YAML node.
///
/// Mappings are kept as an ordered list of pairs so document order survives
/// decoding and duplicate keys are never merged. Keys are full nodes; the
/// sorter is the one that insists on them being strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Null,
    Scalar(Scalar),
    Sequence(Vec<Document>),
    Mapping(Vec<(Document, Document)>),
    /// A value under a custom tag such as `!Ref`. Opaque to the sorter.
    Tagged(Box<TaggedValue>),
}

/// Primitive leaf values.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`.
    UInt(u64),
    Float(f64),
    String(String),
}

impl Document {
    /// Returns the string content if this node is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Short human-readable name of the node kind, used in diagnostics.
    pub fn kind(&self) -> String {
        match self {
            Document::Null => "null".to_string(),
            Document::Scalar(Scalar::Bool(_)) => "bool".to_string(),
            Document::Scalar(Scalar::Int(_) | Scalar::UInt(_)) => "int".to_string(),
            Document::Scalar(Scalar::Float(_)) => "float".to_string(),
            Document::Scalar(Scalar::String(_)) => "string".to_string(),
            Document::Sequence(_) => "sequence".to_string(),
            Document::Mapping(_) => "mapping".to_string(),
            Document::Tagged(tagged) => format!("tagged value {}", tagged.tag),
        }
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Scalar(Scalar::Bool(b)),
            Value::Number(n) => {
                let scalar = if let Some(i) = n.as_i64() {
                    Scalar::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Scalar::UInt(u)
                } else {
                    // every yaml number is representable as one of the three
                    Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
                };
                Document::Scalar(scalar)
            }
            Value::String(s) => Document::Scalar(Scalar::String(s)),
            Value::Sequence(items) => {
                Document::Sequence(items.into_iter().map(Document::from).collect())
            }
            Value::Mapping(map) => Document::Mapping(
                map.into_iter()
                    .map(|(k, v)| (Document::from(k), Document::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Document::Tagged(tagged),
        }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Going through Value keeps serde_yaml's duplicate key rejection.
        Value::deserialize(deserializer).map(Document::from)
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Document::Null => serializer.serialize_unit(),
            Document::Scalar(scalar) => scalar.serialize(serializer),
            Document::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Document::Mapping(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Document::Tagged(tagged) => tagged.serialize(serializer),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::UInt(u) => serializer.serialize_u64(*u),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}
