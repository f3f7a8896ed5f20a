use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{CoreError, CoreResult};

/// Key a handler registers under; doubles as the top-level section key in a
/// configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandlerKind(pub String);

impl HandlerKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HandlerKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

/// One export or import payload: a mapping from section key to whatever
/// shape the owning handler chose. No fixed schema beyond "top level is a
/// JSON object".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, JsonValue>);

impl ConfigDocument {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(map: Map<String, JsonValue>) -> Self {
        Self(map)
    }

    /// Wraps a decoded value, rejecting anything but a JSON object.
    pub fn from_value(value: JsonValue) -> CoreResult<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            other => Err(CoreError::Invalid(format!(
                "document must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.0)
    }

    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) {
        self.0.insert(key.into(), value);
    }

    /// Merges a handler's returned section(s) into the document. Handlers
    /// own disjoint key namespaces, so entries are simply added; a colliding
    /// key is overwritten.
    pub fn merge(&mut self, sections: Map<String, JsonValue>) {
        for (key, value) in sections {
            self.0.insert(key, value);
        }
    }

    pub fn to_json_text(&self, pretty: bool) -> CoreResult<String> {
        let result = if pretty {
            serde_json::to_string_pretty(&self.0)
        } else {
            serde_json::to_string(&self.0)
        };
        result.map_err(|e| CoreError::Serde(e.to_string()))
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// A decoded, sanitized import payload parked for the confirmation
/// round-trip. Exactly one slot exists; staging again replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedImport {
    pub id: String,
    pub source_name: String,
    pub document: ConfigDocument,
    pub staged_at: DateTime<Utc>,
}

/// A payment gateway known to the platform catalog. `plugin_id` is the
/// prefix of the option the gateway's settings live under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayInfo {
    pub id: String,
    pub plugin_id: String,
}

/// One settings field on a settings tab: option name plus the default the
/// platform falls back to when the option was never saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDescriptor {
    pub id: String,
    #[serde(default)]
    pub default: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingClass {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneLocation {
    pub code: String,
    /// "country", "state", "continent" or "postcode"
    pub kind: String,
}

/// A shipping method attached to a zone. Instance ids are assigned by the
/// backing store and change on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingMethodInstance {
    pub instance_id: i64,
    pub method_id: String,
    pub enabled: bool,
    pub order: i64,
    #[serde(default)]
    pub settings: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingZone {
    pub id: i64,
    pub name: String,
    pub order: i64,
    #[serde(default)]
    pub locations: Vec<ZoneLocation>,
    #[serde(default)]
    pub methods: Vec<ShippingMethodInstance>,
}

/// One table-rate row, carried opaquely; only the owning method instance id
/// is interpreted (it must be remapped on import).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRateRow {
    pub rate_id: i64,
    pub shipping_method_id: i64,
    pub data: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: i64,
    pub post_type: String,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub parent: i64,
    pub menu_order: i64,
}

/// Insert payload for a post; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub post_type: String,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub parent: i64,
    pub menu_order: i64,
}
