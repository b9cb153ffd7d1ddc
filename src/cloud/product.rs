use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "string_or_none")]
    arch: Option<String>,

    #[serde(default, deserialize_with = "string_or_none")]
    release: Option<String>,

    #[serde(default, rename = "version", deserialize_with = "string_or_none")]
    distro_version: Option<String>,

    // Builds stay raw; only the selected one is interpreted.
    #[serde(default, deserialize_with = "object_or_empty")]
    versions: Map<String, Value>,
}

impl Product {
    pub fn arch(&self) -> Option<&str> {
        self.arch.as_deref()
    }

    pub fn release(&self) -> Option<&str> {
        self.release.as_deref()
    }

    pub fn distro_version(&self) -> Option<&str> {
        self.distro_version.as_deref()
    }

    pub fn versions(&self) -> &Map<String, Value> {
        &self.versions
    }

    /// The build with the lexicographically greatest key. Build keys are
    /// fixed-width dates (`20240423`, `20240423.1`), so this is the newest.
    pub fn latest_build(&self) -> Option<(&str, &Value)> {
        self.versions
            .iter()
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(build, value)| (build.as_str(), value))
    }
}

/// Non-string scalars read as absent.
fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_str().map(str::to_owned))
}

/// Anything but an object reads as no builds.
fn object_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Map<String, Value>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}
