use serde::Deserialize;
use serde_json::{Map, Value};

/// Item key of the raw disk image inside a build.
pub const DISK_IMAGE_ITEM: &str = "disk1.img";

/// One dated build of a product. Items stay raw until one is asked for.
#[derive(Debug, Deserialize)]
pub struct Version {
    #[serde(default)]
    items: Map<String, Value>,
}

impl Version {
    /// The `disk1.img` item, if present. Only this item is deserialized.
    pub fn disk_image(&self) -> Option<Result<super::Item, serde_json::Error>> {
        self.items
            .get(DISK_IMAGE_ITEM)
            .map(|value| super::Item::deserialize(value))
    }
}
