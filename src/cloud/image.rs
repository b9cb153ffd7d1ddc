use indexmap::IndexMap;
use serde::Serialize;

/// Placeholder written for descriptive fields the catalogue leaves out.
pub const UNKNOWN: &str = "unknown";

/// Normalised record for the newest disk image of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    release: String,
    version: String,
    build_date: String,
    image_url: String,
    sha256: String,
}

impl Image {
    pub fn new(
        release: impl Into<String>,
        version: impl Into<String>,
        build_date: impl Into<String>,
        image_url: impl Into<String>,
        sha256: impl Into<String>,
    ) -> Self {
        Self {
            release: release.into(),
            version: version.into(),
            build_date: build_date.into(),
            image_url: image_url.into(),
            sha256: sha256.into(),
        }
    }

    /// Build a record from catalogue fields. Missing release/version become
    /// [`UNKNOWN`]; the image URL is `base_url` followed verbatim by
    /// `relative_path`.
    pub fn from_metadata(
        release: Option<&str>,
        distro_version: Option<&str>,
        build_date: &str,
        base_url: Option<&str>,
        relative_path: &str,
        sha256: &str,
    ) -> Self {
        // Paths may start with '/', where Url::join would drop the base path.
        let image_url = format!("{}{}", base_url.unwrap_or_default(), relative_path);

        Image::new(
            release.unwrap_or(UNKNOWN),
            distro_version.unwrap_or(UNKNOWN),
            build_date,
            image_url,
            sha256,
        )
    }

    /// Release codename, eg. noble
    pub fn release(&self) -> &str {
        &self.release
    }

    /// Version of the distro
    /// eg. 24.04
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Build serial of the image
    /// eg. 20251001
    pub fn build_date(&self) -> &str {
        &self.build_date
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn sha256(&self) -> &str {
        &self.sha256
    }
}

/// Extracted images keyed by product id, in catalogue order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageCatalog {
    entries: IndexMap<String, Image>,
}

impl ImageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `product_id`, keeping first-seen order.
    pub fn insert(&mut self, product_id: impl Into<String>, image: Image) {
        self.entries.insert(product_id.into(), image);
    }

    pub fn get(&self, product_id: &str) -> Option<&Image> {
        self.entries.get(product_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Image)> {
        self.entries.iter().map(|(id, image)| (id.as_str(), image))
    }
}
