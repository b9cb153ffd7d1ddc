use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::{Image, ImageCatalog, Product, UNKNOWN, Version};

/// Architecture kept when no other is configured.
pub const DEFAULT_ARCH: &str = "amd64";

/// What to keep from the catalogue and how to absolutise image paths.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    arch: String,
    base_url: Option<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new(DEFAULT_ARCH)
    }
}

impl ExtractOptions {
    pub fn new(arch: impl Into<String>) -> Self {
        Self {
            arch: arch.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

/// Read-only view over a fetched Simplestreams document.
#[derive(Debug, Clone, Copy)]
pub struct Catalog<'a> {
    document: &'a Value,
}

impl<'a> Catalog<'a> {
    pub fn new(document: &'a Value) -> Self {
        Self { document }
    }

    /// Raw product entries in document order. A document without a
    /// `products` object has none.
    pub fn products(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.document
            .get("products")
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
            .map(|(id, details)| (id.as_str(), details))
    }

    /// Keep the newest disk image of every product built for the configured
    /// architecture. Unusable entries are logged and skipped.
    pub fn extract(&self, options: &ExtractOptions) -> ImageCatalog {
        let mut images = ImageCatalog::new();

        for (product_id, details) in self.products() {
            if let Some(image) = extract_product(product_id, details, options) {
                images.insert(product_id, image);
            }
        }

        info!("✅ Extracted {} images", images.len());
        images
    }
}

/// Extract with the default architecture, prefixing image paths with
/// `base_url` when given.
pub fn extract(document: &Value, base_url: Option<&str>) -> ImageCatalog {
    let options = match base_url {
        Some(base_url) => ExtractOptions::default().with_base_url(base_url),
        None => ExtractOptions::default(),
    };
    Catalog::new(document).extract(&options)
}

fn extract_product(product_id: &str, details: &Value, options: &ExtractOptions) -> Option<Image> {
    let product = match Product::deserialize(details) {
        Ok(product) => product,
        Err(err) => {
            info!("⚠️ Skipping {product_id}: unreadable product record ({err})");
            return None;
        }
    };

    match product.arch() {
        Some(arch) if arch == options.arch() => {}
        Some(arch) => {
            debug!("skipping {product_id}: arch {arch}");
            return None;
        }
        None => {
            debug!("skipping {product_id}: no arch field");
            return None;
        }
    }

    let Some((build_date, build_value)) = product.latest_build() else {
        info!("⚠️ Skipping {product_id}: No available builds");
        return None;
    };

    let disk = match Version::deserialize(build_value).map(|build| build.disk_image()) {
        Ok(Some(Ok(disk))) => disk,
        Ok(None) => {
            info!("⚠️ Skipping {product_id}: No disk1.img found");
            return None;
        }
        Ok(Some(Err(err))) | Err(err) => {
            info!("⚠️ Skipping {product_id}: unreadable build {build_date} ({err})");
            return None;
        }
    };

    let Some(sha256) = disk.sha256() else {
        info!("⚠️ Skipping {product_id}: disk1.img in {build_date} has no sha256");
        return None;
    };

    let image = Image::from_metadata(
        product.release(),
        product.distro_version(),
        build_date,
        options.base_url(),
        disk.path().unwrap_or_default(),
        sha256,
    );

    info!(
        "✅ Found {product_id} {} {} {build_date} {}",
        image.release(),
        image.version(),
        image.image_url()
    );
    debug!(
        ftype = disk.ftype().unwrap_or(UNKNOWN),
        builds = product.versions().len(),
        "selected {product_id} build {build_date}"
    );

    Some(image)
}
