//! Simplestreams catalogue models and the image extraction walk over them.

mod catalog;
mod image;
mod item;
mod product;
mod version;

pub use catalog::{Catalog, DEFAULT_ARCH, ExtractOptions, extract};
pub use image::{Image, ImageCatalog, UNKNOWN};
pub use item::Item;
pub use product::Product;
pub use version::{DISK_IMAGE_ITEM, Version};
