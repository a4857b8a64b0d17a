//! Domain entities mirrored from persistent storage.
//!
//! Records derive `Deserialize` as well as `Serialize` because cached reads
//! round-trip them through JSON payloads.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Category fields inlined into product and template reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
}

/// One stored product image: the public URL plus the object-store handle
/// needed to destroy it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    pub asset_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: Uuid,
    pub name: String,
    pub category: CategorySummary,
    pub price: f64,
    pub description: String,
    pub material: String,
    pub color: String,
    pub images: Vec<ProductImage>,
    pub main_image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Admin preset for creating products quickly. `product_name` duplicates
/// `display_name`; older clients still read the duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub product_name: String,
    pub category: CategorySummary,
    pub price: f64,
    pub description: String,
    pub material: String,
    pub color: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Pick the main image URL for a product.
///
/// The requested index points into `images`; anything out of range falls back
/// to the first image, and an empty list yields no main image at all.
pub fn main_image_for(images: &[ProductImage], requested: Option<usize>) -> Option<String> {
    let index = match requested {
        Some(index) if index < images.len() => index,
        _ => 0,
    };
    images.get(index).map(|image| image.url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(url: &str) -> ProductImage {
        ProductImage {
            url: url.to_string(),
            asset_id: format!("asset-{url}"),
        }
    }

    #[test]
    fn main_image_honors_requested_index() {
        let images = vec![image("a"), image("b"), image("c")];
        assert_eq!(main_image_for(&images, Some(1)), Some("b".to_string()));
    }

    #[test]
    fn main_image_out_of_range_falls_back_to_first() {
        let images = vec![image("a"), image("b"), image("c")];
        assert_eq!(main_image_for(&images, Some(9)), Some("a".to_string()));
    }

    #[test]
    fn main_image_defaults_to_first_when_unspecified() {
        let images = vec![image("a"), image("b")];
        assert_eq!(main_image_for(&images, None), Some("a".to_string()));
    }

    #[test]
    fn main_image_absent_without_images() {
        assert_eq!(main_image_for(&[], Some(0)), None);
        assert_eq!(main_image_for(&[], None), None);
    }
}
