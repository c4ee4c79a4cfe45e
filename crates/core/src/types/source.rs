//! CatalogIQ product records as served by `GET /products`.
//!
//! The catalog is backed by an Odoo-style store, so an empty text field can
//! arrive as `false`, `null` or `""`. Optional text fields collapse all
//! three to `None`. Attribute values may be strings, numbers or booleans
//! and are kept as their string form.
//!
//! `name` and `variants` are optional at this layer so that a record with
//! missing fields still decodes and can be rejected by the mapper with a
//! precise [`MappingError`](crate::MappingError).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A product record from the source catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceProduct {
    #[serde(default, deserialize_with = "optional_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub description_sale: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub main_image: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<SourceImage>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes: Vec<SourceAttribute>,
    #[serde(default)]
    pub variants: Option<Vec<SourceVariant>>,
}

impl SourceProduct {
    /// Keep only the first `limit` variants.
    ///
    /// Shopify caps the number of variants per product. Truncating before
    /// mapping keeps the option value lists in step with the variants that
    /// are actually submitted.
    ///
    /// Returns the number of variants dropped.
    pub fn truncate_variants(&mut self, limit: usize) -> usize {
        match self.variants.as_mut() {
            Some(variants) if variants.len() > limit => {
                let dropped = variants.len() - limit;
                variants.truncate(limit);
                dropped
            }
            _ => 0,
        }
    }

    /// Number of variants on the record (zero if the field is absent).
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.as_ref().map_or(0, Vec::len)
    }
}

/// An additional product image. Entries without a URL are kept so the
/// rest of the record still decodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImage {
    #[serde(default, deserialize_with = "optional_text")]
    pub url: Option<String>,
}

/// Free-form product level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAttribute {
    #[serde(default, deserialize_with = "optional_text")]
    pub category: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub name: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub value: String,
}

/// A purchasable variant of a source product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceVariant {
    #[serde(default, deserialize_with = "optional_text")]
    pub default_code: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes: Vec<SourceVariantAttribute>,
}

impl SourceVariant {
    /// Value of the first attribute named `axis`, if the variant has one.
    #[must_use]
    pub fn value_for(&self, axis: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == axis)
            .map(|a| a.value.as_str())
    }
}

/// Position of a variant along one option axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceVariantAttribute {
    #[serde(deserialize_with = "scalar_text")]
    pub name: String,
    #[serde(deserialize_with = "scalar_text")]
    pub value: String,
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Null | Value::Bool(false) | Value::String(_)) | None => None,
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected text, got {other}"
            )));
        }
    })
}

fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar value, got {other}"
        ))),
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
