//! CatalogIQ product to Shopify `ProductSetInput` mapping.
//!
//! The catalog describes variation with a flat attribute list on each
//! variant. Shopify wants the axes declared once on the product, with every
//! value listed, and each variant pointing at its values by axis name.
//!
//! Axis order and value order are first-seen order from a scan of the
//! variants, so mapping the same record twice yields identical output.

use serde_json::Value;
use thiserror::Error;

use crate::types::{
    METAFIELD_TYPE, MetafieldInput, OptionValueInput, ProductOptionInput, ProductSetInput,
    SourceAttribute, SourceProduct, SourceVariant, VariantInput, VariantOptionValueInput,
};

/// Vendor written on every product when none is configured.
pub const DEFAULT_VENDOR: &str = "Vendor Name";

/// Errors that can occur while mapping a source record.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A required field is absent or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// The record could not be decoded as a product.
    #[error("malformed product record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Maps source products onto `productSet` input.
#[derive(Debug, Clone)]
pub struct ProductMapper {
    vendor: String,
}

impl Default for ProductMapper {
    fn default() -> Self {
        Self::new(DEFAULT_VENDOR)
    }
}

impl ProductMapper {
    #[must_use]
    pub fn new(vendor: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
        }
    }

    /// Decode a raw page entry into a [`SourceProduct`].
    ///
    /// # Errors
    ///
    /// Returns `MappingError::Malformed` if the value is not a product record.
    pub fn decode(value: Value) -> Result<SourceProduct, MappingError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Map one source product.
    ///
    /// A product with no variants maps to empty option and variant lists.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::MissingField` if `name`, `variants`, or any
    /// variant's `default_code` is absent.
    pub fn map(&self, product: &SourceProduct) -> Result<ProductSetInput, MappingError> {
        let title = product
            .name
            .clone()
            .ok_or_else(|| MappingError::MissingField("name".to_string()))?;
        let variants = product
            .variants
            .as_deref()
            .ok_or_else(|| MappingError::MissingField("variants".to_string()))?;

        let axes = discover_axes(variants);

        let variant_inputs = variants
            .iter()
            .enumerate()
            .map(|(idx, variant)| map_variant(idx, variant, &axes))
            .collect::<Result<Vec<_>, _>>()?;

        let product_options = axes
            .iter()
            .map(|axis| ProductOptionInput {
                name: (*axis).to_string(),
                values: axis_values(variants, axis),
            })
            .collect();

        Ok(ProductSetInput {
            title,
            vendor: self.vendor.clone(),
            description_html: product.description_sale.clone().unwrap_or_default(),
            product_options,
            variants: variant_inputs,
            metafields: product.attributes.iter().map(map_metafield).collect(),
        })
    }
}

/// Map with the default vendor.
///
/// # Errors
///
/// See [`ProductMapper::map`].
pub fn map_product(product: &SourceProduct) -> Result<ProductSetInput, MappingError> {
    ProductMapper::default().map(product)
}

/// Distinct attribute names across all variants, first-seen order.
fn discover_axes(variants: &[SourceVariant]) -> Vec<&str> {
    let mut axes: Vec<&str> = Vec::new();
    for attr in variants.iter().flat_map(|v| &v.attributes) {
        if !axes.contains(&attr.name.as_str()) {
            axes.push(&attr.name);
        }
    }
    axes
}

fn map_variant(
    idx: usize,
    variant: &SourceVariant,
    axes: &[&str],
) -> Result<VariantInput, MappingError> {
    let sku = variant
        .default_code
        .clone()
        .ok_or_else(|| MappingError::MissingField(format!("variants[{idx}].default_code")))?;

    // Sparse: an axis the variant doesn't mention gets no entry.
    let option_values = axes
        .iter()
        .filter_map(|axis| {
            variant.value_for(axis).map(|value| VariantOptionValueInput {
                option_name: (*axis).to_string(),
                name: value.to_string(),
            })
        })
        .collect();

    Ok(VariantInput { sku, option_values })
}

/// Every value assigned to `axis` by any variant, deduplicated.
fn axis_values(variants: &[SourceVariant], axis: &str) -> Vec<OptionValueInput> {
    let mut values: Vec<OptionValueInput> = Vec::new();
    for attr in variants
        .iter()
        .flat_map(|v| &v.attributes)
        .filter(|a| a.name == axis)
    {
        let value = OptionValueInput {
            name: attr.value.clone(),
        };
        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

fn map_metafield(attr: &SourceAttribute) -> MetafieldInput {
    MetafieldInput {
        namespace: attr.category.clone().unwrap_or_default(),
        description: attr.description.clone().unwrap_or_default(),
        key: attr.name.clone(),
        value: attr.value.clone(),
        kind: METAFIELD_TYPE.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    fn product(value: Value) -> SourceProduct {
        ProductMapper::decode(value).expect("decode fixture")
    }

    fn lamp() -> SourceProduct {
        product(json!({
            "name": "Arc Floor Lamp",
            "description_sale": "<p>Brushed steel arc lamp</p>",
            "main_image": "https://cdn.example.com/arc/main.jpg",
            "images": [{"url": "https://cdn.example.com/arc/1.jpg"}],
            "attributes": [
                {"category": "electrical", "name": "voltage", "description": "Input voltage", "value": "120V"},
                {"category": "electrical", "name": "voltage", "description": "Input voltage", "value": "120V"}
            ],
            "variants": [
                {"default_code": "ARC-BR-S", "attributes": [
                    {"name": "Finish", "value": "Brass"},
                    {"name": "Size", "value": "Small"}
                ]},
                {"default_code": "ARC-NI-S", "attributes": [
                    {"name": "Finish", "value": "Nickel"},
                    {"name": "Size", "value": "Small"}
                ]},
                {"default_code": "ARC-BR", "attributes": [
                    {"name": "Finish", "value": "Brass"}
                ]},
                {"default_code": "ARC-SHADE", "attributes": [
                    {"name": "Shade", "value": "Linen"}
                ]}
            ]
        }))
    }

    #[test]
    fn test_two_sizes_one_axis() {
        let p = product(json!({
            "name": "Tee",
            "attributes": [],
            "variants": [
                {"default_code": "TEE-S", "attributes": [{"name": "Size", "value": "S"}]},
                {"default_code": "TEE-M", "attributes": [{"name": "Size", "value": "M"}]}
            ]
        }));

        let mapped = map_product(&p).unwrap();

        assert_eq!(mapped.product_options.len(), 1);
        assert_eq!(mapped.product_options[0].name, "Size");
        assert_eq!(
            mapped.product_options[0].value_names().collect::<Vec<_>>(),
            vec!["S", "M"]
        );
        assert_eq!(mapped.variants.len(), 2);
        assert!(mapped.variants.iter().all(|v| v.option_values.len() == 1));
    }

    #[test]
    fn test_axes_are_distinct_attribute_names_in_first_seen_order() {
        let mapped = map_product(&lamp()).unwrap();
        let names: Vec<_> = mapped.product_options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Finish", "Size", "Shade"]);
    }

    #[test]
    fn test_axis_values_deduplicated() {
        let mapped = map_product(&lamp()).unwrap();
        let finish = &mapped.product_options[0];
        assert_eq!(finish.value_names().collect::<Vec<_>>(), vec!["Brass", "Nickel"]);

        let size = &mapped.product_options[1];
        assert_eq!(size.value_names().collect::<Vec<_>>(), vec!["Small"]);
    }

    #[test]
    fn test_axis_values_drawn_from_variants() {
        let source = lamp();
        let mapped = map_product(&source).unwrap();
        let variants = source.variants.as_ref().unwrap();

        for option in &mapped.product_options {
            let unique: HashSet<_> = option.value_names().collect();
            assert_eq!(unique.len(), option.values.len());
            for value in option.value_names() {
                assert!(variants.iter().any(|v| v.value_for(&option.name) == Some(value)));
            }
        }
    }

    #[test]
    fn test_option_values_are_sparse() {
        let mapped = map_product(&lamp()).unwrap();

        let brass_only = mapped.variants.iter().find(|v| v.sku == "ARC-BR").unwrap();
        assert_eq!(brass_only.option_values.len(), 1);
        assert_eq!(brass_only.option_values[0].option_name, "Finish");

        let shade = mapped.variants.iter().find(|v| v.sku == "ARC-SHADE").unwrap();
        assert_eq!(shade.option_values.len(), 1);
        assert_eq!(shade.option_values[0].option_name, "Shade");
        assert_eq!(shade.option_values[0].name, "Linen");
    }

    #[test]
    fn test_duplicate_variant_attribute_uses_first_value() {
        let p = product(json!({
            "name": "Sconce",
            "variants": [
                {"default_code": "SC-1", "attributes": [
                    {"name": "Finish", "value": "Black"},
                    {"name": "Finish", "value": "White"}
                ]}
            ]
        }));

        let mapped = map_product(&p).unwrap();
        assert_eq!(mapped.variants[0].option_values.len(), 1);
        assert_eq!(mapped.variants[0].option_values[0].name, "Black");
    }

    #[test]
    fn test_metafields_project_attributes_without_dedup() {
        let mapped = map_product(&lamp()).unwrap();
        assert_eq!(mapped.metafields.len(), 2);
        let field = &mapped.metafields[0];
        assert_eq!(field.namespace, "electrical");
        assert_eq!(field.key, "voltage");
        assert_eq!(field.value, "120V");
        assert_eq!(field.description, "Input voltage");
        assert_eq!(field.kind, "string");
    }

    #[test]
    fn test_no_attributes_gives_empty_metafields() {
        let p = product(json!({"name": "Plain", "variants": []}));
        let json = serde_json::to_value(map_product(&p).unwrap()).unwrap();
        assert_eq!(json["metafields"], json!([]));
    }

    #[test]
    fn test_missing_description_is_empty_html() {
        for description in [json!(null), json!(false), json!("")] {
            let p = product(json!({
                "name": "Plain",
                "description_sale": description,
                "variants": []
            }));
            assert_eq!(map_product(&p).unwrap().description_html, "");
        }
    }

    #[test]
    fn test_description_copied() {
        let mapped = map_product(&lamp()).unwrap();
        assert_eq!(mapped.description_html, "<p>Brushed steel arc lamp</p>");
    }

    #[test]
    fn test_zero_variants_is_not_an_error() {
        let p = product(json!({"name": "Gift card", "variants": []}));
        let mapped = map_product(&p).unwrap();
        assert!(mapped.product_options.is_empty());
        assert!(mapped.variants.is_empty());
    }

    #[test]
    fn test_missing_name() {
        let p = product(json!({"variants": []}));
        let err = map_product(&p).unwrap_err();
        assert!(matches!(err, MappingError::MissingField(ref f) if f == "name"));
    }

    #[test]
    fn test_missing_variants() {
        let p = product(json!({"name": "Orphan"}));
        let err = map_product(&p).unwrap_err();
        assert!(matches!(err, MappingError::MissingField(ref f) if f == "variants"));
    }

    #[test]
    fn test_missing_sku() {
        let p = product(json!({
            "name": "Lamp",
            "variants": [{"default_code": "L-1"}, {"default_code": false}]
        }));
        let err = map_product(&p).unwrap_err();
        assert_eq!(err.to_string(), "missing required field: variants[1].default_code");
    }

    #[test]
    fn test_malformed_record() {
        let err = ProductMapper::decode(json!({"name": "X", "variants": "nope"})).unwrap_err();
        assert!(matches!(err, MappingError::Malformed(_)));
    }

    #[test]
    fn test_configured_vendor() {
        let mapper = ProductMapper::new("Acme Lighting");
        let p = product(json!({"name": "Lamp", "variants": []}));
        assert_eq!(mapper.map(&p).unwrap().vendor, "Acme Lighting");
        assert_eq!(map_product(&p).unwrap().vendor, DEFAULT_VENDOR);
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let source = lamp();
        assert_eq!(map_product(&source).unwrap(), map_product(&source).unwrap());
    }

    #[test]
    fn test_truncate_then_map_drops_unused_values() {
        let mut source = lamp();
        source.truncate_variants(1);
        let mapped = map_product(&source).unwrap();

        let names: Vec<_> = mapped.product_options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Finish", "Size"]);
        assert_eq!(
            mapped.product_options[0].value_names().collect::<Vec<_>>(),
            vec!["Brass"]
        );
    }
}
