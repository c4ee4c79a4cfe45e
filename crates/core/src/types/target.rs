//! Shopify `ProductSetInput` payload.
//!
//! Field names serialize in the camelCase form the Admin GraphQL API
//! expects, so the mapped value can be sent as the `input` variable as-is.
//!
//! See <https://shopify.dev/docs/api/admin-graphql/2024-04/input-objects/ProductSetInput>.

use serde::{Deserialize, Serialize};

/// Metafield type used for every projected catalog attribute.
pub const METAFIELD_TYPE: &str = "string";

/// Input for the `productSet` mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSetInput {
    pub title: String,
    pub vendor: String,
    pub description_html: String,
    pub product_options: Vec<ProductOptionInput>,
    pub variants: Vec<VariantInput>,
    pub metafields: Vec<MetafieldInput>,
}

/// An option axis and every value used on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOptionInput {
    pub name: String,
    pub values: Vec<OptionValueInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionValueInput {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    pub sku: String,
    pub option_values: Vec<VariantOptionValueInput>,
}

/// Position of a variant along one axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOptionValueInput {
    pub option_name: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafieldInput {
    pub namespace: String,
    pub description: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ProductOptionInput {
    /// Names of the values on this axis, in order.
    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_admin_api_field_names() {
        let input = ProductSetInput {
            title: "Pendant".to_string(),
            vendor: "Vendor Name".to_string(),
            description_html: String::new(),
            product_options: vec![ProductOptionInput {
                name: "Size".to_string(),
                values: vec![OptionValueInput {
                    name: "S".to_string(),
                }],
            }],
            variants: vec![VariantInput {
                sku: "P-S".to_string(),
                option_values: vec![VariantOptionValueInput {
                    option_name: "Size".to_string(),
                    name: "S".to_string(),
                }],
            }],
            metafields: vec![MetafieldInput {
                namespace: "specs".to_string(),
                description: String::new(),
                key: "voltage".to_string(),
                value: "120".to_string(),
                kind: METAFIELD_TYPE.to_string(),
            }],
        };

        let json = serde_json::to_value(&input).expect("serialize");
        assert_eq!(json["descriptionHtml"], "");
        assert_eq!(json["productOptions"][0]["values"][0]["name"], "S");
        assert_eq!(json["variants"][0]["optionValues"][0]["optionName"], "Size");
        assert_eq!(json["metafields"][0]["type"], "string");
    }
}
