//! GraphQL operation definitions for the Shopify Admin API.
//!
//! Each operation is a unit struct implementing `graphql_client::GraphQLQuery`
//! with a sibling module holding its `Variables` and `ResponseData`, the same
//! layout `#[derive(GraphQLQuery)]` generates.
//!
//! Docs: <https://shopify.dev/docs/api/admin-graphql/2024-04>

use graphql_client::{GraphQLQuery, QueryBody};

// =============================================================================
// productSet (asynchronous)
// =============================================================================

pub struct ProductSet;

pub mod product_set {
    use catalog_sync_core::{OperationGid, ProductSetInput};
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "ProductSet";
    pub const QUERY: &str = r"
mutation ProductSet($input: ProductSetInput!) {
  productSet(input: $input, synchronous: false) {
    product {
      id
    }
    productSetOperation {
      id
      status
      userErrors {
        code
        field
        message
      }
    }
    userErrors {
      field
      message
    }
  }
}
";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub input: ProductSetInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_set: Option<ProductSetPayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductSetPayload {
        pub product_set_operation: Option<ProductSetOperation>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductSetOperation {
        pub id: OperationGid,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct UserError {
        pub field: Option<Vec<String>>,
        pub message: String,
    }
}

impl GraphQLQuery for ProductSet {
    type Variables = product_set::Variables;
    type ResponseData = product_set::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: product_set::QUERY,
            operation_name: product_set::OPERATION_NAME,
        }
    }
}

// =============================================================================
// productOperation
// =============================================================================

pub struct ProductOperation;

pub mod product_operation {
    use catalog_sync_core::{OperationGid, OperationStatus, OperationUserError, ProductGid};
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "ProductOperation";
    pub const QUERY: &str = r"
query ProductOperation($id: ID!) {
  productOperation(id: $id) {
    ... on ProductSetOperation {
      id
      status
      product {
        id
      }
      userErrors {
        code
        field
        message
      }
    }
  }
}
";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: OperationGid,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_operation: Option<ProductSetOperation>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductSetOperation {
        pub status: OperationStatus,
        pub product: Option<Product>,
        #[serde(default)]
        pub user_errors: Vec<OperationUserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Product {
        pub id: ProductGid,
    }
}

impl GraphQLQuery for ProductOperation {
    type Variables = product_operation::Variables;
    type ResponseData = product_operation::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: product_operation::QUERY,
            operation_name: product_operation::OPERATION_NAME,
        }
    }
}

// =============================================================================
// productCreateMedia
// =============================================================================

pub struct ProductCreateMedia;

pub mod product_create_media {
    use catalog_sync_core::ProductGid;
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "ProductCreateMedia";
    pub const QUERY: &str = r"
mutation ProductCreateMedia($media: [CreateMediaInput!]!, $productId: ID!) {
  productCreateMedia(media: $media, productId: $productId) {
    media {
      alt
      mediaContentType
      status
    }
    mediaUserErrors {
      field
      message
    }
  }
}
";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub media: Vec<CreateMediaInput>,
        pub product_id: ProductGid,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateMediaInput {
        pub alt: String,
        pub media_content_type: MediaContentType,
        pub original_source: String,
    }

    #[derive(Debug, Clone, Copy, Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum MediaContentType {
        Image,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_create_media: Option<ProductCreateMediaPayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreateMediaPayload {
        #[serde(default)]
        pub media_user_errors: Vec<MediaUserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MediaUserError {
        pub field: Option<Vec<String>>,
        pub message: String,
    }
}

impl GraphQLQuery for ProductCreateMedia {
    type Variables = product_create_media::Variables;
    type ResponseData = product_create_media::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: product_create_media::QUERY,
            operation_name: product_create_media::OPERATION_NAME,
        }
    }
}
