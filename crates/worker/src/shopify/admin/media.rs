//! Media attachment for created products.

use catalog_sync_core::ProductGid;
use tracing::instrument;

use super::{
    AdminClient, ShopifyError, join_user_errors,
    queries::{ProductCreateMedia, product_create_media},
};

/// Alt text for the designated main image.
pub const MAIN_IMAGE_ALT: &str = "Main Image";

/// Alt text for every additional image.
pub const IMAGE_ALT: &str = "Image";

impl AdminClient {
    /// Attach one image to a product by URL.
    ///
    /// Shopify fetches the image asynchronously; success here means the
    /// media record was accepted, not that processing finished.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserError` for `mediaUserErrors`, or any
    /// transport/GraphQL error.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn create_image_media(
        &self,
        product_id: &ProductGid,
        url: &str,
        alt: &str,
    ) -> Result<(), ShopifyError> {
        use product_create_media::{CreateMediaInput, MediaContentType, Variables};

        let variables = Variables {
            media: vec![CreateMediaInput {
                alt: alt.to_string(),
                media_content_type: MediaContentType::Image,
                original_source: url.to_string(),
            }],
            product_id: product_id.clone(),
        };

        let response = self.execute::<ProductCreateMedia>(variables).await?;

        let payload = response
            .product_create_media
            .ok_or(ShopifyError::MissingPayload("productCreateMedia"))?;

        if !payload.media_user_errors.is_empty() {
            return Err(ShopifyError::UserError(join_user_errors(
                payload
                    .media_user_errors
                    .iter()
                    .map(|e| (e.field.as_ref(), e.message.as_str())),
            )));
        }

        Ok(())
    }
}
