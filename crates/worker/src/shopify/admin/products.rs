//! Product creation through the asynchronous `productSet` mutation.

use catalog_sync_core::{OperationGid, PolledOperation, ProductSetInput};
use tracing::instrument;

use super::{
    AdminClient, ShopifyError, join_user_errors,
    queries::{ProductOperation, ProductSet, product_operation, product_set},
};

impl AdminClient {
    /// Submit a product for asynchronous creation.
    ///
    /// Returns the handle of the deferred `ProductSetOperation`; the outcome
    /// is read later with [`Self::product_operation`].
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserError` if Shopify rejects the input outright,
    /// `ShopifyError::MissingPayload` if no operation handle comes back, or
    /// any transport/GraphQL error.
    #[instrument(skip(self, input), fields(title = %input.title, variants = input.variants.len()))]
    pub async fn product_set(&self, input: &ProductSetInput) -> Result<OperationGid, ShopifyError> {
        let variables = product_set::Variables {
            input: input.clone(),
        };

        let response = self.execute::<ProductSet>(variables).await?;

        let payload = response
            .product_set
            .ok_or(ShopifyError::MissingPayload("productSet"))?;

        if !payload.user_errors.is_empty() {
            return Err(ShopifyError::UserError(join_user_errors(
                payload
                    .user_errors
                    .iter()
                    .map(|e| (e.field.as_ref(), e.message.as_str())),
            )));
        }

        payload
            .product_set_operation
            .map(|op| op.id)
            .ok_or(ShopifyError::MissingPayload("productSetOperation"))
    }

    /// Read the current state of a product set operation.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::MissingPayload` if the ID does not resolve to a
    /// `ProductSetOperation`, or any transport/GraphQL error.
    #[instrument(skip(self), fields(operation_id = %id))]
    pub async fn product_operation(
        &self,
        id: &OperationGid,
    ) -> Result<PolledOperation, ShopifyError> {
        let variables = product_operation::Variables { id: id.clone() };

        let response = self.execute::<ProductOperation>(variables).await?;

        let operation = response
            .product_operation
            .ok_or(ShopifyError::MissingPayload("productOperation"))?;

        Ok(PolledOperation {
            status: operation.status,
            product_id: operation.product.map(|p| p.id),
            user_errors: operation.user_errors,
        })
    }
}
