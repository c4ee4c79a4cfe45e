//! Dry-run the field mapper on a local record.

use std::path::Path;

use catalog_sync_core::ProductMapper;
use tracing::{info, warn};

/// Map the catalog record in `file_path` and print the `productSet` input.
///
/// Nothing is sent anywhere.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the record does not map.
pub async fn print_input(
    file_path: &str,
    vendor: &str,
    max_variants: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let record: serde_json::Value = serde_json::from_str(&content)?;

    let mut product = ProductMapper::decode(record)?;
    let dropped = product.truncate_variants(max_variants);
    if dropped > 0 {
        warn!(dropped, kept = max_variants, "Truncated variants");
    }

    let input = ProductMapper::new(vendor).map(&product)?;
    info!(
        title = %input.title,
        options = input.product_options.len(),
        variants = input.variants.len(),
        "Mapped record"
    );

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&input)?);
    }
    Ok(())
}
