//! Seed the offsets topic.

use catalog_sync_core::Cursor;
use catalog_sync_worker::config::PubSubConfig;
use catalog_sync_worker::services::PubSubPublisher;
use tracing::info;

/// Publish `offset` so the worker starts syncing from there.
///
/// # Errors
///
/// Returns an error if the Pub/Sub settings are missing or the publish is
/// rejected.
pub async fn seed(offset: u64) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let publisher = PubSubPublisher::new(&PubSubConfig::from_env()?);
    let message_id = publisher.publish_offset(Cursor::new(offset)).await?;

    info!(
        topic = %publisher.topic_path(),
        offset,
        message_id = %message_id,
        "Offset queued"
    );
    Ok(())
}
