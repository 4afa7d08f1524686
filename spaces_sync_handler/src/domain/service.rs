use lambda_runtime::tracing;
use s3_client::SpacesEndpoint;

use crate::domain::{
    key::{decode_object_key, get_filename, record_id_from_filename},
    models::{OrphanPolicy, TransferErr, TransferEvent, TransferSummary},
    ports::{DestinationStorage, RecordRepo, SourceStorage, SyncService},
};


/// Static settings for the pipeline, read once at start up
#[derive(Debug, Clone)]
pub struct TransferSettings {
    /// the bucket every object is copied into
    pub destination_bucket: String,
    /// the endpoint the destination bucket lives on, used to build the public url
    pub endpoint: SpacesEndpoint,
    pub orphan_policy: OrphanPolicy,
}

/// Copies the created object to the destination and records its public url.
/// The storage and database interfaces are abstracted for mocking.
pub struct TransferService<S, D, R> {
    source: S,
    destination: D,
    records: R,
    settings: TransferSettings,
}

impl<S, D, R> TransferService<S, D, R>
where
    S: SourceStorage,
    D: DestinationStorage,
    R: RecordRepo,
{
    pub fn new(source: S, destination: D, records: R, settings: TransferSettings) -> Self {
        TransferService {
            source,
            destination,
            records,
            settings,
        }
    }

    /// Removes the destination copy when the policy asks for it.
    /// A failed delete is only logged so the update error is what the caller sees.
    #[tracing::instrument(skip(self))]
    async fn handle_orphan(&self, key: &str) {
        match self.settings.orphan_policy {
            OrphanPolicy::Keep => {
                tracing::warn!("keeping object in destination after failed update");
            }
            OrphanPolicy::Delete => {
                let bucket = self.settings.destination_bucket.as_str();
                match self.destination.delete_object(bucket, key).await {
                    Ok(()) => tracing::info!("deleted object from destination after failed update"),
                    Err(e) => tracing::error!(error=?e, "unable to delete orphaned object"),
                }
            }
        }
    }
}

/// The destination must never be the bucket that triggered us
pub fn ensure_different_buckets(source: &str, destination: &str) -> Result<(), TransferErr> {
    if source == destination {
        return Err(TransferErr::SameBucket {
            bucket: source.to_string(),
        });
    }
    Ok(())
}

impl<S, D, R> SyncService for TransferService<S, D, R>
where
    S: SourceStorage,
    D: DestinationStorage,
    R: RecordRepo,
{
    #[tracing::instrument(skip(self), fields(destination = %self.settings.destination_bucket))]
    async fn sync(&self, event: TransferEvent) -> Result<TransferSummary, TransferErr> {
        let key = decode_object_key(&event.encoded_key)?;
        let destination_bucket = self.settings.destination_bucket.as_str();

        ensure_different_buckets(&event.bucket, destination_bucket)?;

        let content = self
            .source
            .get_object(&event.bucket, &key)
            .await
            .map_err(|cause| TransferErr::ReadObject { cause })?;
        tracing::trace!(content_len = content.len(), "read source object");

        self.destination
            .put_public_object(destination_bucket, &key, &content)
            .await
            .map_err(|cause| TransferErr::UploadObject { cause })?;
        drop(content);
        tracing::trace!("uploaded object to destination");

        let url = self.settings.endpoint.public_url(destination_bucket, &key);
        let record_id = record_id_from_filename(get_filename(&key));

        let rows_affected = match self.records.set_record_url(&record_id, &url).await {
            Ok(rows_affected) => rows_affected,
            Err(cause) => {
                self.handle_orphan(&key).await;
                return Err(TransferErr::UpdateRecord { cause });
            }
        };

        if rows_affected == 0 {
            tracing::warn!(record_id=%record_id, "update matched no rows");
        }

        tracing::info!(record_id=%record_id, url=%url, rows_affected, "transfer complete");

        Ok(TransferSummary {
            record_id,
            url,
            bucket: destination_bucket.to_string(),
            key,
            rows_affected,
        })
    }
}
