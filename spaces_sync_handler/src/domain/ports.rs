use crate::domain::models::{RecordId, TransferErr, TransferEvent, TransferSummary};

/// Where the created object is read from
#[cfg_attr(test, mockall::automock)]
pub trait SourceStorage: Send + Sync + 'static {
    fn get_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<u8>>> + Send;
}

/// Where the copy is written to
#[cfg_attr(test, mockall::automock)]
pub trait DestinationStorage: Send + Sync + 'static {
    /// Writes the object so that anyone with the url can read it
    fn put_public_object(
        &self,
        bucket: &str,
        key: &str,
        content: &[u8],
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn delete_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// The table holding the row that points at the copy
#[cfg_attr(test, mockall::automock)]
pub trait RecordRepo: Send + Sync + 'static {
    /// Sets the url column of the row matching `record_id`, returning the number of rows affected
    fn set_record_url(
        &self,
        record_id: &RecordId,
        url: &str,
    ) -> impl Future<Output = anyhow::Result<u64>> + Send;
}

/// The whole pipeline for a single object created event
#[cfg_attr(test, mockall::automock)]
pub trait SyncService: Send + Sync + 'static {
    fn sync(
        &self,
        event: TransferEvent,
    ) -> impl Future<Output = Result<TransferSummary, TransferErr>> + Send;
}
