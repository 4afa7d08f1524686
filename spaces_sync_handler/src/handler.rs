use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{
    Error, LambdaEvent,
    tracing::{self, Instrument},
};

use crate::domain::{
    models::{TransferEvent, UpdateResult},
    ports::SyncService,
};

/// Processes the s3 object created event
///
/// Every failure is reported through the returned [UpdateResult], the lambda itself only
/// errors if the runtime does.
#[tracing::instrument(skip_all, fields(request_id = %event.context.request_id))]
pub async fn handler<T: SyncService>(
    service: &T,
    event: LambdaEvent<S3Event>,
) -> Result<UpdateResult, Error> {
    tracing::info!(
        "processing s3 records record_count={}",
        event.payload.records.len()
    );

    let transfer_event = match TransferEvent::from_s3_event(event.payload) {
        Ok(transfer_event) => transfer_event,
        Err(err) => {
            tracing::error!(error=?err, "invalid s3 event");
            return Ok(err.into());
        }
    };

    let span = tracing::span!(
        tracing::Level::INFO,
        "process_record",
        bucket = %transfer_event.bucket,
        key = %transfer_event.encoded_key
    );

    match service.sync(transfer_event).instrument(span).await {
        Ok(summary) => Ok(UpdateResult::success(summary)),
        Err(err) => {
            tracing::error!(error=?err, stage=%err.stage(), detail=?err.detail(), "transfer failed");
            Ok(err.into())
        }
    }
}
