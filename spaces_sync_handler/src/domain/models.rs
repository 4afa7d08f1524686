use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::tracing;
use serde::Serialize;
use thiserror::Error;

/// The object that triggered the lambda, exactly as s3 reported it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    /// Bucket the object was created in
    pub bucket: String,
    /// Object key, still url encoded with `+` standing in for spaces
    pub encoded_key: String,
}

impl TransferEvent {
    /// Only the first record is transferred, s3 sends a single record per object created
    pub fn from_s3_event(event: S3Event) -> Result<Self, TransferErr> {
        let record_count = event.records.len();
        if record_count > 1 {
            tracing::warn!(record_count, "received more than one record, only the first is processed");
        }

        let record = event
            .records
            .into_iter()
            .next()
            .ok_or(TransferErr::InvalidEvent {
                reason: "event contained no records",
            })?;

        let bucket = record
            .s3
            .bucket
            .name
            .filter(|name| !name.is_empty())
            .ok_or(TransferErr::InvalidEvent {
                reason: "record is missing the bucket name",
            })?;

        let encoded_key = record
            .s3
            .object
            .key
            .filter(|key| !key.is_empty())
            .ok_or(TransferErr::InvalidEvent {
                reason: "record is missing the object key",
            })?;

        Ok(Self {
            bucket,
            encoded_key,
        })
    }
}

/// Primary key value of the row that receives the url
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What to do with the copy in the destination bucket when the row could not be updated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OrphanPolicy {
    /// Leave the object in place
    #[default]
    Keep,
    /// Delete the object so no unreferenced copy is left behind
    Delete,
}

/// The stages an invocation moves through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TransferStage {
    Event,
    Decode,
    Guard,
    Fetch,
    Upload,
    Update,
}

/// The first failure of an invocation
///
/// Every variant renders to the fixed message that is returned to the caller, the
/// underlying cause (if any) is reported separately through [TransferErr::detail].
#[derive(Debug, Error)]
pub enum TransferErr {
    #[error("Invalid s3 event.")]
    InvalidEvent { reason: &'static str },
    #[error("Failed decode object key.")]
    DecodeKey { cause: anyhow::Error },
    #[error("Source and destination buckets are the same.")]
    SameBucket { bucket: String },
    #[error("Failed read s3 object.")]
    ReadObject { cause: anyhow::Error },
    #[error("Failed upload to space.")]
    UploadObject { cause: anyhow::Error },
    #[error("Failed update table.")]
    UpdateRecord { cause: anyhow::Error },
}

impl TransferErr {
    pub fn stage(&self) -> TransferStage {
        match self {
            TransferErr::InvalidEvent { .. } => TransferStage::Event,
            TransferErr::DecodeKey { .. } => TransferStage::Decode,
            TransferErr::SameBucket { .. } => TransferStage::Guard,
            TransferErr::ReadObject { .. } => TransferStage::Fetch,
            TransferErr::UploadObject { .. } => TransferStage::Upload,
            TransferErr::UpdateRecord { .. } => TransferStage::Update,
        }
    }

    pub fn detail(&self) -> Option<String> {
        match self {
            TransferErr::InvalidEvent { reason } => Some(reason.to_string()),
            TransferErr::SameBucket { bucket } => {
                Some(format!("{bucket} is both the source and the destination"))
            }
            TransferErr::DecodeKey { cause }
            | TransferErr::ReadObject { cause }
            | TransferErr::UploadObject { cause }
            | TransferErr::UpdateRecord { cause } => Some(format!("{cause:#}")),
        }
    }
}

/// Details of a completed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferSummary {
    pub record_id: RecordId,
    pub url: String,
    pub bucket: String,
    pub key: String,
    pub rows_affected: u64,
}

/// The value handed back to the lambda runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateResult {
    pub status: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<TransferSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdateResult {
    pub fn success(summary: TransferSummary) -> Self {
        Self {
            status: true,
            message: "Success update table.".to_string(),
            data: Some(summary),
            error: None,
        }
    }
}

impl From<TransferErr> for UpdateResult {
    fn from(err: TransferErr) -> Self {
        Self {
            status: false,
            message: err.to_string(),
            data: None,
            error: err.detail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cool_asserts::assert_matches;

    fn s3_event(bucket: &str, key: &str) -> S3Event {
        serde_json::from_value(serde_json::json!({
            "Records": [{
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "awsRegion": "us-east-1",
                "eventTime": "2024-01-01T00:00:00.000Z",
                "eventName": "ObjectCreated:Put",
                "userIdentity": { "principalId": "EXAMPLE" },
                "requestParameters": { "sourceIPAddress": "127.0.0.1" },
                "responseElements": {
                    "x-amz-request-id": "EXAMPLE123456789",
                    "x-amz-id-2": "EXAMPLE123/5678abcdefghijklambdaisawesome/mnopqrstuvwxyzABCDEFGH"
                },
                "s3": {
                    "s3SchemaVersion": "1.0",
                    "configurationId": "testConfigRule",
                    "bucket": {
                        "name": bucket,
                        "ownerIdentity": { "principalId": "EXAMPLE" },
                        "arn": format!("arn:aws:s3:::{bucket}")
                    },
                    "object": {
                        "key": key,
                        "size": 1024,
                        "eTag": "0123456789abcdef0123456789abcdef",
                        "sequencer": "0A1B2C3D4E5F678901"
                    }
                }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn reads_bucket_and_raw_key_from_event() {
        let event = TransferEvent::from_s3_event(s3_event("uploads", "folder/my+clip_42.mp4")).unwrap();

        assert_eq!(
            event,
            TransferEvent {
                bucket: "uploads".to_string(),
                encoded_key: "folder/my+clip_42.mp4".to_string(),
            }
        );
    }

    #[test]
    fn rejects_event_without_records() {
        let event: S3Event = serde_json::from_value(serde_json::json!({ "Records": [] })).unwrap();

        assert_matches!(
            TransferEvent::from_s3_event(event),
            Err(TransferErr::InvalidEvent { reason: "event contained no records" })
        );
    }

    #[test]
    fn rejects_event_with_empty_key() {
        assert_matches!(
            TransferEvent::from_s3_event(s3_event("uploads", "")),
            Err(TransferErr::InvalidEvent { reason: "record is missing the object key" })
        );
    }

    #[test]
    fn failure_result_carries_fixed_message_and_cause() {
        let result = UpdateResult::from(TransferErr::UpdateRecord {
            cause: anyhow::anyhow!("connection refused"),
        });

        assert!(!result.status);
        assert_eq!(result.message, "Failed update table.");
        assert_eq!(result.error.as_deref(), Some("connection refused"));
        assert_eq!(result.data, None);
    }

    #[test]
    fn same_bucket_result_names_the_bucket() {
        let err = TransferErr::SameBucket {
            bucket: "media".to_string(),
        };
        assert_eq!(err.stage(), TransferStage::Guard);

        let json = serde_json::to_value(UpdateResult::from(err)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": false,
                "message": "Source and destination buckets are the same.",
                "error": "media is both the source and the destination"
            })
        );
    }

    #[test]
    fn success_result_serializes_summary() {
        let json = serde_json::to_value(UpdateResult::success(TransferSummary {
            record_id: RecordId::new("42"),
            url: "https://media.sgp1.digitaloceanspaces.com/folder/clip_42.mp4".to_string(),
            bucket: "media".to_string(),
            key: "folder/clip_42.mp4".to_string(),
            rows_affected: 1,
        }))
        .unwrap();

        assert_eq!(json["status"], true);
        assert_eq!(json["message"], "Success update table.");
        assert_eq!(json["data"]["record_id"], "42");
        assert_eq!(json["data"]["rows_affected"], 1);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn orphan_policy_parses_lowercase() {
        assert_eq!("keep".parse::<OrphanPolicy>().ok(), Some(OrphanPolicy::Keep));
        assert_eq!("delete".parse::<OrphanPolicy>().ok(), Some(OrphanPolicy::Delete));
        assert!("rollback".parse::<OrphanPolicy>().is_err());
    }
}
