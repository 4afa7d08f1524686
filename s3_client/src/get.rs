use anyhow::Context;
use aws_sdk_s3 as s3;
use s3::{error::SdkError, operation::get_object::GetObjectError};

/// Gets a given item from the bucket
#[tracing::instrument(skip(client))]
pub(crate) async fn get(client: &s3::Client, bucket: &str, key: &str) -> anyhow::Result<Vec<u8>> {
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(get_error)
        .context(format!("could not get item {key} from bucket {bucket}"))?;

    let body = resp
        .body
        .collect()
        .await
        .context("could not collect body")?;

    let bytes = body.into_bytes().to_vec();
    tracing::trace!(content_len = bytes.len(), "read object");
    Ok(bytes)
}

/// missing keys get a short message instead of the full sdk error chain
fn get_error(e: SdkError<GetObjectError>) -> anyhow::Error {
    if e.as_service_error().is_some_and(|err| err.is_no_such_key()) {
        anyhow::anyhow!("no such key")
    } else {
        anyhow::Error::from(e)
    }
}
