use secrecy::SecretString;

mod delete;
mod get;
mod put;
mod spaces;

pub use put::ObjectVisibility;
pub use spaces::{DEFAULT_SPACES_DOMAIN, SpacesEndpoint};

/// Thin wrapper around an S3 compatible client.
///
/// The same wrapper is used for the AWS source bucket and for the Spaces destination,
/// the only difference being how the inner client was configured.
#[derive(Clone, Debug)]
pub struct S3 {
    inner: aws_sdk_s3::Client,
}

impl S3 {
    pub fn new(inner: aws_sdk_s3::Client) -> Self {
        Self { inner }
    }

    /// Builds a client pointed at a DigitalOcean Spaces style endpoint using static credentials.
    pub fn spaces(
        endpoint: &SpacesEndpoint,
        access_key: &SecretString,
        secret_key: &SecretString,
    ) -> Self {
        Self::new(spaces::client(endpoint, access_key, secret_key))
    }

    /// Retreives the provided key from the bucket.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, bucket: &str, key: &str) -> anyhow::Result<Vec<u8>> {
        get::get(&self.inner, bucket, key).await
    }

    /// Puts the provided content into the bucket at the provided key.
    #[tracing::instrument(skip(self, content), fields(content_len = content.len()))]
    pub async fn put(
        &self,
        bucket: &str,
        key: &str,
        content: &[u8],
        visibility: ObjectVisibility,
    ) -> anyhow::Result<()> {
        put::put(&self.inner, bucket, key, content, visibility).await
    }

    /// Deletes the provided key from the bucket.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, bucket: &str, key: &str) -> anyhow::Result<()> {
        delete::delete(&self.inner, bucket, key).await
    }
}
