use lambda_runtime::tracing;
use s3_client::{ObjectVisibility, S3};

use crate::domain::ports::{DestinationStorage, SourceStorage};

impl SourceStorage for S3 {
    #[tracing::instrument(skip(self))]
    async fn get_object(&self, bucket: &str, key: &str) -> anyhow::Result<Vec<u8>> {
        self.get(bucket, key).await
    }
}

impl DestinationStorage for S3 {
    #[tracing::instrument(skip(self, content))]
    async fn put_public_object(&self, bucket: &str, key: &str, content: &[u8]) -> anyhow::Result<()> {
        self.put(bucket, key, content, ObjectVisibility::PublicRead)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_object(&self, bucket: &str, key: &str) -> anyhow::Result<()> {
        self.delete(bucket, key).await
    }
}
