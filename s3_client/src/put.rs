use anyhow::Context;
use aws_sdk_s3::{primitives::ByteStream, types::ObjectCannedAcl};

/// Who may read an object once it has been written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectVisibility {
    /// Bucket default, no ACL is sent
    Private,
    /// Anyone holding the url can fetch the object
    PublicRead,
}

impl ObjectVisibility {
    fn acl(self) -> Option<ObjectCannedAcl> {
        match self {
            ObjectVisibility::Private => None,
            ObjectVisibility::PublicRead => Some(ObjectCannedAcl::PublicRead),
        }
    }
}

#[tracing::instrument(skip(client, content))]
pub(crate) async fn put(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    content: &[u8],
    visibility: ObjectVisibility,
) -> anyhow::Result<()> {
    let body = ByteStream::from(content.to_vec());
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(body)
        .set_acl(visibility.acl())
        .send()
        .await
        .context(format!("could not put item {key} into bucket {bucket}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_read_maps_to_canned_acl() {
        assert_eq!(
            ObjectVisibility::PublicRead.acl(),
            Some(ObjectCannedAcl::PublicRead)
        );
        assert_eq!(ObjectVisibility::Private.acl(), None);
    }
}
