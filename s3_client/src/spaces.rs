use aws_sdk_s3::config::{
    BehaviorVersion, Credentials, Region, RequestChecksumCalculation, ResponseChecksumValidation,
};
use secrecy::{ExposeSecret, SecretString};

/// Default public domain of DigitalOcean Spaces
pub const DEFAULT_SPACES_DOMAIN: &str = "digitaloceanspaces.com";

/// The regional endpoint of an S3 compatible provider, e.g. `sgp1.digitaloceanspaces.com`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpacesEndpoint {
    region: String,
    domain: String,
}

impl SpacesEndpoint {
    pub fn new(region: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            domain: domain.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// The api endpoint the client talks to
    pub fn endpoint_url(&self) -> String {
        format!("https://{}.{}", self.region, self.domain)
    }

    /// The virtual hosted url an object is publicly reachable at
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("https://{}.{}.{}/{}", bucket, self.region, self.domain, key)
    }
}

impl Default for SpacesEndpoint {
    fn default() -> Self {
        Self::new("sgp1", DEFAULT_SPACES_DOMAIN)
    }
}

pub(crate) fn client(
    endpoint: &SpacesEndpoint,
    access_key: &SecretString,
    secret_key: &SecretString,
) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        access_key.expose_secret(),
        secret_key.expose_secret(),
        None,
        None,
        "spaces",
    );

    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .endpoint_url(endpoint.endpoint_url())
        .region(Region::new(endpoint.region().to_string()))
        .credentials_provider(credentials)
        // not every s3 compatible provider accepts the crc checksums the sdk sends by default
        .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
        .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_regional_endpoint() {
        let endpoint = SpacesEndpoint::new("ams3", DEFAULT_SPACES_DOMAIN);
        assert_eq!(endpoint.endpoint_url(), "https://ams3.digitaloceanspaces.com");
    }

    #[test]
    fn builds_public_url() {
        let endpoint = SpacesEndpoint::default();
        assert_eq!(
            endpoint.public_url("mybucket", "video_60.mp4"),
            "https://mybucket.sgp1.digitaloceanspaces.com/video_60.mp4"
        );
    }

    #[test]
    fn public_url_keeps_folders_in_key() {
        let endpoint = SpacesEndpoint::new("nyc3", "example.com");
        assert_eq!(
            endpoint.public_url("media", "folder/clip_42.mp4"),
            "https://media.nyc3.example.com/folder/clip_42.mp4"
        );
    }
}
