use anyhow::Context;
use s3_client::{DEFAULT_SPACES_DOMAIN, SpacesEndpoint};
use secrecy::SecretString;

use crate::domain::{
    assignment::{Identifier, RecordUpdate, parse_assignments},
    models::OrphanPolicy,
};

const DEFAULT_MYSQL_PORT: u16 = 3306;
const DEFAULT_URL_COLUMN: &str = "video_url";

/// Connection parameters for the MySQL database holding the record
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub database: String,
}

/// The configuration parameters for the lambda.
///
/// Everything is pulled from environment variables, see `.env.sample` for details.
#[derive(Debug, Clone)]
pub struct Config {
    /// The spaces bucket objects are copied into
    pub space_bucket: String,

    /// Region and domain of the spaces endpoint
    pub space_endpoint: SpacesEndpoint,

    pub space_access_key: SecretString,
    pub space_secret_key: SecretString,

    pub database: DatabaseConfig,

    /// Which table and columns get the url
    pub record_update: RecordUpdate,

    /// What happens to the copy when the record update fails
    pub orphan_policy: OrphanPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |name: &str| -> anyhow::Result<String> {
            lookup(name).with_context(|| format!("{name} must be provided"))
        };
        let identifier = |name: &str, value: String| -> anyhow::Result<Identifier> {
            value
                .parse()
                .with_context(|| format!("{name} must be a plain table or column name"))
        };

        let space_bucket = required("SPACE_BUCKET")?;
        let space_region = required("SPACE_REGION")?;
        let space_domain =
            lookup("SPACE_ENDPOINT_DOMAIN").unwrap_or_else(|| DEFAULT_SPACES_DOMAIN.to_string());
        let space_access_key = SecretString::from(required("SPACE_ACCESS_KEY")?);
        let space_secret_key = SecretString::from(required("SPACE_SECRET_KEY")?);

        let port = match lookup("RDS_PORT") {
            Some(port) => port.parse().context("RDS_PORT must be a port number")?,
            None => DEFAULT_MYSQL_PORT,
        };
        let database = DatabaseConfig {
            host: required("RDS_HOST")?,
            port,
            user: required("RDS_USER")?,
            password: SecretString::from(required("RDS_PASSWORD")?),
            database: required("RDS_DATABASE")?,
        };

        let table = identifier("RDS_UPDATE_TABLE_NAME", required("RDS_UPDATE_TABLE_NAME")?)?;
        let primary_key = identifier("RDS_UPDATE_PK_NAME", required("RDS_UPDATE_PK_NAME")?)?;
        let url_column = identifier(
            "RDS_UPDATE_URL_COLUMN",
            lookup("RDS_UPDATE_URL_COLUMN").unwrap_or_else(|| DEFAULT_URL_COLUMN.to_string()),
        )?;
        let additional = parse_assignments(
            &lookup("RDS_UPDATE_ADDITIONAL_UPDATE").unwrap_or_default(),
        )
        .context("RDS_UPDATE_ADDITIONAL_UPDATE must be a list of `column = value`")?;
        let record_update = RecordUpdate::new(table, primary_key, url_column, additional)
            .context("invalid record update")?;

        let orphan_policy = match lookup("ON_UPDATE_FAILURE") {
            Some(policy) => policy
                .parse()
                .context("ON_UPDATE_FAILURE must be keep or delete")?,
            None => OrphanPolicy::default(),
        };

        Ok(Config {
            space_bucket,
            space_endpoint: SpacesEndpoint::new(space_region, space_domain),
            space_access_key,
            space_secret_key,
            database,
            record_update,
            orphan_policy,
        })
    }
}
