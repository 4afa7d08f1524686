use std::sync::Arc;

use anyhow::Context;
use aws_lambda_events::s3::S3Event;
use lambda_entrypoint::LambdaEntrypoint;
use lambda_runtime::{Error, LambdaEvent, run, service_fn, tracing};
use s3_client::S3;

use crate::{
    config::Config,
    domain::service::{TransferService, TransferSettings},
    handler::handler,
    outbound::mysql_record_repo::MySqlRecordRepo,
};

mod config;
mod domain;
mod handler;
mod outbound;

#[tokio::main]
async fn main() -> Result<(), Error> {
    LambdaEntrypoint::default().init();

    tracing::trace!("initiating lambda");

    let config = Config::from_env().context("failed to load config")?;

    tracing::trace!("initialized config");

    let source = S3::new(aws_sdk_s3::Client::new(
        &aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await,
    ));

    let destination = S3::spaces(
        &config.space_endpoint,
        &config.space_access_key,
        &config.space_secret_key,
    );

    tracing::trace!(endpoint=%config.space_endpoint.endpoint_url(), "initialized s3 clients");

    // no pool, the repo opens a fresh connection for every update
    let records = MySqlRecordRepo::new(&config.database, config.record_update.clone());

    let service = Arc::new(TransferService::new(
        source,
        destination,
        records,
        TransferSettings {
            destination_bucket: config.space_bucket.clone(),
            endpoint: config.space_endpoint.clone(),
            orphan_policy: config.orphan_policy,
        },
    ));

    let func = service_fn(move |event: LambdaEvent<S3Event>| {
        let service = service.clone();
        async move { handler(service.as_ref(), event).await }
    });

    run(func).await
}
