#![deny(missing_docs)]
//! Standardized start up for lambda binaries.
//! Every handler calls [LambdaEntrypoint::init] first so tracing output looks the same everywhere.

use tracing_subscriber::EnvFilter;

pub use env::Environment;

mod env;

/// Start-up for a lambda binary, the tracing format follows [Environment]
#[derive(Debug)]
pub struct LambdaEntrypoint {
    env: Environment,
}

impl Default for LambdaEntrypoint {
    fn default() -> Self {
        LambdaEntrypoint {
            env: Environment::from_env_or_prod(),
        }
    }
}

/// Returned by [LambdaEntrypoint::init] once tracing is installed
#[derive(Debug)]
pub struct InitializedEntrypoint(());

impl LambdaEntrypoint {
    /// Loads `.env`, installs the panic hook and the tracing subscriber
    pub fn init(self) -> InitializedEntrypoint {
        dotenv::dotenv().ok();
        std::panic::set_hook(Box::new(tracing_panic::panic_hook));

        match self.env {
            Environment::Local => {
                tracing_subscriber::fmt()
                    .with_ansi(true)
                    .with_env_filter(EnvFilter::from_default_env())
                    .with_file(true)
                    .with_line_number(true)
                    .pretty()
                    .init();
            }
            Environment::Production | Environment::Develop => {
                // lambda already prefixes every line with a timestamp
                tracing_subscriber::fmt()
                    .with_ansi(false)
                    .with_env_filter(EnvFilter::from_default_env())
                    .with_file(true)
                    .with_line_number(true)
                    .without_time()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .flatten_event(true)
                    .init();
            }
        }

        tracing::trace!(environment=%self.env, "initialized tracing");

        InitializedEntrypoint(())
    }
}
