use strum::{Display, EnumString};

const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// Where the lambda runs, which decides how tracing output is formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Environment {
    /// Deployed production stage
    #[strum(serialize = "prod")]
    Production,
    /// Deployed dev stage
    #[strum(serialize = "dev")]
    Develop,
    /// A developer machine, e.g. `cargo lambda watch`
    #[strum(serialize = "local")]
    Local,
}

impl Environment {
    /// Reads `ENVIRONMENT` and falls back to [Environment::Production] when it is unset
    /// or holds something else
    pub fn from_env_or_prod() -> Self {
        std::env::var(ENVIRONMENT_VAR)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(Environment::Production)
    }
}
