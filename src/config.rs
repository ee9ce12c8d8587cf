use std::{
    fmt,
    fs::File,
    net::{IpAddr, Ipv4Addr},
};

use sentry_tracing::EventFilter;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Env {
    Development,
    Production,
    Test,
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Test => write!(f, "test"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub env: Env,
    pub ip: IpAddr,
    pub port: u16,
    pub threads: usize,
    pub domain: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub sentry_token: Option<String>,
}

impl Config {
    pub fn from_file(file_name: &str) -> Self {
        serde_json::from_reader(File::open(file_name).expect("where is your config file?"))
            .expect("your config is wrong")
    }

    /// Initializes the tracing subscriber for the configured environment.
    /// The returned sentry guard must stay alive for the whole process.
    pub fn init_tracing(&self) -> Option<sentry::ClientInitGuard> {
        match self.env {
            Env::Test => return None,
            Env::Development => {
                tracing_subscriber::registry()
                    .with(tracing_subscriber::EnvFilter::from_default_env())
                    .with(tracing_subscriber::fmt::layer().compact())
                    .init();
                return None;
            }
            Env::Production => (),
        };

        let registry = tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_file(true)
                    .with_line_number(true)
                    .with_current_span(true)
                    .with_target(true),
            );

        if let Some(token) = self.sentry_token.as_deref() {
            let guard = sentry::init((
                token,
                sentry::ClientOptions {
                    release: sentry::release_name!(),
                    environment: Some(self.env.to_string().into()),
                    ..Default::default()
                },
            ));

            let sentry_layer = sentry_tracing::layer().event_filter(|md| match md.level() {
                &tracing::Level::WARN | &tracing::Level::ERROR => EventFilter::Event,
                _ => EventFilter::Ignore,
            });

            registry.with(sentry_layer).init();
            Some(guard)
        } else {
            registry.init();
            None
        }
    }

    pub fn stub() -> Self {
        Self {
            env: Env::Test,
            ip: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8000,
            threads: 1,
            domain: "kudu.app".to_owned(),
            database_url: format!(
                "{}/kudu-test-{}.sqlite",
                std::env::temp_dir().display(),
                uuid::Uuid::new_v4().simple()
            ),
            jwt_secret: "jwt_secret".to_owned(),
            sentry_token: None,
        }
    }
}
