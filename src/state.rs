use std::{ops::Deref, sync::Arc};

use axum::extract::{FromRequestParts, State};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::{
    auth::Keys,
    config::Config,
    database::Database,
    marketplace::{InMemoryOrganizers, OrganizerStore},
};

pub struct App {
    pub primary_database: Database,
    pub keys: Keys,
    pub marketplace: Arc<dyn OrganizerStore>,
    pub metrics: Option<PrometheusHandle>,
    pub config: Config,
}

impl App {
    pub fn new(config: Config, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            keys: Keys::new(config.jwt_secret.as_bytes()),
            primary_database: Database::new(&config.database_url),
            marketplace: Arc::new(InMemoryOrganizers::seeded()),
            metrics,
            config,
        }
    }

    pub fn domain(&self) -> &str {
        &self.config.domain
    }
}

#[derive(Clone, FromRequestParts)]
#[from_request(via(State))]
pub struct AppState(pub Arc<App>);

impl AppState {
    pub fn new(config: Config, metrics: Option<PrometheusHandle>) -> Self {
        AppState(Arc::new(App::new(config, metrics)))
    }
}

impl Deref for AppState {
    type Target = App;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
