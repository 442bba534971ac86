use crate::di::{DependenciesInject, DependenciesInjectDeps, Repositories};
use prometheus_client::registry::Registry;
use shared::{
    config::{Config, ConnectionPool},
    utils::{SystemMetrics, run_metrics_collector},
};
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub registry: Arc<Registry>,
    pub system_metrics: Arc<SystemMetrics>,
    pub environment: String,
    pub frontend_origin: String,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("di_container", &self.di_container)
            .field("registry", &self.registry)
            .field("system_metrics", &self.system_metrics)
            .field("environment", &self.environment)
            .finish()
    }
}

impl AppState {
    /// Wires the Postgres repositories and starts the system metrics collector.
    pub fn new(pool: ConnectionPool, config: &Config) -> Self {
        let mut registry = Registry::default();
        let system_metrics = Arc::new(SystemMetrics::new());

        let di_container =
            DependenciesInject::new(DependenciesInjectDeps { pool }, &mut registry);

        registry.register_metrics(&system_metrics);

        tokio::spawn(run_metrics_collector(system_metrics.clone()));

        Self {
            di_container,
            registry: Arc::new(registry),
            system_metrics,
            environment: config.environment.clone(),
            frontend_origin: config.frontend_origin.clone(),
        }
    }

    pub fn from_repositories(
        repos: Repositories,
        environment: impl Into<String>,
        frontend_origin: impl Into<String>,
    ) -> Self {
        let mut registry = Registry::default();
        let system_metrics = Arc::new(SystemMetrics::new());

        let di_container = DependenciesInject::from_repositories(repos, &mut registry);
        registry.register_metrics(&system_metrics);

        Self {
            di_container,
            registry: Arc::new(registry),
            system_metrics,
            environment: environment.into(),
            frontend_origin: frontend_origin.into(),
        }
    }
}

trait MetricsRegister {
    fn register_metrics(&mut self, metrics: &SystemMetrics);
}

impl MetricsRegister for Registry {
    fn register_metrics(&mut self, metrics: &SystemMetrics) {
        metrics.register(self);
    }
}
