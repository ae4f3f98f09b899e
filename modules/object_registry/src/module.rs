//! Module declaration and lifecycle: init, migrate, REST registration

use crate::config::Config;
use crate::contract::ObjectRegistryApi;
use crate::domain::{Clock, Service, SystemClock};
use crate::infra::storage::repositories::{
    SeaOrmObjectRepository, SeaOrmPriorityRepository, SeaOrmReferenceRepository,
};
use anyhow::Result;
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Object registry module
pub struct ObjectRegistryModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for ObjectRegistryModule {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ObjectRegistryModule {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            service: RwLock::new(None),
        }
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Build repositories and the domain service against `db`
    pub async fn init(&self, db: Arc<DatabaseConnection>) -> Result<()> {
        self.init_with_clock(db, Arc::new(SystemClock)).await
    }

    /// Same as [`Self::init`] with an explicit source of "today"
    pub async fn init_with_clock(
        &self,
        db: Arc<DatabaseConnection>,
        clock: Arc<dyn Clock>,
    ) -> Result<()> {
        let cfg = self.config();

        let references = Arc::new(SeaOrmReferenceRepository::new(db.clone()));
        let objects = Arc::new(SeaOrmObjectRepository::new(db.clone()));
        let priorities = Arc::new(SeaOrmPriorityRepository::new(db));
        let codecs = crate::infra::tabular::codec_set(cfg.export_format);

        let service = Arc::new(Service::new(
            references, objects, priorities, codecs, clock, &cfg,
        ));
        *self.service.write() = Some(service);

        tracing::info!(
            formula_version = %cfg.formula_version,
            export_format = ?cfg.export_format,
            "Object registry initialized"
        );
        Ok(())
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Object registry migrations completed");
        Ok(())
    }

    pub fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client for other components
    pub fn client(&self) -> Result<Arc<dyn ObjectRegistryApi>> {
        Ok(Arc::new(crate::api::native::NativeClient::new(self.service()?)))
    }

    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self.service()?;
        let max_upload_bytes = self.config.read().max_upload_bytes;

        tracing::info!("Registering object registry REST routes");
        crate::api::rest::routes::register_routes(router, service, max_upload_bytes)
    }
}
