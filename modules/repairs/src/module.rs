use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use repairdesk_contract::UploadPolicy;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info, warn};

use crate::api::rest::{openapi::RepairsApiDoc, routes};
use crate::config::{RepairsConfig, INSECURE_DEFAULT_SECRET};
use crate::contract::client::RepairsApi;
use crate::domain::service::{Ports, Service, ServiceConfig};
use crate::gateways::local::RepairsLocalClient;
use crate::infra::files::LocalFileStore;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{
    SeaOrmCustomersRepository, SeaOrmRepairsRepository, SeaOrmUsersRepository,
};

/// Wired repairs module: domain service, REST router and OpenAPI document.
#[derive(Clone)]
pub struct RepairsModule {
    service: Arc<Service>,
    uploads_dir: PathBuf,
}

impl RepairsModule {
    /// Run migrations and wire repositories and the upload store into the service.
    pub async fn init(
        db: DatabaseConnection,
        cfg: RepairsConfig,
        home_dir: &Path,
    ) -> anyhow::Result<Self> {
        info!("Initializing repairs module");

        if cfg.jwt_secret == INSECURE_DEFAULT_SECRET {
            warn!("repairs.jwt_secret is the built-in default; set it for any shared deployment");
        }
        if cfg.token_ttl_minutes <= 0 {
            anyhow::bail!("repairs.token_ttl_minutes must be positive");
        }

        Self::migrate(&db).await?;

        let uploads_dir = {
            let p = PathBuf::from(&cfg.upload_dir);
            if p.is_absolute() {
                p
            } else {
                home_dir.join(p)
            }
        };
        debug!(
            uploads = %uploads_dir.display(),
            ttl_minutes = cfg.token_ttl_minutes,
            "Loaded repairs config"
        );

        let ports = Ports {
            users: Arc::new(SeaOrmUsersRepository::new(db.clone())),
            customers: Arc::new(SeaOrmCustomersRepository::new(db.clone())),
            repairs: Arc::new(SeaOrmRepairsRepository::new(db)),
            files: Arc::new(LocalFileStore::new(uploads_dir.clone())),
        };
        let service_config = ServiceConfig {
            jwt_secret: cfg.jwt_secret,
            token_ttl_minutes: cfg.token_ttl_minutes,
            upload_policy: UploadPolicy {
                max_file_bytes: cfg.max_upload_mb * 1024 * 1024,
                ..UploadPolicy::default()
            },
            ..ServiceConfig::default()
        };

        Ok(Self {
            service: Arc::new(Service::new(ports, service_config)),
            uploads_dir,
        })
    }

    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running repairs database migrations");
        Migrator::up(db, None).await?;
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn client(&self) -> Arc<dyn RepairsApi> {
        Arc::new(RepairsLocalClient::new(self.service.clone()))
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering repairs REST routes");
        routes::register_routes(router, self.service.clone(), &self.uploads_dir)
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        use utoipa::OpenApi;
        RepairsApiDoc::openapi()
    }
}
