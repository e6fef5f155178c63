use async_trait::async_trait;
use hiretrack::config::{StorageConfig, StorageKind};
use hiretrack::tracker::{
    ApplicationId, ApplicationRecord, ApplicationRepository, ApplicationStatus,
    InMemoryApplicationRepository, JsonFileRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Repository selected at startup from [`StorageConfig`].
pub(crate) enum ConfiguredRepository {
    Memory(InMemoryApplicationRepository),
    File(JsonFileRepository),
}

impl ConfiguredRepository {
    pub(crate) async fn open(config: &StorageConfig) -> Result<Self, RepositoryError> {
        match config.kind {
            StorageKind::Memory => {
                info!("using in-memory application store");
                Ok(Self::Memory(InMemoryApplicationRepository::default()))
            }
            StorageKind::File => {
                info!(path = %config.path.display(), "using file application store");
                Ok(Self::File(JsonFileRepository::open(&config.path).await?))
            }
        }
    }

    fn inner(&self) -> &dyn ApplicationRepository {
        match self {
            Self::Memory(repository) => repository,
            Self::File(repository) => repository,
        }
    }
}

#[async_trait]
impl ApplicationRepository for ConfiguredRepository {
    async fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.inner().all().await
    }

    async fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        self.inner().insert(record).await
    }

    async fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        self.inner().fetch(id).await
    }

    async fn set_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        self.inner().set_status(id, status).await
    }

    async fn remove(&self, id: &ApplicationId) -> Result<bool, RepositoryError> {
        self.inner().remove(id).await
    }
}
