//! Application wiring: collaborators, module registry, and the serve loop.

use std::sync::Arc;

use anyhow::Context;
use redude_authz::{GoogleTokenVerifier, TokenVerifier};
use redude_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules::{
    self,
    books::{
        catalog::{BookCatalog, GoogleBooksCatalog},
        ratings::{MemoryRatingService, RatingService},
        repository::{BookRepository, MemoryBookRepository},
    },
    users::repository::{MemoryUserRepository, UserRepository},
};

/// Collaborators shared by every module.
#[derive(Clone)]
pub struct AppServices {
    pub verifier: Arc<dyn TokenVerifier>,
    pub catalog: Arc<dyn BookCatalog>,
    pub users: Arc<dyn UserRepository>,
    pub books: Arc<dyn BookRepository>,
    pub ratings: Arc<dyn RatingService>,
}

impl AppServices {
    /// Google-backed identity and search with in-memory storage.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let verifier = GoogleTokenVerifier::from_settings(&settings.google)
            .context("failed to build token verifier client")?;
        let catalog = GoogleBooksCatalog::from_settings(&settings.google)
            .context("failed to build book catalog client")?;

        Ok(Self {
            verifier: Arc::new(verifier),
            catalog: Arc::new(catalog),
            users: Arc::new(MemoryUserRepository::new()),
            books: Arc::new(MemoryBookRepository::new()),
            ratings: Arc::new(MemoryRatingService::new()),
        })
    }
}

/// Registry holding every application module.
pub fn build_registry(
    settings: &Settings,
    services: &AppServices,
) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings, services)?;
    Ok(registry)
}

/// Run the service until a shutdown signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let services = AppServices::from_settings(&settings)?;
    let registry = build_registry(&settings, &services)?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = redude_http::start_server(&registry, &settings, shutdown_signal()).await;

    registry.stop_modules().await?;
    served
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
