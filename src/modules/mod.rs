pub mod books;
pub mod users;
pub mod wire;

use std::sync::Arc;

use redude_kernel::{settings::Settings, ModuleRegistry};

use crate::app::AppServices;

/// Register all application modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    settings: &Settings,
    services: &AppServices,
) -> anyhow::Result<()> {
    registry.register(Arc::new(users::UsersModule::new(services.clone())))?;
    registry.register(Arc::new(books::BooksModule::new(
        services.clone(),
        settings.api.sentinel_responses,
    )))?;
    Ok(())
}
