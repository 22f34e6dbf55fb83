pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use database::Storage;
pub use services::{AdminService, AuthService, NotificationService};

use database::repositories::NotificationRepository;

/// Shared by every worker. Handlers also need `web::Data<Config>` for the
/// token extractor.
pub struct AppState {
    pub storage: Storage,
    pub auth_service: AuthService,
    pub admin_service: AdminService,
    pub notification_service: NotificationService,
    pub config: Config,
}

impl AppState {
    pub fn new(storage: Storage, config: Config) -> Self {
        Self {
            auth_service: AuthService::new(&storage, config.clone()),
            admin_service: AdminService::new(&storage, &config),
            notification_service: NotificationService::new(NotificationRepository::new(
                storage.clone(),
                config.max_notifications,
            )),
            storage,
            config,
        }
    }
}
