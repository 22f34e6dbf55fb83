pub mod admin;
pub mod audit_logger;
pub mod auth;
pub mod export;
pub mod hospital_service;
pub mod notifications;
pub mod overlap;
pub mod reports;
pub mod shift_service;
pub mod user_context;
pub mod validation;

pub use admin::AdminService;
pub use audit_logger::AuditLogger;
pub use auth::{AuthService, Claims};
pub use hospital_service::HospitalService;
pub use notifications::NotificationService;
pub use overlap::OverlapGuard;
pub use shift_service::ShiftService;
pub use user_context::UserContext;
