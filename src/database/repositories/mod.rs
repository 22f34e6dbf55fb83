pub mod audit_log_repository;
pub mod collection;
pub mod hospital_repository;
pub mod login_attempt_repository;
pub mod notification_repository;
pub mod shift_repository;
pub mod user_repository;

// Re-export all repositories for easy importing
pub use audit_log_repository::AuditLogRepository;
pub use collection::{Collection, Record};
pub use hospital_repository::HospitalRepository;
pub use login_attempt_repository::LoginAttemptRepository;
pub use notification_repository::NotificationRepository;
pub use shift_repository::ShiftRepository;
pub use user_repository::UserRepository;
