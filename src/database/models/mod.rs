pub mod audit;
pub mod hospital;
pub mod login_attempt;
mod macros;
pub mod notification;
pub mod report;
pub mod shift;
pub mod user;

// Re-export all models for easy importing
pub use audit::*;
pub use hospital::*;
pub use login_attempt::*;
pub use notification::*;
pub use report::*;
pub use shift::*;
pub use user::*;
