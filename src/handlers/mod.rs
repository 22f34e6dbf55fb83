pub mod admin;
pub mod auth;
pub mod hospitals;
pub mod notifications;
pub mod reports;
pub mod shared;
pub mod shifts;
