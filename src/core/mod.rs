pub mod auth;
pub mod backup;
pub mod certificate;
pub mod config;
pub mod content;
pub mod export;
pub mod generation;
pub mod log;
pub mod people;
pub mod push;
pub mod schedule;
pub mod session;
pub mod welcome;

pub use certificate::CertificateValidator;
pub use schedule::DayOrder;
pub use session::SessionStore;
