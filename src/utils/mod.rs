pub mod errors;
pub mod config;
pub mod flash;

pub use errors::ApiError;
pub use config::AppConfig;
