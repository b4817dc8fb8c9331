pub mod database;
pub mod sqlite;

pub use database::sqlite_context;
pub use sqlite::animal_repository;
