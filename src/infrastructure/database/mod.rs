pub mod sqlite_context;
