use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};

use crate::utils::errors::StoreError;

pub const ANIMALS_TABLE: &str = "animals";

const CREATE_ANIMALS_TABLE: &str = "
    CREATE TABLE animals (
        id INTEGER PRIMARY KEY,
        name VARCHAR(25) NOT NULL,
        species VARCHAR(25) NOT NULL,
        breed VARCHAR(25) NOT NULL,
        age INTEGER NOT NULL,
        description VARCHAR(500),
        email VARCHAR(80) NOT NULL UNIQUE,
        address VARCHAR(75) NOT NULL,
        city VARCHAR(75) NOT NULL,
        postal_code VARCHAR(7) NOT NULL
    )
";

/// Location of the registry database. Connections are opened per request and
/// closed when dropped.
#[derive(Clone, Debug)]
pub struct SqliteContext {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteContext {

    pub fn init(path: &str, busy_timeout: Duration) -> Result<SqliteContext, StoreError> {
        log::info!("Opening SQLite database at: {}", path);

        Self::validate_database_path(path)?;

        let context = SqliteContext {
            path: PathBuf::from(path.trim()),
            busy_timeout,
        };

        let conn = context.connect()?;
        if Self::initialize_tables(&conn)? {
            log::info!("Table '{}' created.", ANIMALS_TABLE);
        } else {
            log::info!("Table '{}' already exists, nothing to do.", ANIMALS_TABLE);
        }

        Ok(context)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path).map_err(|e| {
            log::error!("Failed to open SQLite database {}: {}", self.path.display(), e);
            e
        })?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    pub fn table_exists(conn: &Connection, table_name: &str) -> Result<bool, StoreError> {
        let found = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table_name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Creates the `animals` table when it is missing. Returns whether it was created.
    pub fn initialize_tables(conn: &Connection) -> Result<bool, StoreError> {
        if Self::table_exists(conn, ANIMALS_TABLE)? {
            return Ok(false);
        }
        conn.execute_batch(CREATE_ANIMALS_TABLE).map_err(|e| {
            log::error!("Failed to create table '{}': {}", ANIMALS_TABLE, e);
            e
        })?;
        Ok(true)
    }

    fn validate_database_path(path: &str) -> Result<(), StoreError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(StoreError::InvalidDatabasePath("cannot be empty or whitespace".to_string()));
        }

        if trimmed.contains('\0') {
            return Err(StoreError::InvalidDatabasePath("cannot contain NUL bytes".to_string()));
        }

        // every request opens a fresh connection, so an in-memory database would be empty each time
        if trimmed == ":memory:" || trimmed.starts_with("file::memory:") {
            return Err(StoreError::InvalidDatabasePath(format!(
                "in-memory databases are not supported. Got: {}",
                path
            )));
        }

        if Path::new(trimmed).is_dir() {
            return Err(StoreError::InvalidDatabasePath(format!("{} is a directory", path)));
        }

        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_db() -> (TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.db").to_string_lossy().into_owned();
        (dir, path)
    }

    #[test]
    fn test_init_creates_table() {
        let (_dir, path) = temp_db();
        let context = SqliteContext::init(&path, Duration::from_secs(1)).unwrap();

        let conn = context.connect().unwrap();
        assert!(SqliteContext::table_exists(&conn, ANIMALS_TABLE).unwrap());
        assert_eq!(context.path(), Path::new(&path));
    }

    #[test]
    fn test_initialize_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        assert!(SqliteContext::initialize_tables(&conn).unwrap());
        conn.execute(
            "INSERT INTO animals (name, species, breed, age, email, address, city, postal_code)
             VALUES ('Rex', 'Dog', 'Beagle', 3, 'rex@example.com', '1 rue', 'Paris', '75001')",
            [],
        )
        .unwrap();

        assert!(!SqliteContext::initialize_tables(&conn).unwrap());
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM animals", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_init_twice_keeps_data() {
        let (_dir, path) = temp_db();
        let context = SqliteContext::init(&path, Duration::from_secs(1)).unwrap();
        context
            .connect()
            .unwrap()
            .execute(
                "INSERT INTO animals (name, species, breed, age, email, address, city, postal_code)
                 VALUES ('Rex', 'Dog', 'Beagle', 3, 'rex@example.com', '1 rue', 'Paris', '75001')",
                [],
            )
            .unwrap();

        let context = SqliteContext::init(&path, Duration::from_secs(1)).unwrap();
        let count: i64 = context
            .connect()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM animals", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_email_is_unique_at_storage_level() {
        let conn = Connection::open_in_memory().unwrap();
        SqliteContext::initialize_tables(&conn).unwrap();

        let insert = "INSERT INTO animals (name, species, breed, age, email, address, city, postal_code)
                      VALUES ('Rex', 'Dog', 'Beagle', 3, 'rex@example.com', '1 rue', 'Paris', '75001')";
        conn.execute(insert, []).unwrap();
        let error = StoreError::from(conn.execute(insert, []).unwrap_err());
        assert!(matches!(error, StoreError::UniqueViolation(_)));
    }

    #[test]
    fn test_validate_database_path() {
        let dir = tempfile::tempdir().unwrap();

        assert!(SqliteContext::validate_database_path("database.db").is_ok());
        assert!(SqliteContext::validate_database_path("/var/lib/registry/animals.sqlite").is_ok());

        assert!(SqliteContext::validate_database_path("").is_err());
        assert!(SqliteContext::validate_database_path("   ").is_err());
        assert!(SqliteContext::validate_database_path(":memory:").is_err());
        assert!(SqliteContext::validate_database_path("file::memory:?cache=shared").is_err());
        assert!(SqliteContext::validate_database_path("bad\0path").is_err());
        assert!(SqliteContext::validate_database_path(&dir.path().to_string_lossy()).is_err());
    }

    #[test]
    fn test_init_invalid_path() {
        let result = SqliteContext::init("", Duration::from_secs(1));
        let error = result.unwrap_err();
        assert_eq!(error.to_string(), "Invalid database path: cannot be empty or whitespace");
    }
}
