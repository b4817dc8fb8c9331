use std::time::Duration;

use actix_web::cookie::Key;
use actix_web::web::{self, Data};

use crate::{
    api::views::Views,
    domain::animal::service::ServiceResult,
    infrastructure::{database::sqlite_context::SqliteContext, sqlite::animal_repository::SqliteAnimalRepository},
    utils::{config::AppConfig, errors::ServiceError, flash::signing_key},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Data<SqliteContext>,
    pub views: Data<Views>,
    pub flash_key: Key,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(db: SqliteContext, views: Views, config: &AppConfig) -> Self {
        AppState {
            db: Data::new(db),
            views: Data::new(views),
            flash_key: signing_key(&config.secret_key),
            request_timeout: config.request_timeout,
        }
    }

    /// Runs `op` on a blocking thread with a connection opened for this call only.
    ///
    /// The connection is dropped when `op` returns. Failing to open it, a
    /// crashed task and an expired request timeout are all reported as
    /// [`ServiceError::Internal`].
    pub async fn run<F, T>(&self, op: F) -> ServiceResult<T>
    where
        F: FnOnce(&SqliteAnimalRepository<'_>) -> ServiceResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        let task = web::block(move || {
            let conn = db.connect().map_err(|e| {
                log::error!("Could not open a database connection: {}", e);
                ServiceError::Internal
            })?;
            let repo = SqliteAnimalRepository::new(&conn);
            op(&repo)
        });

        match tokio::time::timeout(self.request_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                log::error!("Database task failed: {}", e);
                Err(ServiceError::Internal)
            }
            Err(_) => {
                log::error!("Database task exceeded the {:?} request timeout", self.request_timeout);
                Err(ServiceError::Internal)
            }
        }
    }
}
