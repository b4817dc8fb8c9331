//! Registry operations: validation, duplicate-email checks and store calls.
//!
//! Every function takes the store explicitly and returns a [`ServiceResult`].
//! Store failures are logged here with their full cause and surface to
//! callers only as [`ServiceError::Internal`].

use serde::Serialize;

use crate::domain::animal::model::{Animal, AnimalForm, Page, PageRequest};
use crate::domain::animal::repository::AnimalRepository;
use crate::domain::animal::validation::{self, ValidationErrors};
use crate::utils::errors::{ServiceError, StoreError};

pub const REGISTERED_MESSAGE: &str = "Animal registered successfully.";
pub const UPDATED_MESSAGE: &str = "Animal updated successfully.";
pub const DELETED_MESSAGE: &str = "Animal deleted successfully.";

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Uniform result shape handed to the presentation layer.
#[derive(Serialize, Clone, Debug)]
pub struct Envelope<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ValidationErrors>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Envelope {
            status: Status::Success,
            message: Some(message.into()),
            data,
            fields: None,
        }
    }

    pub fn error(error: &ServiceError) -> Self {
        let fields = match error {
            ServiceError::Validation(errors) => Some(errors.clone()),
            other => other.field().map(|field| {
                let mut fields = ValidationErrors::new();
                fields.insert(field, other.to_string());
                fields
            }),
        };

        Envelope {
            status: Status::Error,
            message: Some(error.to_string()),
            data: None,
            fields,
        }
    }
}

fn internal(operation: &str, error: StoreError) -> ServiceError {
    log::error!("Store failure while {}: {}", operation, error);
    ServiceError::Internal
}

fn write_failure(operation: &str, error: StoreError) -> ServiceError {
    match error {
        StoreError::UniqueViolation(detail) => {
            log::warn!("Duplicate email rejected by the store while {}: {}", operation, detail);
            ServiceError::DuplicateEmail
        }
        other => internal(operation, other),
    }
}

/// Validates and inserts a new record. Returns the assigned id.
pub fn register<R: AnimalRepository + ?Sized>(repo: &R, form: &AnimalForm) -> ServiceResult<i64> {
    let animal = validation::check(form).map_err(ServiceError::Validation)?;

    let existing = repo
        .find_by_email(&animal.email)
        .map_err(|e| internal("checking email uniqueness", e))?;
    if existing.is_some() {
        log::warn!("Registration attempted with an existing email: {}", animal.email);
        return Err(ServiceError::DuplicateEmail);
    }

    let id = repo
        .insert(&animal)
        .map_err(|e| write_failure("registering an animal", e))?;
    log::info!("Animal {} registered with id {}", animal.name, id);
    Ok(id)
}

pub fn get_by_id<R: AnimalRepository + ?Sized>(repo: &R, id: i64) -> ServiceResult<Animal> {
    repo.find_by_id(id)
        .map_err(|e| internal(&format!("fetching animal {id}"), e))?
        .ok_or(ServiceError::NotFound)
}

/// Re-validates the form and replaces the stored values of `id`.
pub fn update<R: AnimalRepository + ?Sized>(repo: &R, id: i64, form: &AnimalForm) -> ServiceResult<()> {
    let animal = validation::check(form).map_err(ServiceError::Validation)?;

    get_by_id(repo, id)?;

    let owner = repo
        .find_by_email(&animal.email)
        .map_err(|e| internal("checking email uniqueness", e))?;
    if owner.is_some_and(|other| other.id != id) {
        log::warn!("Email {} already used by another animal", animal.email);
        return Err(ServiceError::DuplicateEmail);
    }

    let changed = repo
        .update(id, &animal)
        .map_err(|e| write_failure(&format!("updating animal {id}"), e))?;
    if changed == 0 {
        log::warn!("Update of animal {} matched no row", id);
        return Err(ServiceError::NotFound);
    }

    log::info!("Animal {} updated", id);
    Ok(())
}

pub fn delete<R: AnimalRepository + ?Sized>(repo: &R, id: i64) -> ServiceResult<()> {
    let deleted = repo
        .delete_by_id(id)
        .map_err(|e| internal(&format!("deleting animal {id}"), e))?;
    if deleted == 0 {
        log::warn!("No animal found with id {}", id);
        return Err(ServiceError::NotFound);
    }

    log::info!("Animal {} deleted", id);
    Ok(())
}

pub fn list_all<R: AnimalRepository + ?Sized>(repo: &R) -> ServiceResult<Vec<Animal>> {
    repo.list_all().map_err(|e| internal("listing all animals", e))
}

pub fn list<R: AnimalRepository + ?Sized>(repo: &R, page: PageRequest) -> ServiceResult<Vec<Animal>> {
    repo.paginate(page).map_err(|e| internal("paginating animals", e))
}

pub fn search<R: AnimalRepository + ?Sized>(repo: &R, term: &str, page: PageRequest) -> ServiceResult<Vec<Animal>> {
    repo.search_paginate(term.trim(), page)
        .map_err(|e| internal("searching animals", e))
}

pub fn count<R: AnimalRepository + ?Sized>(repo: &R) -> ServiceResult<u64> {
    repo.count().map_err(|e| internal("counting animals", e))
}

pub fn count_search<R: AnimalRepository + ?Sized>(repo: &R, term: &str) -> ServiceResult<u64> {
    repo.count_search(term.trim())
        .map_err(|e| internal("counting search results", e))
}

/// A listing page with its totals. A blank term means no filter.
pub fn page<R: AnimalRepository + ?Sized>(
    repo: &R,
    term: Option<&str>,
    request: PageRequest,
) -> ServiceResult<Page<Animal>> {
    match term.map(str::trim).filter(|t| !t.is_empty()) {
        Some(term) => {
            let items = search(repo, term, request)?;
            let total = count_search(repo, term)?;
            Ok(Page::new(items, request, total))
        }
        None => {
            let items = list(repo, request)?;
            let total = count(repo)?;
            Ok(Page::new(items, request, total))
        }
    }
}
