use crate::{domain::animal::model::{Animal, NewAnimal, PageRequest}, utils::errors::StoreError};

/// Record store for the `animals` relation. Each method is one round trip.
pub trait AnimalRepository {
    fn insert(&self, animal: &NewAnimal) -> Result<i64, StoreError>;
    fn find_by_id(&self, id: i64) -> Result<Option<Animal>, StoreError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Animal>, StoreError>;
    fn update(&self, id: i64, animal: &NewAnimal) -> Result<usize, StoreError>;
    fn delete_by_id(&self, id: i64) -> Result<usize, StoreError>;
    fn list_all(&self) -> Result<Vec<Animal>, StoreError>;
    fn paginate(&self, page: PageRequest) -> Result<Vec<Animal>, StoreError>;
    fn count(&self) -> Result<u64, StoreError>;
    fn search_paginate(&self, term: &str, page: PageRequest) -> Result<Vec<Animal>, StoreError>;
    fn count_search(&self, term: &str) -> Result<u64, StoreError>;
}
