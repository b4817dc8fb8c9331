use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::animal::model::{Animal, NewAnimal, PageRequest};
use crate::domain::animal::repository::AnimalRepository;
use crate::utils::errors::StoreError;

const SELECT_ANIMAL: &str =
    "SELECT id, name, species, breed, age, description, email, address, city, postal_code FROM animals";

/// Columns a search term is matched against, in both the paginated query and its count.
const SEARCH_FILTER: &str = "name LIKE ?1 ESCAPE '\\'
    OR species LIKE ?1 ESCAPE '\\'
    OR breed LIKE ?1 ESCAPE '\\'
    OR email LIKE ?1 ESCAPE '\\'
    OR description LIKE ?1 ESCAPE '\\'";

pub struct SqliteAnimalRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteAnimalRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Animal> {
        Ok(Animal {
            id: row.get("id")?,
            name: row.get("name")?,
            species: row.get("species")?,
            breed: row.get("breed")?,
            age: row.get("age")?,
            description: row.get("description")?,
            email: row.get("email")?,
            address: row.get("address")?,
            city: row.get("city")?,
            postal_code: row.get("postal_code")?,
        })
    }
}

/// Wraps a search term for `LIKE ... ESCAPE '\'` so it only matches literally.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl AnimalRepository for SqliteAnimalRepository<'_> {

    fn insert(&self, animal: &NewAnimal) -> Result<i64, StoreError> {
        log::debug!("Inserting animal with email {}", animal.email);
        self.conn.execute(
            "INSERT INTO animals (name, species, breed, age, description, email, address, city, postal_code)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                animal.name,
                animal.species,
                animal.breed,
                animal.age,
                animal.description,
                animal.email,
                animal.address,
                animal.city,
                animal.postal_code,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Animal>, StoreError> {
        let animal = self
            .conn
            .query_row(&format!("{SELECT_ANIMAL} WHERE id = ?1"), params![id], Self::map_row)
            .optional()?;
        Ok(animal)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Animal>, StoreError> {
        let animal = self
            .conn
            .query_row(&format!("{SELECT_ANIMAL} WHERE email = ?1"), params![email], Self::map_row)
            .optional()?;
        Ok(animal)
    }

    fn update(&self, id: i64, animal: &NewAnimal) -> Result<usize, StoreError> {
        let changed = self.conn.execute(
            "UPDATE animals
             SET name = ?1, species = ?2, breed = ?3, age = ?4, description = ?5,
                 email = ?6, address = ?7, city = ?8, postal_code = ?9
             WHERE id = ?10",
            params![
                animal.name,
                animal.species,
                animal.breed,
                animal.age,
                animal.description,
                animal.email,
                animal.address,
                animal.city,
                animal.postal_code,
                id,
            ],
        )?;
        log::debug!("Update of animal {} affected {} row(s)", id, changed);
        Ok(changed)
    }

    fn delete_by_id(&self, id: i64) -> Result<usize, StoreError> {
        let deleted = self.conn.execute("DELETE FROM animals WHERE id = ?1", params![id])?;
        log::debug!("Delete of animal {} affected {} row(s)", id, deleted);
        Ok(deleted)
    }

    fn list_all(&self) -> Result<Vec<Animal>, StoreError> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_ANIMAL} ORDER BY id"))?;
        let animals = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(animals)
    }

    fn paginate(&self, page: PageRequest) -> Result<Vec<Animal>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_ANIMAL} ORDER BY id LIMIT ?1 OFFSET ?2"))?;
        let animals = stmt
            .query_map(params![page.per_page(), page.offset()], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(animals)
    }

    fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM animals", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn search_paginate(&self, term: &str, page: PageRequest) -> Result<Vec<Animal>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_ANIMAL} WHERE {SEARCH_FILTER} ORDER BY id LIMIT ?2 OFFSET ?3"
        ))?;
        let animals = stmt
            .query_map(params![like_pattern(term), page.per_page(), page.offset()], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(animals)
    }

    fn count_search(&self, term: &str) -> Result<u64, StoreError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM animals WHERE {SEARCH_FILTER}"),
            params![like_pattern(term)],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
