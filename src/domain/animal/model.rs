use serde::{Deserialize, Serialize};

/// A registry entry as stored in the `animals` table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Animal {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub email: String,
    pub address: String,
    pub city: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
}

/// Validated field set accepted by the store for inserts and updates.
///
/// Only `validation::check` builds one from user input, so every value here
/// is trimmed and within its column limits.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewAnimal {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: i64,
    pub description: Option<String>,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

/// Raw form submission. Fields missing from the request body are empty.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AnimalForm {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: String,
    pub description: String,
    pub email: String,
    pub address: String,
    pub city: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
}

impl From<&Animal> for AnimalForm {
    fn from(animal: &Animal) -> Self {
        AnimalForm {
            name: animal.name.clone(),
            species: animal.species.clone(),
            breed: animal.breed.clone(),
            age: animal.age.to_string(),
            description: animal.description.clone().unwrap_or_default(),
            email: animal.email.clone(),
            address: animal.address.clone(),
            city: animal.city.clone(),
            postal_code: animal.postal_code.clone(),
        }
    }
}

impl Animal {
    pub fn from_new(id: i64, animal: NewAnimal) -> Self {
        Animal {
            id,
            name: animal.name,
            species: animal.species,
            breed: animal.breed,
            age: animal.age,
            description: animal.description,
            email: animal.email,
            address: animal.address,
            city: animal.city,
            postal_code: animal.postal_code,
        }
    }
}

/// Largest page size a caller may ask for.
pub const MAX_PER_PAGE: i64 = 100;

/// Offset pagination parameters. Both values are at least 1 and `per_page`
/// is capped at [`MAX_PER_PAGE`], so the offset always fits an SQL integer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Self {
        PageRequest {
            page: clamp_positive(page),
            per_page: per_page.clamp(1, MAX_PER_PAGE) as u32,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

fn clamp_positive(value: i64) -> u32 {
    value.clamp(1, i64::from(u32::MAX)) as u32
}

/// One page of results together with the totals needed to render pagination.
#[derive(Serialize, Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let per_page = u64::from(request.per_page());
        Page {
            items,
            page: request.page(),
            per_page: request.per_page(),
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(1, 4).offset(), 0);
        assert_eq!(PageRequest::new(2, 4).offset(), 4);
        assert_eq!(PageRequest::new(3, 9).offset(), 18);
    }

    #[test]
    fn test_page_request_clamps_to_one() {
        let request = PageRequest::new(0, -5);
        assert_eq!(request.page(), 1);
        assert_eq!(request.per_page(), 1);
        assert_eq!(request.offset(), 0);

        let request = PageRequest::new(-3, 9);
        assert_eq!(request.page(), 1);
        assert_eq!(request.per_page(), 9);
    }

    #[test]
    fn test_page_request_caps_large_values() {
        let request = PageRequest::new(i64::MAX, i64::MAX);
        assert_eq!(request.page(), u32::MAX);
        assert_eq!(request.per_page(), MAX_PER_PAGE as u32);
        assert_eq!(request.offset(), i64::from(u32::MAX - 1) * MAX_PER_PAGE);
        assert!(request.offset() > 0);
    }

    #[test]
    fn test_page_total_pages() {
        let page: Page<i64> = Page::new(vec![], PageRequest::new(1, 9), 0);
        assert_eq!(page.total_pages, 0);

        let page: Page<i64> = Page::new(vec![], PageRequest::new(1, 9), 9);
        assert_eq!(page.total_pages, 1);

        let page: Page<i64> = Page::new(vec![], PageRequest::new(1, 9), 10);
        assert_eq!(page.total_pages, 2);

        let page: Page<i64> = Page::new(vec![], PageRequest::new(2, 4), 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn test_form_deserializes_with_missing_fields() {
        let form: AnimalForm = serde_json::from_str(r#"{"name": "Rex", "postalCode": "75000"}"#).unwrap();
        assert_eq!(form.name, "Rex");
        assert_eq!(form.postal_code, "75000");
        assert!(form.email.is_empty());
        assert!(form.age.is_empty());
    }

    #[test]
    fn test_form_from_animal() {
        let animal = Animal {
            id: 3,
            name: "Rex".to_string(),
            species: "Dog".to_string(),
            breed: "Beagle".to_string(),
            age: 4,
            description: None,
            email: "rex@example.com".to_string(),
            address: "1 rue de la Paix".to_string(),
            city: "Paris".to_string(),
            postal_code: "75002".to_string(),
        };

        let form = AnimalForm::from(&animal);
        assert_eq!(form.age, "4");
        assert_eq!(form.description, "");
        assert_eq!(form.postal_code, "75002");
    }
}
