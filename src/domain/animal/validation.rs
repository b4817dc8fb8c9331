//! Field rules for animal registration and update forms.
//!
//! Every field is checked independently, so a single submission reports all
//! of its problems at once. The result is a map from form field name to a
//! human readable message; an empty map means the form is valid.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::animal::model::{AnimalForm, NewAnimal};

pub const NAME_MAX: usize = 25;
pub const SPECIES_MAX: usize = 25;
pub const BREED_MAX: usize = 25;
pub const DESCRIPTION_MAX: usize = 500;
pub const EMAIL_MAX: usize = 80;
pub const ADDRESS_MAX: usize = 75;
pub const CITY_MAX: usize = 75;
pub const POSTAL_CODE_LEN: usize = 5;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("email pattern compiles"))
}

/// Field name to message, ordered by field name.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Runs every rule against the form and collects the failures.
pub fn validate(form: &AnimalForm) -> ValidationErrors {
    run_rules(form).0
}

/// Applies every rule; the age is returned when it parsed.
fn run_rules(form: &AnimalForm) -> (ValidationErrors, Option<i64>) {
    let mut errors = ValidationErrors::new();

    required_text(&mut errors, "name", "Name", &form.name, NAME_MAX);
    required_text(&mut errors, "species", "Species", &form.species, SPECIES_MAX);
    required_text(&mut errors, "breed", "Breed", &form.breed, BREED_MAX);
    optional_text(&mut errors, "description", "Description", &form.description, DESCRIPTION_MAX);
    required_text(&mut errors, "address", "Address", &form.address, ADDRESS_MAX);
    required_text(&mut errors, "city", "City", &form.city, CITY_MAX);

    let age = match parse_age(&form.age) {
        Ok(age) => Some(age),
        Err(message) => {
            errors.insert("age", message);
            None
        }
    };
    if let Err(message) = check_email(&form.email) {
        errors.insert("email", message);
    }
    if let Err(message) = check_postal_code(&form.postal_code) {
        errors.insert("postalCode", message);
    }

    (errors, age)
}

/// Validates the form and, when it passes, returns the trimmed field set.
pub fn check(form: &AnimalForm) -> Result<NewAnimal, ValidationErrors> {
    let (errors, age) = run_rules(form);
    let age = match age {
        Some(age) if errors.is_empty() => age,
        _ => return Err(errors),
    };
    let description = form.description.trim();

    Ok(NewAnimal {
        name: form.name.trim().to_string(),
        species: form.species.trim().to_string(),
        breed: form.breed.trim().to_string(),
        age,
        description: (!description.is_empty()).then(|| description.to_string()),
        email: form.email.trim().to_string(),
        address: form.address.trim().to_string(),
        city: form.city.trim().to_string(),
        postal_code: form.postal_code.trim().to_string(),
    })
}

fn required_text(errors: &mut ValidationErrors, field: &'static str, label: &str, value: &str, max: usize) {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, format!("{label} is required."));
    } else if value.chars().count() > max {
        errors.insert(field, format!("{label} must not exceed {max} characters."));
    }
}

fn optional_text(errors: &mut ValidationErrors, field: &'static str, label: &str, value: &str, max: usize) {
    if value.trim().chars().count() > max {
        errors.insert(field, format!("{label} must not exceed {max} characters."));
    }
}

fn parse_age(raw: &str) -> Result<i64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Age is required.".to_string());
    }
    let age: i64 = raw.parse().map_err(|_| "Age must be an integer.".to_string())?;
    if age < 0 {
        return Err("Age must be a non-negative integer.".to_string());
    }
    Ok(age)
}

fn check_email(raw: &str) -> Result<(), String> {
    let email = raw.trim();
    if email.is_empty() {
        return Err("Email is required.".to_string());
    }
    if !email_regex().is_match(email) {
        return Err("Email format is invalid.".to_string());
    }
    if email.chars().count() > EMAIL_MAX {
        return Err(format!("Email must not exceed {EMAIL_MAX} characters."));
    }
    Ok(())
}

fn check_postal_code(raw: &str) -> Result<(), String> {
    let code = raw.trim();
    if code.is_empty() {
        return Err("Postal code is required.".to_string());
    }
    if code.len() != POSTAL_CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("Postal code must contain exactly {POSTAL_CODE_LEN} digits."));
    }
    Ok(())
}
