pub mod animal;

pub use animal::model::{Animal, AnimalForm, NewAnimal, Page, PageRequest};
