pub mod animal_handlers;
