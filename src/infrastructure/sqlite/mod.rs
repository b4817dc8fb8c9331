pub mod animal_repository;
