pub mod error;
pub mod image_repo;
