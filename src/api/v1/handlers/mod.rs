pub mod frames;
pub mod health;
pub mod images;
