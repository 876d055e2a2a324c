pub mod frames;
pub mod images;
