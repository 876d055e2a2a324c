pub mod access;
pub mod ownership;
pub mod policy;
