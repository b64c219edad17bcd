pub mod index;
pub mod readings;
