pub mod config;
pub mod image;
pub mod preset;
pub mod project;
