pub mod builder;
pub mod description;
pub mod render;
