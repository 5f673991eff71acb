pub mod constant;
pub mod image;
