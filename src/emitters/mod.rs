pub mod background;
pub mod quad;
