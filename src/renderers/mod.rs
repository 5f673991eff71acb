pub mod renderer;
pub mod simple;
