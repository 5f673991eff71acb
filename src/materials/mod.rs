pub mod disney;
pub mod microfacet;
pub mod params;
