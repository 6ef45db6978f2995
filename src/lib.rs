pub mod app;
pub mod camera;
pub mod config;
pub mod mirror;
pub mod params;
pub mod render;
pub mod scene;
pub mod share;
pub mod terminal;
pub mod visual;
