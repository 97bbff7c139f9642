pub mod analysis;
pub mod config;
pub mod context;
pub mod display;
pub mod import;
