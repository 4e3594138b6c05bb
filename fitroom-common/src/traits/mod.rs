// File: fitroom-common/src/traits/mod.rs
pub mod backend;

pub use backend::FittingBackend;
