// File: fitroom-common/src/models/mod.rs
pub mod garment;
pub mod tryon;

pub use garment::{Category, GarmentRef};
pub use tryon::{FailureReason, ResultImage, TryOnRequest, TryOnResponse, TryOnState};
