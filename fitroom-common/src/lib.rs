// fitroom-common/src/lib.rs

pub mod error;
pub mod models;
pub mod traits;

pub use error::{Error, Result};
pub use models::garment::{Category, GarmentRef};
pub use models::tryon::{FailureReason, ResultImage, TryOnRequest, TryOnState};
