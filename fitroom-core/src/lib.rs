// src/lib.rs

pub mod eventbus;
pub mod preview;
pub mod selection;
pub mod services;

pub use eventbus::{EventBus, FittingEvent};
pub use fitroom_common::error::{Error, Result};
pub use preview::{PreviewHandle, PreviewRegistry, PERSON_PHOTO_SLOT};
pub use selection::{PersonPhoto, Selection};
pub use services::closet_service::ClosetService;
pub use services::fitting_service::FittingService;
pub use services::tryon_service::TryOnOrchestrator;
