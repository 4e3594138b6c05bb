pub mod closet_service;
pub mod fitting_service;
pub mod tryon_service;

pub use closet_service::ClosetService;
pub use fitting_service::FittingService;
pub use tryon_service::TryOnOrchestrator;
