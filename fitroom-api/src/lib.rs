pub mod client;
pub mod models;

pub use client::FittingApiClient;
pub use models::FittingApiConfig;
