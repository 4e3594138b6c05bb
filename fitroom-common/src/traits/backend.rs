use async_trait::async_trait;

use crate::error::Error;
use crate::models::garment::GarmentRef;
use crate::models::tryon::{ResultImage, TryOnRequest};

/// Seam between the workflow core and the fitting backend.
///
/// `fitroom-api` provides the HTTP implementation; tests substitute mocks.
#[async_trait]
pub trait FittingBackend: Send + Sync {
    /// Full inventory of stored garments, in server-declared order.
    async fn list_garments(&self) -> Result<Vec<GarmentRef>, Error>;

    /// Store a new garment image. The success body is unspecified, so no
    /// locator is returned; callers re-list to pick up the new entry.
    async fn upload_garment(&self, file_name: &str, image: Vec<u8>) -> Result<(), Error>;

    /// Request one composited try-on image.
    async fn try_on(&self, request: TryOnRequest) -> Result<ResultImage, Error>;
}
