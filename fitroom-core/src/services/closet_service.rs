//! Garment inventory client.
//!
//! The backend is authoritative: the local list is only ever replaced
//! wholesale with what the server returned, never merged or appended by
//! guesswork.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use fitroom_common::error::Result;
use fitroom_common::models::garment::GarmentRef;
use fitroom_common::traits::FittingBackend;

use crate::eventbus::{EventBus, FittingEvent};

pub struct ClosetService {
    backend: Arc<dyn FittingBackend>,
    event_bus: Arc<EventBus>,
    garments: RwLock<Vec<GarmentRef>>,
}

impl ClosetService {
    pub fn new(backend: Arc<dyn FittingBackend>, event_bus: Arc<EventBus>) -> Self {
        Self {
            backend,
            event_bus,
            garments: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of the current inventory, in server-declared order.
    pub async fn garments(&self) -> Vec<GarmentRef> {
        self.garments.read().await.clone()
    }

    /// Fetch the backend inventory and replace the local list.
    ///
    /// On failure the previous list is left untouched so readers keep a
    /// stale-but-consistent view, and the error is surfaced to the
    /// caller.
    pub async fn refresh(&self) -> Result<Vec<GarmentRef>> {
        match self.backend.list_garments().await {
            Ok(list) => {
                debug!("Inventory replaced with {} garments", list.len());
                *self.garments.write().await = list.clone();
                self.event_bus
                    .publish(FittingEvent::InventoryReplaced {
                        garments: list.clone(),
                    })
                    .await;
                Ok(list)
            }
            Err(err) => {
                warn!("Inventory fetch failed, keeping previous list: {}", err);
                Err(err)
            }
        }
    }

    /// Upload a new garment image, then re-fetch the inventory so the
    /// local list reflects server truth including the new entry.
    pub async fn upload(&self, file_name: &str, image: Vec<u8>) -> Result<Vec<GarmentRef>> {
        self.backend.upload_garment(file_name, image).await?;
        info!("Garment {} uploaded, refreshing inventory", file_name);
        self.refresh().await
    }
}
