//! Workflow facade: wires selection state, preview lifecycle, closet and
//! orchestrator together the way the presentation layer consumes them.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use fitroom_api::{FittingApiClient, FittingApiConfig};
use fitroom_common::error::{Error, Result};
use fitroom_common::models::garment::{Category, GarmentRef};
use fitroom_common::models::tryon::{TryOnRequest, TryOnState};
use fitroom_common::traits::FittingBackend;

use crate::eventbus::{EventBus, FittingEvent};
use crate::preview::{PreviewHandle, PreviewRegistry, PERSON_PHOTO_SLOT};
use crate::selection::{PersonPhoto, Selection};
use crate::services::closet_service::ClosetService;
use crate::services::tryon_service::TryOnOrchestrator;

pub struct FittingService {
    closet: Arc<ClosetService>,
    orchestrator: Arc<TryOnOrchestrator>,
    previews: Arc<PreviewRegistry>,
    selection: Mutex<Selection>,
    event_bus: Arc<EventBus>,
}

impl FittingService {
    pub fn new(backend: Arc<dyn FittingBackend>, event_bus: Arc<EventBus>) -> Self {
        Self {
            closet: Arc::new(ClosetService::new(backend.clone(), event_bus.clone())),
            orchestrator: Arc::new(TryOnOrchestrator::new(backend, event_bus.clone())),
            previews: Arc::new(PreviewRegistry::new()),
            selection: Mutex::new(Selection::new()),
            event_bus,
        }
    }

    /// Convenience constructor over the HTTP backend.
    pub fn with_http_backend(config: FittingApiConfig, event_bus: Arc<EventBus>) -> Result<Self> {
        let backend = Arc::new(FittingApiClient::new(config)?);
        Ok(Self::new(backend, event_bus))
    }

    pub fn closet(&self) -> Arc<ClosetService> {
        self.closet.clone()
    }

    pub fn orchestrator(&self) -> Arc<TryOnOrchestrator> {
        self.orchestrator.clone()
    }

    pub fn previews(&self) -> Arc<PreviewRegistry> {
        self.previews.clone()
    }

    /// Pick a garment from the closet.
    ///
    /// Deliberately does not clear a terminal try-on result: the garment
    /// choice is reconsidered independently of the photo, and only a
    /// photo change invalidates the composited image.
    pub async fn select_garment(&self, garment: GarmentRef) {
        {
            let mut selection = self.selection.lock().await;
            selection.set_garment(garment.clone());
        }
        self.event_bus
            .publish(FittingEvent::GarmentSelected(garment))
            .await;
    }

    /// Supply a new person photo.
    ///
    /// The superseded preview handle (if any) is revoked before the new
    /// one is live, and any terminal try-on result is cleared: it was
    /// composited against the old photo.
    pub async fn select_photo(&self, file_name: impl Into<String>, data: Vec<u8>) -> PreviewHandle {
        let file_name = file_name.into();
        let data = Arc::new(data);
        let handle = self.previews.acquire(PERSON_PHOTO_SLOT, data.clone()).await;

        let superseded = {
            let mut selection = self.selection.lock().await;
            selection.set_photo(PersonPhoto::new(data, file_name.clone(), handle.clone()))
        };
        if let Some(old) = superseded {
            // The registry already revoked it on acquire; this only
            // covers a photo whose handle lived in a different slot.
            self.previews.release(old.preview()).await;
            debug!("Superseded person photo {}", old.file_name());
        }

        self.orchestrator.clear_result().await;
        self.event_bus
            .publish(FittingEvent::PhotoSelected { file_name })
            .await;
        handle
    }

    pub async fn set_category(&self, category: Category) {
        {
            let mut selection = self.selection.lock().await;
            selection.set_category(category);
        }
        self.event_bus
            .publish(FittingEvent::CategoryChanged(category))
            .await;
    }

    pub async fn selected_garment(&self) -> Option<GarmentRef> {
        self.selection.lock().await.garment().cloned()
    }

    pub async fn category(&self) -> Category {
        self.selection.lock().await.category()
    }

    pub async fn is_selection_complete(&self) -> bool {
        self.selection.lock().await.is_complete()
    }

    /// Submit the current selection for synthesis.
    ///
    /// Rejected without dispatching anything if the selection is
    /// incomplete or a request is already in flight.
    pub async fn submit(&self) -> Result<TryOnState> {
        let request = {
            let selection = self.selection.lock().await;
            let garment = selection
                .garment()
                .cloned()
                .ok_or_else(|| Error::IncompleteSelection("no garment selected".to_string()))?;
            let photo = selection
                .photo()
                .ok_or_else(|| Error::IncompleteSelection("no person photo selected".to_string()))?;
            TryOnRequest {
                person_image: photo.data().to_vec(),
                file_name: photo.file_name().to_string(),
                cloth_url: garment,
                category: selection.category(),
            }
        };
        self.orchestrator.submit(request).await
    }

    /// Tear the workflow down: selection, previews and request cycle.
    ///
    /// An in-flight response is discarded via the generation bump in
    /// [`TryOnOrchestrator::reset`].
    pub async fn reset(&self) {
        let superseded = {
            let mut selection = self.selection.lock().await;
            selection.clear()
        };
        if let Some(photo) = superseded {
            self.previews.release(photo.preview()).await;
        }
        self.previews.clear().await;
        self.orchestrator.reset().await;
    }
}
