//! Current user selection: garment, person photo, body-region category.

use std::sync::Arc;

use fitroom_common::models::garment::{Category, GarmentRef};

use crate::preview::PreviewHandle;

/// The user's uploaded photo plus its live preview handle.
///
/// Created on file selection; superseded when a new photo is picked (the
/// old preview handle is released by the service layer); destroyed on
/// workflow reset.
#[derive(Debug, Clone)]
pub struct PersonPhoto {
    data: Arc<Vec<u8>>,
    file_name: String,
    preview: PreviewHandle,
}

impl PersonPhoto {
    pub fn new(data: Arc<Vec<u8>>, file_name: impl Into<String>, preview: PreviewHandle) -> Self {
        Self {
            data,
            file_name: file_name.into(),
            preview,
        }
    }

    pub fn data(&self) -> &Arc<Vec<u8>> {
        &self.data
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// Pure state container for the fitting selection.
///
/// Mutation happens through the service layer, which pairs photo changes
/// with preview release and result invalidation.
#[derive(Debug, Default)]
pub struct Selection {
    garment: Option<GarmentRef>,
    photo: Option<PersonPhoto>,
    category: Category,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_garment(&mut self, garment: GarmentRef) {
        self.garment = Some(garment);
    }

    /// Replace the photo, returning the superseded one so its preview
    /// handle can be released.
    pub fn set_photo(&mut self, photo: PersonPhoto) -> Option<PersonPhoto> {
        self.photo.replace(photo)
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn garment(&self) -> Option<&GarmentRef> {
        self.garment.as_ref()
    }

    pub fn photo(&self) -> Option<&PersonPhoto> {
        self.photo.as_ref()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// A try-on request is permitted only when both garment and photo
    /// are present.
    pub fn is_complete(&self) -> bool {
        self.garment.is_some() && self.photo.is_some()
    }

    /// Drop everything back to defaults, returning the photo (if any)
    /// for preview release.
    pub fn clear(&mut self) -> Option<PersonPhoto> {
        self.garment = None;
        self.category = Category::default();
        self.photo.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::{PreviewRegistry, PERSON_PHOTO_SLOT};

    async fn photo(registry: &PreviewRegistry, bytes: &[u8]) -> PersonPhoto {
        let data = Arc::new(bytes.to_vec());
        let handle = registry.acquire(PERSON_PHOTO_SLOT, data.clone()).await;
        PersonPhoto::new(data, "photo.png", handle)
    }

    #[tokio::test]
    async fn completeness_needs_both_garment_and_photo() {
        let registry = PreviewRegistry::new();
        let mut selection = Selection::new();
        assert!(!selection.is_complete());

        selection.set_garment(GarmentRef::new("g1"));
        assert!(!selection.is_complete());

        selection.set_photo(photo(&registry, b"P").await);
        assert!(selection.is_complete());
    }

    #[tokio::test]
    async fn set_photo_hands_back_the_superseded_one() {
        let registry = PreviewRegistry::new();
        let mut selection = Selection::new();

        assert!(selection.set_photo(photo(&registry, b"one").await).is_none());
        let superseded = selection
            .set_photo(photo(&registry, b"two").await)
            .expect("first photo should be handed back");
        assert_eq!(superseded.data().as_slice(), b"one".as_slice());
    }

    #[tokio::test]
    async fn clear_resets_category_to_default() {
        let registry = PreviewRegistry::new();
        let mut selection = Selection::new();
        selection.set_garment(GarmentRef::new("g1"));
        selection.set_photo(photo(&registry, b"P").await);
        selection.set_category(Category::LowerBody);

        let removed = selection.clear();
        assert!(removed.is_some());
        assert!(!selection.is_complete());
        assert_eq!(selection.category(), Category::UpperBody);
    }
}
