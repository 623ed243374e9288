//! Per-frame snapshot read by the overlays.

use serde::Serialize;

use crate::gallery::GalleryItem;
use crate::modal::ModalState;
use crate::shared_element::DetailFrame;
use crate::split_reveal::SplitPanels;

/// What the modal overlay renders this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalFrame {
    /// Phase, image rectangle and content visibility.
    #[serde(flatten)]
    pub state: ModalState,
    /// Previous project in the gallery, wrapping around.
    pub previous: Option<GalleryItem>,
    /// Next project in the gallery, wrapping around.
    pub next: Option<GalleryItem>,
}

/// Everything the overlays need to draw at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Whether pages should play their exit variants.
    pub is_exiting: bool,
    /// Eased page-exit progress.
    pub exit_progress: Option<f32>,
    /// Split-reveal cover panels.
    pub split: Option<SplitPanels>,
    /// Project modal.
    pub modal: Option<ModalFrame>,
    /// Detail-route morph.
    pub detail: Option<DetailFrame>,
    /// Gallery thumbnail to hide while its image is in an overlay.
    pub hidden_thumbnail: Option<String>,
    /// Whether the smooth-scroll engine is suspended.
    pub scroll_suspended: bool,
}

impl Frame {
    /// Whether any overlay draws anything.
    #[must_use]
    pub fn has_overlay(&self) -> bool {
        self.split.is_some() || self.modal.is_some() || self.detail.is_some()
    }

    /// JSON for hosts that consume the frame across a JS boundary.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
