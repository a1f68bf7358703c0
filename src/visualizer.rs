//! Visualizer view.
//!
//! Shows the handed-off image as-is, or an empty state whose only action
//! leads back to the upload page.

use crate::handoff::{HandoffChannel, Navigation, NavigationState, SessionKey};
use crate::model::EncodedImage;

pub const EMPTY_TITLE: &str = "No image available";
pub const EMPTY_MESSAGE: &str = "We couldn't find an uploaded image for this session. \
     Please go back and upload a floor plan.";
pub const BACK_LABEL: &str = "Go to Home";
pub const IMAGE_ALT: &str = "Uploaded floor plan";

/// What the visualizer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualizerView {
    Image {
        image: EncodedImage,
        alt: &'static str,
    },
    Empty {
        title: &'static str,
        message: &'static str,
        action_label: &'static str,
    },
}

/// A mounted visualizer instance.
#[derive(Debug, Clone)]
pub struct Visualizer {
    key: SessionKey,
    image: Option<EncodedImage>,
}

impl Visualizer {
    /// Resolve the image for `key` from navigation state or the session store.
    pub fn resolve(
        key: SessionKey,
        state: Option<&NavigationState>,
        channel: &HandoffChannel,
    ) -> Self {
        let image = channel.retrieve(&key, state);
        match &image {
            Some(image) => log::info!("Visualizer {}: showing {:?}", key, image),
            None => log::info!("Visualizer {}: no image, showing empty state", key),
        }
        Self { key, image }
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn image(&self) -> Option<&EncodedImage> {
        self.image.as_ref()
    }

    pub fn view(&self) -> VisualizerView {
        match &self.image {
            Some(image) => VisualizerView::Image {
                image: image.clone(),
                alt: IMAGE_ALT,
            },
            None => VisualizerView::Empty {
                title: EMPTY_TITLE,
                message: EMPTY_MESSAGE,
                action_label: BACK_LABEL,
            },
        }
    }

    /// The empty state's recovery action.
    pub fn go_back(&self) -> Navigation {
        Navigation::home()
    }
}
