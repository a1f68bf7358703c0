//! planview - floor plan upload and visualizer
//!
//! Ingests a single image file, runs a simulated analysis progress bar, and
//! hands the encoded image to a visualizer view in a way that survives both
//! client-side navigation and a page reload. Runs natively and in the browser.

pub mod app;
pub mod capability;
pub mod config;
pub mod constants;
pub mod handoff;
pub mod ingest;
pub mod message;
pub mod model;
pub mod progress;
pub mod upload;
pub mod visualizer;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;

#[cfg(test)]
mod tests;

pub use app::{PlanviewApp, View};
pub use capability::Capability;
pub use config::AppConfig;
pub use handoff::{HandoffChannel, MemorySessionStore, Navigation, Route, SessionKey, SessionStore};
pub use ingest::IngestionEngine;
pub use model::{EncodedImage, SelectedFile};
pub use progress::{Phase, ProgressSimulator, ProgressTiming, ProgressValue};
pub use visualizer::{Visualizer, VisualizerView};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
mod wasm_file;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
