//! Upload panel: the dropzone and status view around the ingestion engine.
//!
//! Handles the user gestures (picker change, drag enter/over/leave, drop),
//! keeps the drag-hover flag, and turns engine state into what the panel
//! shows. Failures from the engine are logged and dropped here; the user
//! only ever sees the panel return to the dropzone.

use web_time::Instant;

use crate::capability::Capability;
use crate::config::UploadConfig;
use crate::ingest::{IngestError, IngestionEngine, ReadRequest, ReadTicket, Rejection};
use crate::model::{EncodedImage, ReadError, SelectedFile};
use crate::progress::ProgressTiming;

/// Prompt shown when the user may upload.
pub const PROMPT_SIGNED_IN: &str = "Click to upload or just drag and drop";
/// Prompt shown when the user is signed out.
pub const PROMPT_SIGNED_OUT: &str = "Sign in or sign up to upload";
/// Status while the simulated analysis runs.
pub const STATUS_ANALYZING: &str = "Analyzing floor plan...";
/// Status once progress hit 100.
pub const STATUS_REDIRECTING: &str = "Redirecting...";

/// Drag-and-drop gestures over the dropzone.
#[derive(Debug, Clone)]
pub enum DragGesture {
    Enter,
    Over,
    Leave,
    Drop(Vec<SelectedFile>),
}

/// What the panel renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadView {
    /// No file selected yet
    Dropzone {
        enabled: bool,
        dragging: bool,
        prompt: &'static str,
        help: String,
        accept: String,
    },
    /// A file is being analyzed
    Status {
        file_name: String,
        progress: u8,
        label: &'static str,
        complete: bool,
    },
}

/// The upload panel's state.
#[derive(Debug)]
pub struct UploadPanel {
    engine: IngestionEngine,
    dragging: bool,
}

impl UploadPanel {
    pub fn new(timing: ProgressTiming, upload: &UploadConfig) -> Self {
        Self {
            engine: IngestionEngine::new(timing).with_hints(upload.hints(), upload.enforce_limits),
            dragging: false,
        }
    }

    /// Number read tickets after `cycle`, the last one issued by the panel
    /// this one replaces.
    pub fn starting_after(mut self, cycle: u64) -> Self {
        self.engine = self.engine.starting_after(cycle);
        self
    }

    /// Files chosen through the picker. Only the first one is used.
    pub fn pick(&mut self, files: Vec<SelectedFile>, capability: Capability) {
        if !capability.allows_ingestion() {
            return;
        }
        if let Some(file) = files.into_iter().next() {
            self.submit(file, capability);
        }
    }

    /// A drag-and-drop gesture.
    pub fn drag(&mut self, gesture: DragGesture, capability: Capability) {
        match gesture {
            DragGesture::Enter | DragGesture::Over => {
                if capability.allows_ingestion() {
                    self.dragging = true;
                }
            }
            DragGesture::Leave => self.dragging = false,
            DragGesture::Drop(files) => {
                self.dragging = false;
                if !capability.allows_ingestion() {
                    return;
                }
                if let Some(file) = files.into_iter().next() {
                    self.submit(file, capability);
                }
            }
        }
    }

    fn submit(&mut self, file: SelectedFile, capability: Capability) {
        match self.engine.submit(file, capability) {
            Ok(_) => {}
            Err(Rejection::CapabilityDenied) => {}
            Err(e) => log::debug!("Upload: ignored submission: {}", e),
        }
    }

    /// The read the host should perform next, if any.
    pub fn take_read_request(&mut self) -> Option<ReadRequest> {
        self.engine.take_read_request()
    }

    /// Deliver a read result from the host.
    pub fn read_finished(
        &mut self,
        ticket: ReadTicket,
        result: Result<Vec<u8>, ReadError>,
        now: Instant,
    ) {
        match self.engine.finish_read(ticket, result, now) {
            Ok(()) => {}
            Err(IngestError::Stale(ticket)) => {
                log::debug!("Upload: dropped stale read for cycle {}", ticket.cycle());
            }
            Err(e) => log::warn!("Upload: {}, back to dropzone", e),
        }
    }

    /// Advance timers; returns the image when analysis is done.
    pub fn tick(&mut self, now: Instant) -> Option<EncodedImage> {
        self.engine.tick(now)
    }

    /// Cancel all timers and the in-flight read.
    pub fn teardown(&mut self) {
        self.dragging = false;
        self.engine.teardown();
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn engine(&self) -> &IngestionEngine {
        &self.engine
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.engine.next_deadline()
    }

    pub fn view(&self, capability: Capability) -> UploadView {
        match self.engine.selected_file() {
            None => {
                let enabled = capability.allows_ingestion();
                let hints = self.engine.hints();
                UploadView::Dropzone {
                    enabled,
                    dragging: self.dragging,
                    prompt: if enabled {
                        PROMPT_SIGNED_IN
                    } else {
                        PROMPT_SIGNED_OUT
                    },
                    help: hints.help_text(),
                    accept: hints.accept_attribute(),
                }
            }
            Some(file) => {
                let progress = self.engine.progress();
                UploadView::Status {
                    file_name: file.name().to_string(),
                    progress: progress.get(),
                    label: if progress.is_complete() {
                        STATUS_REDIRECTING
                    } else {
                        STATUS_ANALYZING
                    },
                    complete: progress.is_complete(),
                }
            }
        }
    }
}

impl Default for UploadPanel {
    fn default() -> Self {
        Self::new(ProgressTiming::default(), &UploadConfig::default())
    }
}
