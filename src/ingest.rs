//! File ingestion engine.
//!
//! One ingestion cycle runs from a submission to its completion, its read
//! failure, or its supersession by the next submission:
//!
//! 1. `submit` stores the file and requests an asynchronous read from the host
//! 2. The host reads the bytes and reports back through `finish_read`
//! 3. The bytes are encoded as a data URI and the progress simulator starts
//! 4. `tick` polls the simulator and yields the image once it is released
//!
//! Every cycle gets a fresh [`ReadTicket`]. A read reported with an older
//! ticket belongs to a superseded cycle and is dropped.

use web_time::Instant;

use crate::capability::Capability;
use crate::model::{EncodedImage, PickerHints, ReadError, SelectedFile};
use crate::progress::{Phase, ProgressSimulator, ProgressTiming, ProgressValue};

/// Identifies the read belonging to one ingestion cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadTicket(u64);

impl ReadTicket {
    pub fn cycle(self) -> u64 {
        self.0
    }
}

/// A read the host has to perform.
#[derive(Debug, Clone)]
pub struct ReadRequest {
    pub ticket: ReadTicket,
    pub file: SelectedFile,
}

/// Why a submission was not accepted. Never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("ingestion not permitted")]
    CapabilityDenied,

    #[error("{name} is outside the accepted types or size")]
    OutsideHints { name: String },
}

/// Failures after a submission was accepted. Never shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The read belongs to a superseded or torn-down cycle
    #[error("stale read for cycle {}", .0.cycle())]
    Stale(ReadTicket),

    /// Reading the file failed; the engine was reset
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: ReadError,
    },
}

/// Single-file ingestion with simulated analysis progress.
#[derive(Debug)]
pub struct IngestionEngine {
    simulator: ProgressSimulator,
    hints: PickerHints,
    enforce_hints: bool,
    cycle: u64,
    current: Option<SelectedFile>,
    in_flight: Option<ReadTicket>,
    read_request: Option<ReadRequest>,
    encoded: Option<EncodedImage>,
    last_failure: Option<String>,
}

impl IngestionEngine {
    pub fn new(timing: ProgressTiming) -> Self {
        Self {
            simulator: ProgressSimulator::new(timing),
            hints: PickerHints::default(),
            enforce_hints: false,
            cycle: 0,
            current: None,
            in_flight: None,
            read_request: None,
            encoded: None,
            last_failure: None,
        }
    }

    /// Use these picker hints, rejecting files outside them when `enforce` is set.
    pub fn with_hints(mut self, hints: PickerHints, enforce: bool) -> Self {
        self.hints = hints;
        self.enforce_hints = enforce;
        self
    }

    /// Continue ticket numbering after `cycle`, so tickets from an engine
    /// this one replaces never match its own.
    pub fn starting_after(mut self, cycle: u64) -> Self {
        self.cycle = self.cycle.max(cycle);
        self
    }

    pub fn hints(&self) -> &PickerHints {
        &self.hints
    }

    /// Number of the most recent cycle.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Start a new cycle for `file`.
    ///
    /// Without capability this changes nothing. Otherwise the previous cycle
    /// is cancelled before anything of the new one is armed.
    pub fn submit(
        &mut self,
        file: SelectedFile,
        capability: Capability,
    ) -> Result<ReadTicket, Rejection> {
        if !capability.allows_ingestion() {
            return Err(Rejection::CapabilityDenied);
        }
        if self.enforce_hints && !self.hints.permits(&file) {
            return Err(Rejection::OutsideHints {
                name: file.name().to_string(),
            });
        }

        if self.simulator.cancel() || self.in_flight.is_some() {
            log::debug!("Ingest: cycle {} superseded", self.cycle);
        }

        self.cycle += 1;
        let ticket = ReadTicket(self.cycle);
        log::info!(
            "📂 Ingest: cycle {} reading {} ({})",
            ticket.cycle(),
            file.name(),
            file.media_type()
        );

        self.encoded = None;
        self.in_flight = Some(ticket);
        self.read_request = Some(ReadRequest {
            ticket,
            file: file.clone(),
        });
        self.current = Some(file);
        Ok(ticket)
    }

    /// Take the pending read so the host can perform it.
    pub fn take_read_request(&mut self) -> Option<ReadRequest> {
        self.read_request.take()
    }

    /// Report the outcome of a read.
    ///
    /// Success encodes the bytes and starts the simulator at `now`. Failure
    /// resets the engine to its pre-selection state.
    pub fn finish_read(
        &mut self,
        ticket: ReadTicket,
        result: Result<Vec<u8>, ReadError>,
        now: Instant,
    ) -> Result<(), IngestError> {
        if self.in_flight != Some(ticket) {
            return Err(IngestError::Stale(ticket));
        }
        self.in_flight = None;

        let file = self.current.as_ref().ok_or(IngestError::Stale(ticket))?;

        match result {
            Ok(bytes) => {
                let image = EncodedImage::encode(file.media_type(), &bytes);
                log::info!(
                    "📂 Ingest: {} read, {} bytes encoded",
                    file.name(),
                    bytes.len()
                );
                self.encoded = Some(image.clone());
                self.simulator.start(image, now);
                Ok(())
            }
            Err(source) => {
                let name = file.name().to_string();
                self.reset();
                let error = IngestError::Read { name, source };
                self.last_failure = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Poll the simulator; returns the image when it is released.
    pub fn tick(&mut self, now: Instant) -> Option<EncodedImage> {
        let released = self.simulator.poll(now);
        if released.is_some() {
            log::info!("Ingest: cycle {} complete", self.cycle);
        }
        released
    }

    /// Cancel everything, as when the hosting view goes away.
    pub fn teardown(&mut self) {
        if self.simulator.has_active_timer() || self.in_flight.is_some() {
            log::debug!("Ingest: torn down during cycle {}", self.cycle);
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.simulator.cancel();
        self.current = None;
        self.encoded = None;
        self.in_flight = None;
        self.read_request = None;
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.current.as_ref()
    }

    pub fn encoded_image(&self) -> Option<&EncodedImage> {
        self.encoded.as_ref()
    }

    pub fn progress(&self) -> ProgressValue {
        self.simulator.value()
    }

    pub fn phase(&self) -> Phase {
        self.simulator.phase()
    }

    pub fn is_reading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_active_timer(&self) -> bool {
        self.simulator.has_active_timer()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.simulator.next_deadline()
    }

    /// Description of the most recent read failure, for diagnostics.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }
}

impl Default for IngestionEngine {
    fn default() -> Self {
        Self::new(ProgressTiming::default())
    }
}
