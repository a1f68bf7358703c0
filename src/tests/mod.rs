//! End-to-end tests of the upload to visualizer flow.
//!
//! These drive [`PlanviewApp`](crate::PlanviewApp) the way a host does:
//! deliver messages, serve read requests, and tick with explicit instants.

mod handoff_flow_tests;

use std::time::Duration;

use web_time::Instant;

use crate::app::PlanviewApp;
use crate::config::AppConfig;
use crate::handoff::MemorySessionStore;
use crate::message::Message;
use crate::model::SelectedFile;

pub(crate) fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// A 1 KiB file that looks like a PNG by name.
pub(crate) fn png_1k(name: &str) -> SelectedFile {
    let mut bytes = vec![0u8; 1024];
    bytes[..4].copy_from_slice(&[0x89, b'P', b'N', b'G']);
    SelectedFile::from_bytes(name, bytes)
}

pub(crate) fn signed_in_app(now: Instant) -> PlanviewApp {
    let mut app = PlanviewApp::new(AppConfig::default(), MemorySessionStore::new());
    app.update(Message::SignedInChanged(true), now);
    app
}

/// Perform the pending read, if any, completing it at `now`.
pub(crate) fn serve_read(app: &mut PlanviewApp, now: Instant) -> bool {
    let Some(request) = app.take_read_request() else {
        return false;
    };
    let result = request.file.source().read_blocking();
    app.update(Message::ReadFinished(request.ticket, result), now);
    true
}
