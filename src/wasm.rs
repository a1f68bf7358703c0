use wasm_bindgen::prelude::*;
use web_time::Instant;

use crate::app::{PlanviewApp, View};
use crate::config::AppConfig;
use crate::handoff::BrowserSessionStore;
use crate::message::Message;
use crate::upload::UploadView;
use crate::visualizer::VisualizerView;
use crate::wasm_file::{selected_files, start_read, take_finished_reads};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let level = AppConfig::load_from_local_storage()
        .map(|config| config.preferences.log_level)
        .unwrap_or_default();
    if let Some(level) = level.to_level_filter().to_level() {
        if let Err(e) = console_log::init_with_level(level) {
            web_sys::console::log_1(&format!("Logger setup failed: {}", e).into());
        }
    }
    log::info!("planview WASM starting...");
}

/// The application as seen from JavaScript.
///
/// The page calls `tick()` from `requestAnimationFrame` and re-renders from
/// the getters.
#[wasm_bindgen]
pub struct WebApp {
    app: PlanviewApp,
}

#[wasm_bindgen]
impl WebApp {
    /// Mount the app for the current `location.pathname`.
    #[wasm_bindgen(constructor)]
    pub fn new(path: &str, signed_in: bool) -> WebApp {
        let config = AppConfig::load_from_local_storage().unwrap_or_default();
        let mut app = PlanviewApp::open(config, BrowserSessionStore::new(), path);
        app.update(Message::SignedInChanged(signed_in), Instant::now());
        WebApp { app }
    }

    pub fn set_signed_in(&mut self, signed_in: bool) {
        self.app
            .update(Message::SignedInChanged(signed_in), Instant::now());
    }

    /// `change` event of the file input.
    pub fn pick_files(&mut self, files: web_sys::FileList) {
        self.app
            .update(Message::FilesPicked(selected_files(&files)), Instant::now());
    }

    pub fn drag_enter(&mut self) {
        self.app.update(Message::DragEntered, Instant::now());
    }

    pub fn drag_over(&mut self) {
        self.app.update(Message::DragOver, Instant::now());
    }

    pub fn drag_leave(&mut self) {
        self.app.update(Message::DragLeft, Instant::now());
    }

    /// `drop` event of the dropzone.
    pub fn drop_files(&mut self, files: web_sys::FileList) {
        self.app
            .update(Message::FilesDropped(selected_files(&files)), Instant::now());
    }

    /// Advance reads and timers. Returns true when the route changed and the
    /// page should update `history`.
    pub fn tick(&mut self) -> bool {
        self.pump_reads();
        self.app.tick(Instant::now())
    }

    pub fn go_home(&mut self) {
        self.app.update(Message::GoHome, Instant::now());
    }

    pub fn reload(&mut self) {
        self.app.update(Message::Reload, Instant::now());
    }

    /// Persist the active configuration to localStorage.
    pub fn save_config(&self) {
        if let Err(e) = self.app.config().save_to_local_storage() {
            log::warn!("Failed to save config: {}", e);
        }
    }

    /// Unmount; call from `pagehide`.
    pub fn teardown(&mut self) {
        self.app.shutdown();
    }

    #[wasm_bindgen(getter)]
    pub fn route_path(&self) -> String {
        self.app.route().path()
    }

    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> u8 {
        match self.app.view() {
            View::Upload(UploadView::Status { progress, .. }) => progress,
            _ => 0,
        }
    }

    /// Status label while a file is analyzed.
    #[wasm_bindgen(getter)]
    pub fn status_label(&self) -> Option<String> {
        match self.app.view() {
            View::Upload(UploadView::Status { label, .. }) => Some(label.to_string()),
            _ => None,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.app.upload().is_some_and(|panel| panel.is_dragging())
    }

    /// Data URI for the visualizer's `<img>`, if there is one.
    #[wasm_bindgen(getter)]
    pub fn image(&self) -> Option<String> {
        match self.app.view() {
            View::Visualizer(VisualizerView::Image { image, .. }) => Some(image.to_string()),
            _ => None,
        }
    }
}

impl WebApp {
    fn pump_reads(&mut self) {
        if let Some(request) = self.app.take_read_request() {
            start_read(request.ticket, &request.file);
        }
        for (ticket, result) in take_finished_reads() {
            self.app
                .update(Message::ReadFinished(ticket, result), Instant::now());
        }
    }
}
