//! Application shell.
//!
//! Routes between the upload page and the visualizer, wires the upload
//! panel's completion into the handoff channel, and mounts/unmounts views.
//! Unmounting the upload page tears its timers down.

use web_time::Instant;

use crate::capability::Capability;
use crate::config::AppConfig;
use crate::handoff::{HandoffChannel, Navigation, Route, SessionStore};
use crate::ingest::ReadRequest;
use crate::message::Message;
use crate::upload::{DragGesture, UploadPanel, UploadView};
use crate::visualizer::{Visualizer, VisualizerView};

/// The mounted view.
#[derive(Debug)]
enum Page {
    Upload(UploadPanel),
    Visualizer(Visualizer),
}

/// What the application currently renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Upload(UploadView),
    Visualizer(VisualizerView),
}

/// Main planview application.
#[derive(Debug)]
pub struct PlanviewApp {
    config: AppConfig,
    capability: Capability,
    route: Route,
    page: Page,
    channel: HandoffChannel,
    /// Last read cycle issued by any upload panel
    last_cycle: u64,
}

impl PlanviewApp {
    /// Start on the upload page.
    pub fn new(config: AppConfig, store: impl SessionStore + 'static) -> Self {
        let page = Page::Upload(Self::upload_panel(&config, 0));
        log::info!("planview started on {}", Route::Home.path());
        Self {
            config,
            capability: Capability::Denied,
            route: Route::Home,
            page,
            channel: HandoffChannel::new(store),
            last_cycle: 0,
        }
    }

    /// Start on the page for `path`, as after a reload or a deep link.
    ///
    /// Unknown paths open the upload page.
    pub fn open(config: AppConfig, store: impl SessionStore + 'static, path: &str) -> Self {
        let mut app = Self::new(config, store);
        match Route::parse(path) {
            Some(Route::Home) => {}
            Some(route) => app.navigate(Navigation::to(route)),
            None => log::warn!("Unknown path {:?}, opening {}", path, Route::Home.path()),
        }
        app
    }

    fn upload_panel(config: &AppConfig, after_cycle: u64) -> UploadPanel {
        UploadPanel::new(config.progress.timing(), &config.upload).starting_after(after_cycle)
    }

    pub fn update(&mut self, message: Message, now: Instant) {
        match message {
            Message::SignedInChanged(signed_in) => {
                self.capability = Capability::from(signed_in);
                log::debug!("Capability: {:?}", self.capability);
            }
            Message::FilesPicked(files) => {
                let capability = self.capability;
                if let Some(panel) = self.upload_mut() {
                    panel.pick(files, capability);
                }
            }
            Message::DragEntered => self.drag(DragGesture::Enter),
            Message::DragOver => self.drag(DragGesture::Over),
            Message::DragLeft => self.drag(DragGesture::Leave),
            Message::FilesDropped(files) => self.drag(DragGesture::Drop(files)),
            Message::ReadFinished(ticket, result) => match self.upload_mut() {
                Some(panel) => panel.read_finished(ticket, result, now),
                None => log::debug!("Read for cycle {} arrived after unmount", ticket.cycle()),
            },
            Message::Navigate(navigation) => self.navigate(navigation),
            Message::GoHome => self.navigate(Navigation::home()),
            Message::Reload => self.reload(),
        }
    }

    fn drag(&mut self, gesture: DragGesture) {
        let capability = self.capability;
        if let Some(panel) = self.upload_mut() {
            panel.drag(gesture, capability);
        }
    }

    /// Advance timers. Returns true when the route changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(panel) = self.upload_mut() else {
            return false;
        };
        let Some(image) = panel.tick(now) else {
            return false;
        };

        let navigation = self.channel.complete(image);
        self.navigate(navigation);
        true
    }

    /// Apply a router transition, unmounting the current page first.
    ///
    /// Reads still in flight for the old page keep tickets that no later
    /// panel issues, so they are dropped as stale.
    pub fn navigate(&mut self, navigation: Navigation) {
        if let Page::Upload(panel) = &mut self.page {
            self.last_cycle = self.last_cycle.max(panel.engine().cycle());
            panel.teardown();
        }

        log::info!("Navigate: {} -> {}", self.route.path(), navigation.target.path());
        self.page = match &navigation.target {
            Route::Home => Page::Upload(Self::upload_panel(&self.config, self.last_cycle)),
            Route::Visualizer(key) => Page::Visualizer(Visualizer::resolve(
                key.clone(),
                navigation.state.as_ref(),
                &self.channel,
            )),
        };
        self.route = navigation.target;
    }

    /// Rebuild the current page without navigation state.
    pub fn reload(&mut self) {
        log::info!("Reload: {}", self.route.path());
        self.navigate(Navigation::to(self.route.clone()));
    }

    /// Unmount everything, e.g. when the host shuts down.
    pub fn shutdown(&mut self) {
        if let Page::Upload(panel) = &mut self.page {
            panel.teardown();
        }
    }

    /// The read the host should perform next, if any.
    pub fn take_read_request(&mut self) -> Option<ReadRequest> {
        self.upload_mut()?.take_read_request()
    }

    /// Earliest timer deadline, for hosts that sleep between ticks.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.upload()?.next_deadline()
    }

    pub fn view(&self) -> View {
        match &self.page {
            Page::Upload(panel) => View::Upload(panel.view(self.capability)),
            Page::Visualizer(visualizer) => View::Visualizer(visualizer.view()),
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn channel(&self) -> &HandoffChannel {
        &self.channel
    }

    pub fn upload(&self) -> Option<&UploadPanel> {
        match &self.page {
            Page::Upload(panel) => Some(panel),
            Page::Visualizer(_) => None,
        }
    }

    fn upload_mut(&mut self) -> Option<&mut UploadPanel> {
        match &mut self.page {
            Page::Upload(panel) => Some(panel),
            Page::Visualizer(_) => None,
        }
    }

    pub fn visualizer(&self) -> Option<&Visualizer> {
        match &self.page {
            Page::Visualizer(visualizer) => Some(visualizer),
            Page::Upload(_) => None,
        }
    }
}
