//! Native host.
//!
//! Drives the application from a single-threaded loop: reads files from
//! disk when the upload panel asks for them, ticks the timers, and sleeps
//! until the next deadline.

use std::path::PathBuf;
use std::time::Duration;

use web_time::Instant;

use crate::app::{PlanviewApp, View};
use crate::config::AppConfig;
use crate::constants::NATIVE_MAX_SLEEP_MS;
use crate::handoff::MemorySessionStore;
use crate::message::Message;
use crate::model::{PickerHints, SelectedFile};
use crate::upload::UploadView;
use crate::visualizer::VisualizerView;

/// Options for one native run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// File to upload; a file dialog opens when None
    pub file: Option<PathBuf>,
    /// Whether the user counts as signed in
    pub signed_in: bool,
    /// Reload the visualizer once it is shown
    pub reload: bool,
}

/// Errors that end a native run early.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("no file selected")]
    NoFileSelected,
}

/// Run one upload from selection to the visualizer and return the final view.
pub fn run(config: AppConfig, options: RunOptions) -> Result<View, RunError> {
    let hints = config.upload.hints();
    let mut app = PlanviewApp::new(config, MemorySessionStore::new());
    app.update(Message::SignedInChanged(options.signed_in), Instant::now());

    let path = match options.file {
        Some(path) => path,
        None => pick_file(&hints).ok_or(RunError::NoFileSelected)?,
    };
    app.update(
        Message::FilesPicked(vec![SelectedFile::from_path(&path)]),
        Instant::now(),
    );

    let mut last_view = None;
    loop {
        if let Some(request) = app.take_read_request() {
            let result = request.file.source().read_blocking();
            app.update(Message::ReadFinished(request.ticket, result), Instant::now());
        }

        let now = Instant::now();
        let navigated = app.tick(now);

        let view = app.view();
        if last_view.as_ref() != Some(&view) {
            println!("{}", describe(&view));
            last_view = Some(view);
        }

        if navigated {
            break;
        }
        // Nothing armed: the submission was ignored or the read failed
        let Some(deadline) = app.next_deadline() else {
            break;
        };
        let wait = deadline
            .saturating_duration_since(now)
            .min(Duration::from_millis(NATIVE_MAX_SLEEP_MS));
        std::thread::sleep(wait);
    }

    if options.reload && app.visualizer().is_some() {
        app.update(Message::Reload, Instant::now());
        println!("(reloaded) {}", describe(&app.view()));
    }

    app.shutdown();
    Ok(app.view())
}

/// Open the native file dialog filtered to the accepted extensions.
fn pick_file(hints: &PickerHints) -> Option<PathBuf> {
    let extensions: Vec<&str> = hints
        .accepted_extensions
        .iter()
        .map(String::as_str)
        .collect();
    rfd::FileDialog::new()
        .set_title("Select a floor plan")
        .add_filter("Images", &extensions)
        .pick_file()
}

/// One-line text rendering of a view.
pub fn describe(view: &View) -> String {
    match view {
        View::Upload(UploadView::Dropzone {
            enabled,
            prompt,
            help,
            accept,
            ..
        }) => {
            let state = if *enabled { "" } else { " (disabled)" };
            format!("[dropzone{}] {} {} accept: {}", state, prompt, help, accept)
        }
        View::Upload(UploadView::Status {
            file_name,
            progress,
            label,
            ..
        }) => format!("[{:>3}%] {} {}", progress, file_name, label),
        View::Visualizer(VisualizerView::Image { image, alt }) => format!(
            "[visualizer] {}: {} ({} bytes)",
            alt,
            image.media_type().unwrap_or("unknown"),
            image.len()
        ),
        View::Visualizer(VisualizerView::Empty {
            title,
            message,
            action_label,
        }) => format!("[visualizer] {} {} [{}]", title, message, action_label),
    }
}
