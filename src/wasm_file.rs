//! WASM file reading utilities.
//!
//! Browser files can only be read asynchronously through a `FileReader`.
//! The reader's callbacks push results into a thread-local queue that the
//! app drains on its next tick, so all state changes stay on the tick path.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, FileList, FileReader};

use crate::ingest::ReadTicket;
use crate::model::{FileSource, ReadError, SelectedFile};

type FinishedRead = (ReadTicket, Result<Vec<u8>, ReadError>);

thread_local! {
    /// Reads completed by FileReader callbacks - the app polls this via tick()
    static FINISHED_READS: RefCell<Vec<FinishedRead>> = const { RefCell::new(Vec::new()) };
}

/// Take every read that finished since the last call.
pub fn take_finished_reads() -> Vec<FinishedRead> {
    FINISHED_READS.with(|reads| std::mem::take(&mut *reads.borrow_mut()))
}

fn push_finished(ticket: ReadTicket, result: Result<Vec<u8>, ReadError>) {
    FINISHED_READS.with(|reads| reads.borrow_mut().push((ticket, result)));
}

/// Wrap a browser `File`, keeping its declared type and size.
pub fn selected_file(file: web_sys::File) -> SelectedFile {
    let name = file.name();
    let media_type = file.type_();
    let size = file.size() as u64;
    SelectedFile::new(name, media_type, FileSource::Browser(file)).with_size(size)
}

/// All files of an input's or a drop's `FileList`.
pub fn selected_files(list: &FileList) -> Vec<SelectedFile> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(selected_file)
        .collect()
}

/// Start reading `file`; the result shows up in [`take_finished_reads`].
pub fn start_read(ticket: ReadTicket, file: &SelectedFile) {
    let FileSource::Browser(blob) = file.source() else {
        push_finished(ticket, file.source().read_blocking());
        return;
    };

    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            push_finished(ticket, Err(ReadError::Browser(format!("{:?}", e))));
            return;
        }
    };

    let name = file.name().to_string();
    let onload = Closure::wrap(Box::new(move |event: Event| {
        let result = event
            .target()
            .and_then(|target| target.dyn_into::<FileReader>().ok())
            .ok_or_else(|| ReadError::Browser("event target is not a FileReader".to_string()))
            .and_then(|reader| {
                reader
                    .result()
                    .map_err(|e| ReadError::Browser(format!("{:?}", e)))
            })
            .map(|buffer| js_sys::Uint8Array::new(&buffer).to_vec());

        if let Ok(bytes) = &result {
            log::info!("📂 File {} read: {} bytes", name, bytes.len());
        }
        push_finished(ticket, result);
    }) as Box<dyn FnMut(Event)>);

    let onerror = Closure::wrap(Box::new(move |_event: Event| {
        push_finished(ticket, Err(ReadError::Browser("FileReader error".to_string())));
    }) as Box<dyn FnMut(Event)>);

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onload.forget(); // Leak the closure to keep it alive
    onerror.forget();

    if let Err(e) = reader.read_as_array_buffer(blob) {
        push_finished(ticket, Err(ReadError::Browser(format!("{:?}", e))));
    }
}
