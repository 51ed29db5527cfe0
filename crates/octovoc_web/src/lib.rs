//! Browser client for Octovoc.
//!
//! Implements the practice engine's API traits over HTTP and loads the session context from the
//! browser. The pages drive the engine's sessions with [`timer::sleep`] as their dwell timer.

pub mod client;
pub mod context;
pub mod error;
pub mod timer;

use client::Client;
use octovoc::{DifficultWordsPractice, FinalRound, LocalBackend, PracticeSession, ServerBackend};
use tracing::Level;
use tracing_subscriber::{fmt::format::Pretty, prelude::*};
use tracing_web::{performance_layer, MakeWebConsoleWriter};
use wasm_bindgen::prelude::wasm_bindgen;

/// A logged in student's module practice.
pub type StudentSession = PracticeSession<ServerBackend<Client>>;
/// A guest's module practice, kept only in the page.
pub type GuestSession = PracticeSession<LocalBackend<Client>>;
pub type StudentFinalRound = FinalRound<Client>;
pub type DifficultWords = DifficultWordsPractice<Client>;

/// Sets up logging and panic messages. Call once when the page loads.
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();

    let wasm_log = option_env!("WASM_LOG")
        .and_then(|var| var.parse().ok())
        .unwrap_or(Level::INFO);
    let writer = MakeWebConsoleWriter::new().with_max_level(wasm_log);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(writer);
    let perf_layer = performance_layer().with_details_from_fields(Pretty::default());
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(perf_layer)
        .init();

    tracing::info!("Initialised, logging level `{wasm_log}`");
}
