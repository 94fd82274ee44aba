#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! File-backed configuration for the Seedwarden pipelines.
//!
//! Layout: `model.rs` (typed settings and defaults), `loader.rs` (JSON file
//! loading), `validate.rs` (cross-field validation), `error.rs` (error
//! types).

pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_settings;
pub use model::{
    AltSpeedMode, BandSettings, CleanupSettings, LogSettings, PlexSettings, RateSettings,
    SabnzbdSettings, Settings, ThrottleSettings, TrackerSettings, TransmissionSettings,
};
pub use validate::validate;
