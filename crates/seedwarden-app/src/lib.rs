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

//! Command-line application wiring the pipelines together.
//!
//! Layout: `cli.rs` (argument surface and dispatch), `pipeline.rs` (tier
//! fan-out across download tools), `error.rs` (exit-code mapping).

pub mod cli;
pub mod error;
pub mod pipeline;

pub use cli::run;
pub use error::{AppError, AppResult};
