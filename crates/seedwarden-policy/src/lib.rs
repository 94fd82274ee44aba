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

//! Backend-agnostic policy engine for stream-aware throttling and torrent
//! lifecycle cleanup.
//!
//! Layout: `address.rs` (LAN/remote classification), `throttle.rs` (tier
//! selection), `model.rs` (torrent snapshot types), `rules.rs` (eligibility
//! predicates), `cleanup.rs` (rule executor), `service.rs` (capability
//! traits implemented by client adapters).

pub mod address;
pub mod cleanup;
pub mod error;
pub mod model;
pub mod rules;
pub mod service;
pub mod throttle;

pub use address::{AddressClass, classify};
pub use cleanup::{CleanupPolicy, TrackerRule};
pub use error::{PolicyError, PolicyResult};
pub use model::{SeedRatioMode, Torrent, TorrentId, TorrentStatus};
pub use rules::CleanupReport;
pub use service::{RateLimiter, TorrentControl};
pub use throttle::{ThrottleBand, ThrottlePlan, ThrottleTier};
