// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Headless page-transition choreography for a photography portfolio.
//!
//! Segue owns the timing and state of every route transition on the site:
//! plain page exits, the split-reveal cover, the detail-route image morph
//! and the gallery project modal. It renders nothing. The host forwards
//! user intents, advances the clock once per animation frame and draws
//! overlays from the returned [`engine::Frame`].
//!
//! # Key entry points
//!
//! - [`engine::Choreographer`] - owns all coordinators and dispatches
//!   [`engine::Command`]s
//! - [`host`] - the capabilities the engine drives (router, history, page
//!   chrome, element measurement), with in-memory fakes in [`host::fake`]
//! - [`options::Options`] - timings and curves, loadable from TOML
//! - [`proxy::ImageProxy`] - the same-origin image passthrough (feature
//!   `proxy`)
//! - `web` - DOM-backed capabilities and a `wasm-bindgen` export (feature
//!   `web`)
//!
//! # Time
//!
//! Nothing reads a clock internally. Every operation takes the current
//! [`web_time::Instant`], so tests step time exactly and a late frame
//! settles every phase whose deadline has passed.

pub mod animation;
pub mod engine;
pub mod error;
pub mod gallery;
pub mod geometry;
pub mod history;
pub mod host;
pub mod modal;
pub mod options;
pub mod outcome;
pub mod page_exit;
#[cfg(feature = "proxy")]
pub mod proxy;
pub mod scroll;
pub mod shared_element;
pub mod split_reveal;
#[cfg(feature = "web")]
pub mod web;
