//! # Squish
//!
//! Interactive image compression driven by a single quality dial. Load a PNG
//! or JPEG, move the dial, and get back a smaller file named after the
//! original.
//!
//! # Architecture
//!
//! ```text
//! SourceImage ──► CompressionPolicy ──► ImageBackend ──► CompressedImage
//!  (validated)    (pure: dimensions,    (decode, resize,  (bytes + stats,
//!                  output type)          encode)           download name)
//!                         ▲
//!             Session ────┘  debounce + last-request-wins + single result slot
//! ```
//!
//! The policy functions in [`imaging::calculations`] are pure, so the rules
//! that decide output size and type are tested without encoding anything.
//! All pixel work sits behind the [`imaging::ImageBackend`] trait; tests use a
//! recording mock while the CLI uses [`imaging::RustBackend`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Compression policy, parameter types, the backend trait and its `image`-crate implementation |
//! | [`types`] | `SourceImage` validation and the `CompressedImage` result |
//! | [`session`] | Debounced, last-request-wins recompression with a single result slot |
//! | [`naming`] | `<stem>_compressed.<ext>` download names |
//! | [`output`] | Human-readable sizes, ratios and CLI output lines |
//! | [`config`] | `squish.toml` loading, merged over stock defaults |
//!
//! # Design Decisions
//!
//! ## One Dial, Two Effects
//!
//! Quality `q` in `[0, 1]` drives both encoder quality and, for PNG sources,
//! the output dimensions: each side is scaled by `sqrt(q)` so the pixel area
//! shrinks in proportion to `q`. Below `0.8` every output becomes JPEG, since
//! lossless PNG cannot get meaningfully smaller without discarding pixels.
//! JPEG sources keep their dimensions and only lose encoder quality.
//!
//! ## Last Request Wins
//!
//! Derivations run off the async executor and may finish in any order. Each
//! is tagged with a [`session::RequestId`]; only the most recently issued one
//! may replace the displayed result. Superseded work still runs to completion
//! but its output is dropped.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, Lanczos3 resampling and JPEG/PNG encoding use the `image` crate.
//! No system libraries are needed.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
