//! Media resolution and audio format selection.
//!
//! A [`MediaResolver`] turns a search result into metadata plus every
//! candidate [`MediaVariant`](voxtube_core::types::MediaVariant);
//! [`select_best_audio_format`] picks the one to play.

pub mod format;
pub mod resolver;

pub use format::select_best_audio_format;
pub use resolver::{HttpMediaResolver, MediaResolver};
