//! HTTP gateway for the voice skill.
//!
//! Accepts platform requests on `POST /skill`, runs them through the
//! [`Skill`](voxtube_skill::Skill), and answers with the response envelope.

#[cfg(feature = "metrics")]
pub mod metrics;
pub mod server;
pub mod state;

pub use server::{router, start_gateway};
pub use state::GatewayState;
