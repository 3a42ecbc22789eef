//! The voice skill: request parsing, intent dispatch, the search → resolve →
//! select fulfillment pipeline, and the response envelope.

pub mod dispatch;
pub mod pipeline;
pub mod request;
pub mod response;

pub use dispatch::Skill;
pub use pipeline::FulfillmentPipeline;
pub use request::{SkillAction, SkillRequest};
pub use response::SkillResponse;
