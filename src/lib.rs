//! AI Result Analyzer: a results dashboard served over HTTP, with a scripted
//! assistant that answers a handful of canned questions about the figures.

pub mod api;
pub mod config;
pub mod conversation;
pub mod dashboard;
pub mod error;
pub mod grades;
pub mod render;
pub mod report;
pub mod responder;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod view;

pub use error::{AppError, AppResult};
pub use responder::{classify, BotReply, Intent};
