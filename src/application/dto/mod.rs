//! Data Transfer Objects
//!
//! DTOs for query responses and registry results.

pub mod response;

pub use response::{ChannelDetails, ChannelSummary, JoinOutcome};
