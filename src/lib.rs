//! Serverless handlers that turn `{action, payload}` requests into Azure
//! DevOps project and work item calls, and report outcomes to SNS and a
//! Discord webhook.

pub mod azure;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod notify;
pub mod runtime;
pub mod schema;
pub mod secrets;
