// ABOUTME: Library root for ocideploy - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod arguments;
pub mod auth;
pub mod config;
pub mod deploy;
pub mod environment;
pub mod error;
pub mod output;
pub mod service;
pub mod types;
pub mod upload;
