//! HTTP inbound adapter exposing the auth routes and fragment dispatch.

pub mod auth;
pub mod calendar_panel;
pub mod error;
pub mod fragments;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod ticket_modal;

pub use error::ApiResult;
