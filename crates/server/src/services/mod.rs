//! Business-logic services for the API server.

pub mod auth;
pub mod token;
