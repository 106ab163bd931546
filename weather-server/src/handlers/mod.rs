//! Request handlers

pub mod health;
pub mod sse;
pub mod weather;
