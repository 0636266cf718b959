//! Gateway adapters.

pub mod scripted;
