//! Event handling for the notifier.
//!
//! This module provides functionality for handling host events:
//! - Choosing the destination room of a message
//! - Running the render and dispatch pipeline off the caller's task

pub mod notify;
pub mod room;
