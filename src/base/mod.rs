//! Core components, types, and utilities for the notifier.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The event data model and common result types.

pub mod config;
pub mod types;
