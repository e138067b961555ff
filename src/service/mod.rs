//! Service integrations for external APIs and clients.
//!
//! This module contains the chat service used to deliver messages. The
//! service defines both a generic trait and a concrete implementation,
//! allowing for extensibility and easy testing.

pub mod chat;
