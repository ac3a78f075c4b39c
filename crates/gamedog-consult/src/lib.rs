//! Consultation intake and notification dispatch for the Game Dogs Sports
//! website.
//!
//! [`intake`] holds the form controller that validates, persists, and asks
//! for notifications. [`notify`] holds the dispatcher endpoint that
//! re-validates, rate limits, and sends the two emails.

pub mod config;
pub mod consultation;
pub mod error;
pub mod intake;
pub mod notify;
pub mod telemetry;
