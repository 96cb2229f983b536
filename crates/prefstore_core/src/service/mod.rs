//! Caller-facing use-case services.
//!
//! # Responsibility
//! - Translate store results into the tagged `{status, data}` envelope.
//! - Keep transport layers (HTTP, CLI) decoupled from storage details.

pub mod admin_service;
pub mod envelope;
pub mod user_service;
