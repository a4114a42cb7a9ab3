//! Core use-case services.
//!
//! # Responsibility
//! - Combine repositories with the pure layout/interval engines.
//! - Keep UI bridges decoupled from storage details.

pub mod timeline_service;
