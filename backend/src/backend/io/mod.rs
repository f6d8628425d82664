//! # IO Module
//!
//! Adapters between the domain and the outside world:
//!
//! - **rest**: the axum HTTP API and the DTO mappers
//! - **providers**: clients for the external growth-assessment service

pub mod providers;
pub mod rest;
