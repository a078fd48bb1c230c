//! Core library for the InternHub marketplace service.
//!
//! The interesting logic lives in [`workflows::internship`]: the application
//! lifecycle, deliverable review, and certificate issuance managers together
//! with the repository seams they run against. [`config`], [`telemetry`], and
//! [`error`] carry the ambient plumbing shared with the API service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
