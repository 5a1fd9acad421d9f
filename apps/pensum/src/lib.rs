//! # Pensum application library
//!
//! The binary's modules, exposed as a library so integration tests can
//! drive the API router and CLI plumbing in-process.

pub mod api;
pub mod cli;
pub mod config;
pub mod remote;
