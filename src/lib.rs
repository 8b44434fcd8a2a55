//! Inkwell Pipeline - story completion fan-out.
//!
//! When a story is completed, one event fans out to independent consumers:
//! one asks a text-generation service for writing feedback and stores it,
//! the other renders the story as a PDF comic and records the artifact.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
