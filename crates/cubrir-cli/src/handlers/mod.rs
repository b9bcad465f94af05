//! Command handlers

pub mod combine;
pub mod render;
