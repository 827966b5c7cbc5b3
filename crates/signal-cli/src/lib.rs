//! Launcher library for the signal-network GATT peripheral

pub mod cli;
pub mod config;
pub mod error;
