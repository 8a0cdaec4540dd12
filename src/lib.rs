#![doc = include_str!("../README.md")]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod gmgn;
pub mod reshape;
pub mod types;

pub use error::{RelayError, Result};
