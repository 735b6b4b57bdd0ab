#![doc = include_str!("../README.md")]

pub mod api;
pub mod cli;
pub mod engine;
pub mod error;
pub mod guard;
pub mod normalize;
pub mod services;
pub mod sites;
pub mod types;


pub use engine::*;
pub use error::*;
pub use types::*;
