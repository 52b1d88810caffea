#![no_std]

extern crate alloc;

pub mod error;
pub mod filter;
pub mod sensor;

pub use error::*;
pub use filter::*;
pub use sensor::*;
