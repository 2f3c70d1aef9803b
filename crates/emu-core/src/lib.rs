//! Core emulator traits and types
//!
//! This crate provides the fundamental abstractions shared by emulator
//! cores built on top of it: a byte-addressable memory bus, a CPU trait,
//! an emulator driver trait, and the common error/result type.

pub mod error;
pub mod memory_bus;
pub mod traits;
pub mod types;

pub use error::{EmulatorError, Result};
pub use memory_bus::MemoryBus;
pub use traits::{Cpu, Emulator};
pub use types::{Button, ControllerState};
