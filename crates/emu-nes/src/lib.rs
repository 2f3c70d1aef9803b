//! NES Emulator Implementation
//!
//! This crate implements a Nintendo Entertainment System emulator core:
//! the 6502 CPU, the PPU scanline engine, the CPU<->PPU memory bus, NROM
//! cartridge loading, and the standard controller.

pub mod bus;
pub mod cartridge;
pub mod controller;
pub mod cpu;
pub mod palette;
pub mod ppu;
pub mod system;

pub use bus::{NesBus, PowerOnState};
pub use cartridge::Cartridge;
pub use controller::Controller;
pub use cpu::Cpu6502;
pub use palette::{argb, NES_PALETTE};
pub use ppu::Ppu;
pub use system::NesSystem;
