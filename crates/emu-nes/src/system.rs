//! Top-level NES system.
//!
//! Ties the CPU, bus, PPU, and controllers together into a single driver:
//! stepping the CPU by one instruction, clocking the PPU three dots per CPU
//! cycle, and delivering NMI on the vblank edge the PPU reports back.

use crate::bus::PowerOnState;
use crate::cpu::Interrupt;
use crate::{Cartridge, Cpu6502, NesBus};
use emu_core::{Button, Cpu, Emulator, MemoryBus, Result};
use std::path::Path;
use tracing::debug;

/// NES emulator: one cartridge, one CPU, one bus.
pub struct NesSystem {
    cpu: Cpu6502<NesBus>,
    frame: u64,
    paused: bool,
}

impl NesSystem {
    /// Load a cartridge from an iNES file and power on.
    pub fn new(rom_path: &Path) -> Result<Self> {
        let cartridge = Cartridge::load(rom_path)?;
        debug!(
            prg_kb = cartridge.prg_rom().len() / 1024,
            chr_kb = cartridge.chr_rom().len() / 1024,
            "booting cartridge"
        );
        Ok(Self::power_on(cartridge, PowerOnState::default()))
    }

    /// Convenience wrapper over [`NesSystem::new`] accepting any path-like value.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(path.as_ref())
    }

    /// Build a system directly from raw PRG bytes, for tests that don't need
    /// a full iNES file on disk.
    pub fn with_prg_rom(prg_rom: Vec<u8>) -> Result<Self> {
        let cartridge = Cartridge::from_prg(prg_rom, crate::cartridge::Mirroring::Horizontal);
        Ok(Self::power_on(cartridge, PowerOnState::default()))
    }

    /// Like [`NesSystem::with_prg_rom`], but pinning the internal RAM's
    /// power-on fill byte instead of taking the all-zero default. Useful for
    /// reproducing test-ROM runs that assume a specific pre-reset RAM state.
    pub fn with_prg_rom_and_power_on_state(prg_rom: Vec<u8>, state: PowerOnState) -> Result<Self> {
        let cartridge = Cartridge::from_prg(prg_rom, crate::cartridge::Mirroring::Horizontal);
        Ok(Self::power_on(cartridge, state))
    }

    fn power_on(cartridge: Cartridge, state: PowerOnState) -> Self {
        let bus = NesBus::with_power_on_state(cartridge, state);
        let mut cpu = Cpu6502::new(bus);
        cpu.reset();
        debug!(pc = format!("${:04X}", cpu.pc), "cpu reset");

        Self {
            cpu,
            frame: 0,
            paused: false,
        }
    }

    pub fn reset(&mut self) {
        self.cpu.memory_mut().reset();
        self.cpu.reset();
        self.frame = 0;
    }

    /// Execute one CPU instruction and its corresponding PPU dots,
    /// delivering NMI if the PPU signals a vblank edge.
    pub fn step(&mut self) -> Result<u8> {
        let cycles = self.cpu.step()?;

        for _ in 0..cycles {
            for _ in 0..3 {
                if self.cpu.memory_mut().clock_ppu() {
                    self.cpu.interrupt(Interrupt::Nmi);
                }
            }
        }

        Ok(cycles)
    }

    /// Run until at least `cycles` CPU cycles have elapsed.
    pub fn run_cycles(&mut self, cycles: u64) -> Result<()> {
        let target = self.cpu.cycles + cycles;
        while self.cpu.cycles < target {
            self.step()?;
        }
        Ok(())
    }

    /// Run for one NTSC frame (29780.5 CPU cycles, rounded down).
    pub fn run_frame_cycles(&mut self) -> Result<()> {
        const CYCLES_PER_FRAME: u64 = 29780;
        self.run_cycles(CYCLES_PER_FRAME)?;
        self.frame += 1;
        Ok(())
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn cpu(&self) -> &Cpu6502<NesBus> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu6502<NesBus> {
        &mut self.cpu
    }

    pub fn read_memory(&mut self, addr: u16) -> u8 {
        self.cpu.memory_mut().read(addr)
    }

    /// Current framebuffer, 256x240 packed ARGB pixels.
    pub fn framebuffer(&self) -> &[u32] {
        self.cpu.memory().ppu().framebuffer()
    }

    pub fn ppu(&self) -> &crate::ppu::Ppu {
        self.cpu.memory().ppu()
    }

    pub fn set_controller1(&mut self, buttons: Button) {
        self.cpu.memory_mut().set_controller1(buttons);
    }

    pub fn set_controller2(&mut self, buttons: Button) {
        self.cpu.memory_mut().set_controller2(buttons);
    }
}

impl Emulator for NesSystem {
    fn reset(&mut self) {
        NesSystem::reset(self);
    }

    fn run_frame(&mut self) -> Result<usize> {
        let before = self.cpu.cycles;
        self.run_frame_cycles()?;
        Ok((self.cpu.cycles - before) as usize)
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}
