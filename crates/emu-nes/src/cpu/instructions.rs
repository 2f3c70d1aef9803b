//! Opcode execution: the 151 legal 6502 instructions.

use super::{Cpu6502, CpuMemory, StatusFlags};
use emu_core::{EmulatorError, Result};

impl<M: CpuMemory> Cpu6502<M> {
    // ---- shared ALU/flag helpers -----------------------------------

    fn adc(&mut self, value: u8) {
        let carry_in = self.get_flag(StatusFlags::CARRY) as u16;
        let sum = self.a as u16 + value as u16 + carry_in;
        let result = sum as u8;
        self.set_flag(StatusFlags::CARRY, sum > 0xFF);
        self.set_flag(
            StatusFlags::OVERFLOW,
            (self.a ^ result) & (value ^ result) & 0x80 != 0,
        );
        self.a = result;
        self.update_zn(self.a);
    }

    fn sbc(&mut self, value: u8) {
        // SBC is ADC with the operand's ones' complement.
        self.adc(!value);
    }

    fn and(&mut self, value: u8) {
        self.a &= value;
        self.update_zn(self.a);
    }

    fn ora(&mut self, value: u8) {
        self.a |= value;
        self.update_zn(self.a);
    }

    fn eor(&mut self, value: u8) {
        self.a ^= value;
        self.update_zn(self.a);
    }

    fn compare(&mut self, reg: u8, value: u8) {
        let result = reg.wrapping_sub(value);
        self.set_flag(StatusFlags::CARRY, reg >= value);
        self.update_zn(result);
    }

    fn asl_value(&mut self, value: u8) -> u8 {
        self.set_flag(StatusFlags::CARRY, value & 0x80 != 0);
        let result = value << 1;
        self.update_zn(result);
        result
    }

    fn lsr_value(&mut self, value: u8) -> u8 {
        self.set_flag(StatusFlags::CARRY, value & 0x01 != 0);
        let result = value >> 1;
        self.update_zn(result);
        result
    }

    fn rol_value(&mut self, value: u8) -> u8 {
        let carry_in = self.get_flag(StatusFlags::CARRY) as u8;
        self.set_flag(StatusFlags::CARRY, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.update_zn(result);
        result
    }

    fn ror_value(&mut self, value: u8) -> u8 {
        let carry_in = self.get_flag(StatusFlags::CARRY) as u8;
        self.set_flag(StatusFlags::CARRY, value & 0x01 != 0);
        let result = (value >> 1) | (carry_in << 7);
        self.update_zn(result);
        result
    }

    fn bit(&mut self, value: u8) {
        self.set_flag(StatusFlags::ZERO, self.a & value == 0);
        self.set_flag(StatusFlags::OVERFLOW, value & 0x40 != 0);
        self.set_flag(StatusFlags::NEGATIVE, value & 0x80 != 0);
    }

    /// Read-modify-write a memory operand, performing the documented dummy
    /// write of the unmodified value before the real write.
    fn rmw(&mut self, addr: u16, op: impl FnOnce(&mut Self, u8) -> u8) {
        let value = self.memory.read(addr);
        self.memory.write(addr, value);
        let result = op(self, value);
        self.memory.write(addr, result);
    }

    /// Relative branch: returns the extra cycles on top of the 2 base cycles.
    fn branch(&mut self, condition: bool) -> u8 {
        let offset = self.fetch_byte() as i8;
        if !condition {
            return 0;
        }
        let old_pc = self.pc;
        self.pc = self.pc.wrapping_add(offset as u16);
        if old_pc & 0xFF00 != self.pc & 0xFF00 {
            2
        } else {
            1
        }
    }

    // ---- dispatch -------------------------------------------------

    pub(super) fn execute(&mut self, opcode: u8) -> Result<u8> {
        let cycles = match opcode {
            // ---- LDA ----
            0xA9 => {
                self.a = self.fetch_byte();
                self.update_zn(self.a);
                2
            }
            0xA5 => {
                let a = self.addr_zero_page();
                self.a = self.memory.read(a);
                self.update_zn(self.a);
                3
            }
            0xB5 => {
                let a = self.addr_zero_page_x();
                self.a = self.memory.read(a);
                self.update_zn(self.a);
                4
            }
            0xAD => {
                let a = self.addr_absolute();
                self.a = self.memory.read(a);
                self.update_zn(self.a);
                4
            }
            0xBD => {
                let (a, cross) = self.addr_absolute_x();
                self.a = self.memory.read(a);
                self.update_zn(self.a);
                4 + cross as u8
            }
            0xB9 => {
                let (a, cross) = self.addr_absolute_y();
                self.a = self.memory.read(a);
                self.update_zn(self.a);
                4 + cross as u8
            }
            0xA1 => {
                let a = self.addr_indexed_indirect();
                self.a = self.memory.read(a);
                self.update_zn(self.a);
                6
            }
            0xB1 => {
                let (a, cross) = self.addr_indirect_indexed();
                self.a = self.memory.read(a);
                self.update_zn(self.a);
                5 + cross as u8
            }

            // ---- LDX ----
            0xA2 => {
                self.x = self.fetch_byte();
                self.update_zn(self.x);
                2
            }
            0xA6 => {
                let a = self.addr_zero_page();
                self.x = self.memory.read(a);
                self.update_zn(self.x);
                3
            }
            0xB6 => {
                let a = self.addr_zero_page_y();
                self.x = self.memory.read(a);
                self.update_zn(self.x);
                4
            }
            0xAE => {
                let a = self.addr_absolute();
                self.x = self.memory.read(a);
                self.update_zn(self.x);
                4
            }
            0xBE => {
                let (a, cross) = self.addr_absolute_y();
                self.x = self.memory.read(a);
                self.update_zn(self.x);
                4 + cross as u8
            }

            // ---- LDY ----
            0xA0 => {
                self.y = self.fetch_byte();
                self.update_zn(self.y);
                2
            }
            0xA4 => {
                let a = self.addr_zero_page();
                self.y = self.memory.read(a);
                self.update_zn(self.y);
                3
            }
            0xB4 => {
                let a = self.addr_zero_page_x();
                self.y = self.memory.read(a);
                self.update_zn(self.y);
                4
            }
            0xAC => {
                let a = self.addr_absolute();
                self.y = self.memory.read(a);
                self.update_zn(self.y);
                4
            }
            0xBC => {
                let (a, cross) = self.addr_absolute_x();
                self.y = self.memory.read(a);
                self.update_zn(self.y);
                4 + cross as u8
            }

            // ---- STA ----
            0x85 => {
                let a = self.addr_zero_page();
                self.memory.write(a, self.a);
                3
            }
            0x95 => {
                let a = self.addr_zero_page_x();
                self.memory.write(a, self.a);
                4
            }
            0x8D => {
                let a = self.addr_absolute();
                self.memory.write(a, self.a);
                4
            }
            0x9D => {
                let (a, _) = self.addr_absolute_x();
                self.memory.write(a, self.a);
                5
            }
            0x99 => {
                let (a, _) = self.addr_absolute_y();
                self.memory.write(a, self.a);
                5
            }
            0x81 => {
                let a = self.addr_indexed_indirect();
                self.memory.write(a, self.a);
                6
            }
            0x91 => {
                let (a, _) = self.addr_indirect_indexed();
                self.memory.write(a, self.a);
                6
            }

            // ---- STX / STY ----
            0x86 => {
                let a = self.addr_zero_page();
                self.memory.write(a, self.x);
                3
            }
            0x96 => {
                let a = self.addr_zero_page_y();
                self.memory.write(a, self.x);
                4
            }
            0x8E => {
                let a = self.addr_absolute();
                self.memory.write(a, self.x);
                4
            }
            0x84 => {
                let a = self.addr_zero_page();
                self.memory.write(a, self.y);
                3
            }
            0x94 => {
                let a = self.addr_zero_page_x();
                self.memory.write(a, self.y);
                4
            }
            0x8C => {
                let a = self.addr_absolute();
                self.memory.write(a, self.y);
                4
            }

            // ---- transfers ----
            0xAA => {
                self.x = self.a;
                self.update_zn(self.x);
                2
            }
            0xA8 => {
                self.y = self.a;
                self.update_zn(self.y);
                2
            }
            0x8A => {
                self.a = self.x;
                self.update_zn(self.a);
                2
            }
            0x98 => {
                self.a = self.y;
                self.update_zn(self.a);
                2
            }
            0xBA => {
                self.x = self.sp;
                self.update_zn(self.x);
                2
            }
            0x9A => {
                self.sp = self.x;
                2
            }

            // ---- stack ----
            0x48 => {
                self.push(self.a);
                3
            }
            0x08 => {
                let mut flags = self.status;
                flags.insert(StatusFlags::BREAK);
                flags.insert(StatusFlags::UNUSED);
                self.push(flags.bits());
                3
            }
            0x68 => {
                self.a = self.pop();
                self.update_zn(self.a);
                4
            }
            0x28 => {
                let bits = self.pop();
                let old_i = self.get_flag(StatusFlags::INTERRUPT);
                let mut flags = StatusFlags::from_bits_truncate(bits);
                flags.insert(StatusFlags::UNUSED);
                flags.remove(StatusFlags::BREAK);
                self.status = flags;
                self.pending_irq_mask_override = Some(old_i);
                4
            }

            // ---- ALU ----
            0x69 => {
                let v = self.fetch_byte();
                self.adc(v);
                2
            }
            0x65 => {
                let a = self.addr_zero_page();
                let v = self.memory.read(a);
                self.adc(v);
                3
            }
            0x75 => {
                let a = self.addr_zero_page_x();
                let v = self.memory.read(a);
                self.adc(v);
                4
            }
            0x6D => {
                let a = self.addr_absolute();
                let v = self.memory.read(a);
                self.adc(v);
                4
            }
            0x7D => {
                let (a, cross) = self.addr_absolute_x();
                let v = self.memory.read(a);
                self.adc(v);
                4 + cross as u8
            }
            0x79 => {
                let (a, cross) = self.addr_absolute_y();
                let v = self.memory.read(a);
                self.adc(v);
                4 + cross as u8
            }
            0x61 => {
                let a = self.addr_indexed_indirect();
                let v = self.memory.read(a);
                self.adc(v);
                6
            }
            0x71 => {
                let (a, cross) = self.addr_indirect_indexed();
                let v = self.memory.read(a);
                self.adc(v);
                5 + cross as u8
            }

            0xE9 => {
                let v = self.fetch_byte();
                self.sbc(v);
                2
            }
            0xE5 => {
                let a = self.addr_zero_page();
                let v = self.memory.read(a);
                self.sbc(v);
                3
            }
            0xF5 => {
                let a = self.addr_zero_page_x();
                let v = self.memory.read(a);
                self.sbc(v);
                4
            }
            0xED => {
                let a = self.addr_absolute();
                let v = self.memory.read(a);
                self.sbc(v);
                4
            }
            0xFD => {
                let (a, cross) = self.addr_absolute_x();
                let v = self.memory.read(a);
                self.sbc(v);
                4 + cross as u8
            }
            0xF9 => {
                let (a, cross) = self.addr_absolute_y();
                let v = self.memory.read(a);
                self.sbc(v);
                4 + cross as u8
            }
            0xE1 => {
                let a = self.addr_indexed_indirect();
                let v = self.memory.read(a);
                self.sbc(v);
                6
            }
            0xF1 => {
                let (a, cross) = self.addr_indirect_indexed();
                let v = self.memory.read(a);
                self.sbc(v);
                5 + cross as u8
            }

            0x29 => {
                let v = self.fetch_byte();
                self.and(v);
                2
            }
            0x25 => {
                let a = self.addr_zero_page();
                let v = self.memory.read(a);
                self.and(v);
                3
            }
            0x35 => {
                let a = self.addr_zero_page_x();
                let v = self.memory.read(a);
                self.and(v);
                4
            }
            0x2D => {
                let a = self.addr_absolute();
                let v = self.memory.read(a);
                self.and(v);
                4
            }
            0x3D => {
                let (a, cross) = self.addr_absolute_x();
                let v = self.memory.read(a);
                self.and(v);
                4 + cross as u8
            }
            0x39 => {
                let (a, cross) = self.addr_absolute_y();
                let v = self.memory.read(a);
                self.and(v);
                4 + cross as u8
            }
            0x21 => {
                let a = self.addr_indexed_indirect();
                let v = self.memory.read(a);
                self.and(v);
                6
            }
            0x31 => {
                let (a, cross) = self.addr_indirect_indexed();
                let v = self.memory.read(a);
                self.and(v);
                5 + cross as u8
            }

            0x09 => {
                let v = self.fetch_byte();
                self.ora(v);
                2
            }
            0x05 => {
                let a = self.addr_zero_page();
                let v = self.memory.read(a);
                self.ora(v);
                3
            }
            0x15 => {
                let a = self.addr_zero_page_x();
                let v = self.memory.read(a);
                self.ora(v);
                4
            }
            0x0D => {
                let a = self.addr_absolute();
                let v = self.memory.read(a);
                self.ora(v);
                4
            }
            0x1D => {
                let (a, cross) = self.addr_absolute_x();
                let v = self.memory.read(a);
                self.ora(v);
                4 + cross as u8
            }
            0x19 => {
                let (a, cross) = self.addr_absolute_y();
                let v = self.memory.read(a);
                self.ora(v);
                4 + cross as u8
            }
            0x01 => {
                let a = self.addr_indexed_indirect();
                let v = self.memory.read(a);
                self.ora(v);
                6
            }
            0x11 => {
                let (a, cross) = self.addr_indirect_indexed();
                let v = self.memory.read(a);
                self.ora(v);
                5 + cross as u8
            }

            0x49 => {
                let v = self.fetch_byte();
                self.eor(v);
                2
            }
            0x45 => {
                let a = self.addr_zero_page();
                let v = self.memory.read(a);
                self.eor(v);
                3
            }
            0x55 => {
                let a = self.addr_zero_page_x();
                let v = self.memory.read(a);
                self.eor(v);
                4
            }
            0x4D => {
                let a = self.addr_absolute();
                let v = self.memory.read(a);
                self.eor(v);
                4
            }
            0x5D => {
                let (a, cross) = self.addr_absolute_x();
                let v = self.memory.read(a);
                self.eor(v);
                4 + cross as u8
            }
            0x59 => {
                let (a, cross) = self.addr_absolute_y();
                let v = self.memory.read(a);
                self.eor(v);
                4 + cross as u8
            }
            0x41 => {
                let a = self.addr_indexed_indirect();
                let v = self.memory.read(a);
                self.eor(v);
                6
            }
            0x51 => {
                let (a, cross) = self.addr_indirect_indexed();
                let v = self.memory.read(a);
                self.eor(v);
                5 + cross as u8
            }

            // ---- compares ----
            0xC9 => {
                let v = self.fetch_byte();
                self.compare(self.a, v);
                2
            }
            0xC5 => {
                let a = self.addr_zero_page();
                let v = self.memory.read(a);
                self.compare(self.a, v);
                3
            }
            0xD5 => {
                let a = self.addr_zero_page_x();
                let v = self.memory.read(a);
                self.compare(self.a, v);
                4
            }
            0xCD => {
                let a = self.addr_absolute();
                let v = self.memory.read(a);
                self.compare(self.a, v);
                4
            }
            0xDD => {
                let (a, cross) = self.addr_absolute_x();
                let v = self.memory.read(a);
                self.compare(self.a, v);
                4 + cross as u8
            }
            0xD9 => {
                let (a, cross) = self.addr_absolute_y();
                let v = self.memory.read(a);
                self.compare(self.a, v);
                4 + cross as u8
            }
            0xC1 => {
                let a = self.addr_indexed_indirect();
                let v = self.memory.read(a);
                self.compare(self.a, v);
                6
            }
            0xD1 => {
                let (a, cross) = self.addr_indirect_indexed();
                let v = self.memory.read(a);
                self.compare(self.a, v);
                5 + cross as u8
            }

            0xE0 => {
                let v = self.fetch_byte();
                self.compare(self.x, v);
                2
            }
            0xE4 => {
                let a = self.addr_zero_page();
                let v = self.memory.read(a);
                self.compare(self.x, v);
                3
            }
            0xEC => {
                let a = self.addr_absolute();
                let v = self.memory.read(a);
                self.compare(self.x, v);
                4
            }
            0xC0 => {
                let v = self.fetch_byte();
                self.compare(self.y, v);
                2
            }
            0xC4 => {
                let a = self.addr_zero_page();
                let v = self.memory.read(a);
                self.compare(self.y, v);
                3
            }
            0xCC => {
                let a = self.addr_absolute();
                let v = self.memory.read(a);
                self.compare(self.y, v);
                4
            }

            // ---- BIT ----
            0x24 => {
                let a = self.addr_zero_page();
                let v = self.memory.read(a);
                self.bit(v);
                3
            }
            0x2C => {
                let a = self.addr_absolute();
                let v = self.memory.read(a);
                self.bit(v);
                4
            }

            // ---- INC/DEC memory (RMW) ----
            0xE6 => {
                let a = self.addr_zero_page();
                self.rmw(a, |c, v| {
                    let r = v.wrapping_add(1);
                    c.update_zn(r);
                    r
                });
                5
            }
            0xF6 => {
                let a = self.addr_zero_page_x();
                self.rmw(a, |c, v| {
                    let r = v.wrapping_add(1);
                    c.update_zn(r);
                    r
                });
                6
            }
            0xEE => {
                let a = self.addr_absolute();
                self.rmw(a, |c, v| {
                    let r = v.wrapping_add(1);
                    c.update_zn(r);
                    r
                });
                6
            }
            0xFE => {
                let (a, _) = self.addr_absolute_x();
                self.rmw(a, |c, v| {
                    let r = v.wrapping_add(1);
                    c.update_zn(r);
                    r
                });
                7
            }
            0xC6 => {
                let a = self.addr_zero_page();
                self.rmw(a, |c, v| {
                    let r = v.wrapping_sub(1);
                    c.update_zn(r);
                    r
                });
                5
            }
            0xD6 => {
                let a = self.addr_zero_page_x();
                self.rmw(a, |c, v| {
                    let r = v.wrapping_sub(1);
                    c.update_zn(r);
                    r
                });
                6
            }
            0xCE => {
                let a = self.addr_absolute();
                self.rmw(a, |c, v| {
                    let r = v.wrapping_sub(1);
                    c.update_zn(r);
                    r
                });
                6
            }
            0xDE => {
                let (a, _) = self.addr_absolute_x();
                self.rmw(a, |c, v| {
                    let r = v.wrapping_sub(1);
                    c.update_zn(r);
                    r
                });
                7
            }

            // ---- INX/INY/DEX/DEY ----
            0xE8 => {
                self.x = self.x.wrapping_add(1);
                self.update_zn(self.x);
                2
            }
            0xC8 => {
                self.y = self.y.wrapping_add(1);
                self.update_zn(self.y);
                2
            }
            0xCA => {
                self.x = self.x.wrapping_sub(1);
                self.update_zn(self.x);
                2
            }
            0x88 => {
                self.y = self.y.wrapping_sub(1);
                self.update_zn(self.y);
                2
            }

            // ---- shifts/rotates ----
            0x0A => {
                self.a = self.asl_value(self.a);
                2
            }
            0x06 => {
                let a = self.addr_zero_page();
                self.rmw(a, Self::asl_value);
                5
            }
            0x16 => {
                let a = self.addr_zero_page_x();
                self.rmw(a, Self::asl_value);
                6
            }
            0x0E => {
                let a = self.addr_absolute();
                self.rmw(a, Self::asl_value);
                6
            }
            0x1E => {
                let (a, _) = self.addr_absolute_x();
                self.rmw(a, Self::asl_value);
                7
            }

            0x4A => {
                self.a = self.lsr_value(self.a);
                2
            }
            0x46 => {
                let a = self.addr_zero_page();
                self.rmw(a, Self::lsr_value);
                5
            }
            0x56 => {
                let a = self.addr_zero_page_x();
                self.rmw(a, Self::lsr_value);
                6
            }
            0x4E => {
                let a = self.addr_absolute();
                self.rmw(a, Self::lsr_value);
                6
            }
            0x5E => {
                let (a, _) = self.addr_absolute_x();
                self.rmw(a, Self::lsr_value);
                7
            }

            0x2A => {
                self.a = self.rol_value(self.a);
                2
            }
            0x26 => {
                let a = self.addr_zero_page();
                self.rmw(a, Self::rol_value);
                5
            }
            0x36 => {
                let a = self.addr_zero_page_x();
                self.rmw(a, Self::rol_value);
                6
            }
            0x2E => {
                let a = self.addr_absolute();
                self.rmw(a, Self::rol_value);
                6
            }
            0x3E => {
                let (a, _) = self.addr_absolute_x();
                self.rmw(a, Self::rol_value);
                7
            }

            0x6A => {
                self.a = self.ror_value(self.a);
                2
            }
            0x66 => {
                let a = self.addr_zero_page();
                self.rmw(a, Self::ror_value);
                5
            }
            0x76 => {
                let a = self.addr_zero_page_x();
                self.rmw(a, Self::ror_value);
                6
            }
            0x6E => {
                let a = self.addr_absolute();
                self.rmw(a, Self::ror_value);
                6
            }
            0x7E => {
                let (a, _) = self.addr_absolute_x();
                self.rmw(a, Self::ror_value);
                7
            }

            // ---- jumps/calls ----
            0x4C => {
                self.pc = self.addr_absolute();
                3
            }
            0x6C => {
                self.pc = self.addr_indirect();
                5
            }
            0x20 => {
                let target = self.addr_absolute();
                self.push_word(self.pc.wrapping_sub(1));
                self.pc = target;
                6
            }
            0x60 => {
                self.pc = self.pop_word().wrapping_add(1);
                6
            }
            0x40 => {
                let bits = self.pop();
                let mut flags = StatusFlags::from_bits_truncate(bits);
                flags.insert(StatusFlags::UNUSED);
                flags.remove(StatusFlags::BREAK);
                self.status = flags;
                self.pending_irq_mask_override = None;
                self.pc = self.pop_word();
                6
            }
            0x00 => self.service_brk(),

            // ---- branches ----
            0x10 => 2 + self.branch(!self.get_flag(StatusFlags::NEGATIVE)),
            0x30 => 2 + self.branch(self.get_flag(StatusFlags::NEGATIVE)),
            0x50 => 2 + self.branch(!self.get_flag(StatusFlags::OVERFLOW)),
            0x70 => 2 + self.branch(self.get_flag(StatusFlags::OVERFLOW)),
            0x90 => 2 + self.branch(!self.get_flag(StatusFlags::CARRY)),
            0xB0 => 2 + self.branch(self.get_flag(StatusFlags::CARRY)),
            0xD0 => 2 + self.branch(!self.get_flag(StatusFlags::ZERO)),
            0xF0 => 2 + self.branch(self.get_flag(StatusFlags::ZERO)),

            // ---- flag ops ----
            0x18 => {
                self.set_flag(StatusFlags::CARRY, false);
                2
            }
            0x38 => {
                self.set_flag(StatusFlags::CARRY, true);
                2
            }
            0x58 => {
                self.set_interrupt_disable_delayed(false);
                2
            }
            0x78 => {
                self.set_interrupt_disable_delayed(true);
                2
            }
            0xB8 => {
                self.set_flag(StatusFlags::OVERFLOW, false);
                2
            }
            0xD8 => {
                self.set_flag(StatusFlags::DECIMAL, false);
                2
            }
            0xF8 => {
                self.set_flag(StatusFlags::DECIMAL, true);
                2
            }

            // ---- misc ----
            0xEA => 2,

            _ => return Err(EmulatorError::InvalidOpcode(opcode)),
        };
        Ok(cycles)
    }
}
