//! Performance benchmarks for 6502 instruction dispatch.

use criterion::{criterion_group, criterion_main, Criterion};
use emu_core::Cpu;
use emu_nes::NesSystem;
use std::hint::black_box;

fn rom_filled_with(opcode: u8) -> Vec<u8> {
    let mut prg = vec![opcode; 0x4000];
    prg[0x3FFC] = 0x00;
    prg[0x3FFD] = 0x80; // reset vector -> $8000
    prg
}

fn bench_cpu_instructions(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_instructions");

    group.bench_function("nop", |b| {
        let mut system = NesSystem::with_prg_rom(rom_filled_with(0xEA)).unwrap();
        b.iter(|| black_box(system.cpu_mut().step().unwrap()));
    });

    group.bench_function("lda_immediate", |b| {
        let mut prg = vec![0xEA; 0x4000];
        for i in (0..0x4000).step_by(2) {
            prg[i] = 0xA9; // LDA #$42
            prg[i + 1] = 0x42;
        }
        prg[0x3FFC] = 0x00;
        prg[0x3FFD] = 0x80;

        let mut system = NesSystem::with_prg_rom(prg).unwrap();
        b.iter(|| black_box(system.cpu_mut().step().unwrap()));
    });

    group.bench_function("jmp_absolute_loop", |b| {
        let mut prg = vec![0xEA; 0x4000];
        prg[0] = 0x4C; // JMP $8000
        prg[1] = 0x00;
        prg[2] = 0x80;
        prg[0x3FFC] = 0x00;
        prg[0x3FFD] = 0x80;

        let mut system = NesSystem::with_prg_rom(prg).unwrap();
        b.iter(|| black_box(system.cpu_mut().step().unwrap()));
    });

    group.finish();
}

fn bench_full_step_with_ppu(c: &mut Criterion) {
    c.bench_function("system_step_with_ppu_clocking", |b| {
        let mut system = NesSystem::with_prg_rom(rom_filled_with(0xEA)).unwrap();
        b.iter(|| black_box(system.step().unwrap()));
    });
}

criterion_group!(benches, bench_cpu_instructions, bench_full_step_with_ppu);
criterion_main!(benches);
