//! Shared test utilities for building minimal iNES ROM images.
//!
//! Notes on iNES header fields used here:
//! - bytes[0..4] = b"NES\x1A"
//! - byte 4 = PRG ROM size in 16 KiB units
//! - byte 5 = CHR ROM size in 8 KiB units (0 => 8 KiB CHR RAM)
//! - byte 6 = Flags 6 (mirroring, battery, trainer, mapper low nibble)
//! - byte 7 = Flags 7 (NES 2.0 marker, mapper high nibble)
//! - byte 8 = PRG RAM size in 8 KiB units (0 => 8 KiB)
//!
//! Vectors for a 16 KiB NROM image live at PRG offsets 0x3FFA..=0x3FFF
//! (NMI, RESET, IRQ), which the mirror maps to $FFFA..=$FFFF.

#![allow(dead_code)]

pub const PRG_16K: usize = 16 * 1024;
pub const CHR_8K: usize = 8 * 1024;

/// Build an iNES image. PRG is filled with 0xAA, CHR with 0xCC.
pub fn build_ines(
    prg_16k: usize,
    chr_8k: usize,
    flags6: u8,
    flags7: u8,
    prg_ram_8k: u8,
    trainer: Option<&[u8; 512]>,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(
        16 + trainer.map_or(0, |_| 512) + prg_16k * PRG_16K + chr_8k * CHR_8K,
    );

    bytes.extend_from_slice(b"NES\x1A");
    bytes.push(prg_16k as u8);
    bytes.push(chr_8k as u8);
    bytes.push(flags6);
    bytes.push(flags7);
    bytes.push(prg_ram_8k);
    bytes.extend_from_slice(&[0u8; 7]);

    if let Some(t) = trainer {
        bytes.extend_from_slice(t);
    }
    bytes.extend(std::iter::repeat_n(0xAA, prg_16k * PRG_16K));
    bytes.extend(std::iter::repeat_n(0xCC, chr_8k * CHR_8K));
    bytes
}

/// 16 KiB NROM image with `prg` at $8000 and the rest of PRG filled with NOP
/// (0xEA). `vectors` is `(reset, nmi)`; both default to $8000. IRQ points at
/// $8000.
pub fn build_nrom_with_prg(prg: &[u8], vectors: Option<(u16, u16)>) -> Vec<u8> {
    assert!(prg.len() <= PRG_16K - 6, "program must leave room for vectors");

    let mut rom = build_ines(1, 1, 0, 0, 1, None);
    let bank = &mut rom[16..16 + PRG_16K];
    bank.fill(0xEA);
    bank[..prg.len()].copy_from_slice(prg);

    let (reset, nmi) = vectors.unwrap_or((0x8000, 0x8000));
    set_vectors_in_prg(bank, reset, nmi, 0x8000);
    rom
}

/// Write NMI/RESET/IRQ into the last six bytes of a 16 KiB or 32 KiB PRG.
pub fn set_vectors_in_prg(prg: &mut [u8], reset: u16, nmi: u16, irq: u16) {
    let base = match prg.len() {
        PRG_16K => 0x3FFA,
        len if len == 2 * PRG_16K => 0x7FFA,
        other => panic!("unsupported PRG length for vectors: {other}"),
    };
    prg[base..base + 2].copy_from_slice(&nmi.to_le_bytes());
    prg[base + 2..base + 4].copy_from_slice(&reset.to_le_bytes());
    prg[base + 4..base + 6].copy_from_slice(&irq.to_le_bytes());
}

/// MMC1 image with `prg_banks` x 16 KiB PRG, where every byte of bank `n` is
/// `n`, and `chr_8k` x 8 KiB CHR-ROM (0 => CHR RAM).
pub fn build_mmc1(prg_banks: usize, chr_8k: usize) -> Vec<u8> {
    let mut rom = build_ines(prg_banks, chr_8k, 0x10, 0x00, 1, None);
    for (n, bank) in rom[16..16 + prg_banks * PRG_16K]
        .chunks_mut(PRG_16K)
        .enumerate()
    {
        bank.fill(n as u8);
    }
    rom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_ines() {
        let rom = build_ines(2, 1, 0x01, 0x00, 1, None);
        assert_eq!(&rom[0..4], b"NES\x1A");
        assert_eq!(&rom[4..9], &[2, 1, 0x01, 0x00, 1]);
        assert_eq!(rom.len(), 16 + 2 * PRG_16K + CHR_8K);
    }

    #[test]
    fn writes_vectors_for_16k_prg() {
        let mut prg = vec![0u8; PRG_16K];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x3FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }

    #[test]
    fn nrom_program_is_padded_with_nops() {
        let rom = build_nrom_with_prg(&[0xA9, 0x01], Some((0x8000, 0x9000)));
        assert_eq!(&rom[16..19], &[0xA9, 0x01, 0xEA]);
        assert_eq!(rom[16 + 0x3FFA], 0x00);
        assert_eq!(rom[16 + 0x3FFB], 0x90);
    }

    #[test]
    fn mmc1_banks_are_numbered() {
        let rom = build_mmc1(4, 0);
        assert_eq!(rom[6] >> 4, 1);
        assert_eq!(rom[16], 0);
        assert_eq!(rom[16 + 3 * PRG_16K], 3);
    }
}
