/*!
Cartridge: iNES image loader and mapper factory.

Header layout (16 bytes):
- bytes 0..3: ASCII tag "NES"
- byte 3:     format discriminant, looked up in `FORMATS` (0x1A = iNES)
- byte 4:     PRG-ROM size in 16 KiB units
- byte 5:     CHR-ROM size in 8 KiB units (0 = board carries 8 KiB CHR-RAM)
- byte 6:     mirroring (bit 0), battery (bit 1), trainer (bit 2),
              four-screen override (bit 3), mapper low nibble (bits 4-7)
- byte 7:     NES 2.0 marker (bits 2-3 == 0b10), mapper high nibble (bits 4-7)
- byte 8:     PRG-RAM size in 8 KiB units (0 = 8 KiB by convention)

A 512-byte trainer, when flagged, sits between the header and PRG-ROM and is
skipped. NES 2.0 images are read through their iNES-compatible fields.

Mapper factory:
- 0: `Nrom`
- 1: `Mmc1`
- anything else: a warning is logged and `Unmapped` is installed so the
  session can still start. `is_supported()` reports which happened.
*/

use crate::error::CartridgeError;
use crate::mapper::{CHR_BANK_8K, Mapper, MapperMirroring, Nrom, PRG_BANK_16K, PRG_RAM_8K, Unmapped};
use crate::mappers::Mmc1;

pub const HEADER_LEN: usize = 16;
pub const TRAINER_LEN: usize = 512;

const TAG: [u8; 3] = *b"NES";

/// Container formats recognised by the discriminant byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Ines,
}

const FORMATS: &[(u8, ImageFormat)] = &[(0x1A, ImageFormat::Ines)];

/// Nametable arrangement declared by the header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

/// Parsed header fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub format: ImageFormat,
    pub prg_rom_len: usize,
    pub chr_rom_len: usize,
    pub mirroring: Mirroring,
    pub battery: bool,
    pub has_trainer: bool,
    pub nes2: bool,
    pub mapper_id: u16,
    pub prg_ram_len: usize,
}

impl Header {
    pub fn parse(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.len() < HEADER_LEN {
            return Err(CartridgeError::TooShort(data.len()));
        }
        let tag = [data[0], data[1], data[2]];
        if tag != TAG {
            return Err(CartridgeError::BadTag(tag));
        }
        let format = FORMATS
            .iter()
            .find(|(d, _)| *d == data[3])
            .map(|(_, f)| *f)
            .ok_or(CartridgeError::UnknownFormat(data[3]))?;

        let flags6 = data[6];
        let flags7 = data[7];

        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let prg_ram_units = data[8] as usize;

        Ok(Self {
            format,
            prg_rom_len: data[4] as usize * PRG_BANK_16K,
            chr_rom_len: data[5] as usize * CHR_BANK_8K,
            mirroring,
            battery: flags6 & 0x02 != 0,
            has_trainer: flags6 & 0x04 != 0,
            nes2: flags7 & 0x0C == 0x08,
            mapper_id: ((flags7 & 0xF0) | (flags6 >> 4)) as u16,
            prg_ram_len: prg_ram_units.max(1) * PRG_RAM_8K,
        })
    }
}

pub struct Cartridge {
    mapper: Box<dyn Mapper>,
    header: Header,
    supported: bool,
}

impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge")
            .field("header", &self.header)
            .field("supported", &self.supported)
            .finish()
    }
}

impl Cartridge {
    /// Parse an in-memory iNES image and build its mapper.
    pub fn from_ines_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        let header = Header::parse(data)?;

        let mut offset = HEADER_LEN;
        if header.has_trainer {
            take(data, offset, TRAINER_LEN, "trainer")?;
            offset += TRAINER_LEN;
        }

        let prg_rom = take(data, offset, header.prg_rom_len, "PRG-ROM")?.to_vec();
        offset += header.prg_rom_len;

        let chr_is_ram = header.chr_rom_len == 0;
        let chr = if chr_is_ram {
            vec![0; CHR_BANK_8K]
        } else {
            take(data, offset, header.chr_rom_len, "CHR-ROM")?.to_vec()
        };

        let (mapper, supported): (Box<dyn Mapper>, bool) = match header.mapper_id {
            0 => (
                Box::new(Nrom::new(prg_rom, chr, chr_is_ram, header.prg_ram_len)),
                true,
            ),
            1 => (
                Box::new(Mmc1::new(prg_rom, vec![0; header.prg_ram_len], chr, chr_is_ram)),
                true,
            ),
            id => {
                log::warn!("mapper {id} is not supported; cartridge space will read as 0");
                (Box::new(Unmapped::new(id)), false)
            }
        };

        log::info!(
            "loaded cartridge: mapper {} PRG {} KiB CHR {} KiB{} mirroring {:?}",
            header.mapper_id,
            header.prg_rom_len / 1024,
            chr_len_kib(header.chr_rom_len),
            if chr_is_ram { " (RAM)" } else { "" },
            header.mirroring
        );

        Ok(Self {
            mapper,
            header,
            supported,
        })
    }

    // -------------- Bus delegation --------------

    #[inline]
    pub fn cpu_read(&mut self, addr: u16) -> u8 {
        self.mapper.cpu_read(addr)
    }

    #[inline]
    pub fn cpu_write(&mut self, addr: u16, value: u8) {
        self.mapper.cpu_write(addr, value);
    }

    #[inline]
    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.mapper.ppu_read(addr)
    }

    #[inline]
    pub fn ppu_write(&mut self, addr: u16, value: u8) {
        self.mapper.ppu_write(addr, value);
    }

    /// Return the mapper to its power-on state.
    pub fn reset(&mut self) {
        self.mapper.reset();
    }

    // -------------- Accessors --------------

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn mapper_id(&self) -> u16 {
        self.header.mapper_id
    }

    /// False when the mapper number has no implementation.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Header mirroring.
    pub fn mirroring(&self) -> Mirroring {
        self.header.mirroring
    }

    /// Runtime mirroring selected by the mapper, if it controls it.
    pub fn mapper_mirroring(&self) -> Option<MapperMirroring> {
        self.mapper.current_mirroring()
    }

    pub fn battery_backed(&self) -> bool {
        self.header.battery
    }

    pub fn prg_rom_len(&self) -> usize {
        self.header.prg_rom_len
    }

    pub fn prg_ram_len(&self) -> usize {
        self.header.prg_ram_len
    }

    pub fn chr_is_ram(&self) -> bool {
        self.header.chr_rom_len == 0
    }
}

fn take<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    section: &'static str,
) -> Result<&'a [u8], CartridgeError> {
    let actual = data.len().saturating_sub(offset);
    if actual < len {
        return Err(CartridgeError::Truncated {
            section,
            expected: len,
            actual,
        });
    }
    Ok(&data[offset..offset + len])
}

fn chr_len_kib(chr_rom_len: usize) -> usize {
    if chr_rom_len == 0 {
        CHR_BANK_8K / 1024
    } else {
        chr_rom_len / 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::build_ines;

    #[test]
    fn parse_simple_nrom_32k_chr8k() {
        let data = build_ines(2, 1, 0b0000_0001, 0, 1, None);
        let mut cart = Cartridge::from_ines_bytes(&data).expect("parse");

        assert_eq!(cart.mapper_id(), 0);
        assert!(cart.is_supported());
        assert_eq!(cart.mirroring(), Mirroring::Vertical);
        assert_eq!(cart.prg_rom_len(), 32 * 1024);
        assert_eq!(cart.prg_ram_len(), 8 * 1024);
        assert!(!cart.chr_is_ram());
        assert_eq!(cart.cpu_read(0x8000), 0xAA);
        assert_eq!(cart.cpu_read(0xFFFF), 0xAA);
        assert_eq!(cart.ppu_read(0x0000), 0xCC);
        assert_eq!(cart.mapper_mirroring(), None);
    }

    #[test]
    fn chr_size_zero_allocates_chr_ram() {
        let data = build_ines(1, 0, 0, 0, 0, None);
        let mut cart = Cartridge::from_ines_bytes(&data).expect("parse");
        assert_eq!(cart.mirroring(), Mirroring::Horizontal);
        assert!(cart.chr_is_ram());
        assert_eq!(cart.prg_ram_len(), 8 * 1024);
        cart.ppu_write(0x0010, 0x5A);
        assert_eq!(cart.ppu_read(0x0010), 0x5A);
        assert_eq!(cart.cpu_read(0x8000), cart.cpu_read(0xC000));
    }

    #[test]
    fn header_flags_decode() {
        let data = build_ines(1, 1, 0b0001_1110, 0b0000_0000, 0, None);
        let header = Header::parse(&data).expect("header");
        assert_eq!(header.mirroring, Mirroring::FourScreen);
        assert!(header.battery);
        assert!(header.has_trainer);
        assert_eq!(header.mapper_id, 1);
        assert_eq!(header.format, ImageFormat::Ines);
    }

    #[test]
    fn mapper_number_split_across_two_bytes() {
        let data = build_ines(1, 1, 0x40, 0x20, 0, None);
        let header = Header::parse(&data).expect("header");
        assert_eq!(header.mapper_id, 0x24);
    }

    #[test]
    fn trainer_is_skipped() {
        let trainer = [0x11u8; 512];
        let data = build_ines(1, 1, 0b0000_0100, 0, 1, Some(&trainer));
        let mut cart = Cartridge::from_ines_bytes(&data).expect("parse");
        assert_eq!(cart.cpu_read(0x8000), 0xAA);
    }

    #[test]
    fn mmc1_is_built_for_mapper_1() {
        let data = build_ines(2, 1, 0x10, 0, 1, None);
        let cart = Cartridge::from_ines_bytes(&data).expect("parse");
        assert_eq!(cart.mapper_id(), 1);
        assert_eq!(cart.mapper_mirroring(), Some(MapperMirroring::SingleScreenLower));
    }

    #[test]
    fn unsupported_mapper_degrades_to_unmapped() {
        let data = build_ines(1, 1, 0x40, 0, 1, None);
        let mut cart = Cartridge::from_ines_bytes(&data).expect("parse");
        assert_eq!(cart.mapper_id(), 4);
        assert!(!cart.is_supported());
        assert_eq!(cart.cpu_read(0x8000), 0);
    }

    #[test]
    fn malformed_images_are_rejected() {
        assert_eq!(
            Cartridge::from_ines_bytes(&[0; 4]).unwrap_err(),
            CartridgeError::TooShort(4)
        );

        let mut bad_tag = build_ines(1, 1, 0, 0, 1, None);
        bad_tag[0] = b'X';
        assert_eq!(
            Cartridge::from_ines_bytes(&bad_tag).unwrap_err(),
            CartridgeError::BadTag(*b"XES")
        );

        let mut bad_format = build_ines(1, 1, 0, 0, 1, None);
        bad_format[3] = 0x1B;
        assert_eq!(
            Cartridge::from_ines_bytes(&bad_format).unwrap_err(),
            CartridgeError::UnknownFormat(0x1B)
        );

        let mut short = build_ines(1, 1, 0, 0, 1, None);
        short.truncate(HEADER_LEN + 100);
        assert!(matches!(
            Cartridge::from_ines_bytes(&short).unwrap_err(),
            CartridgeError::Truncated {
                section: "PRG-ROM",
                actual: 100,
                ..
            }
        ));
    }

    #[test]
    fn nes2_images_read_through_compatible_fields() {
        let data = build_ines(1, 1, 0, 0b0000_1000, 1, None);
        let cart = Cartridge::from_ines_bytes(&data).expect("parse");
        assert!(cart.header().nes2);
        assert!(cart.is_supported());
    }
}
