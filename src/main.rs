use nescore::{Bus, Cartridge, ClockConfig, MasterClock, ReloadServicingApu, TimingPpu};

fn build_demo_ines() -> Vec<u8> {
    let mut header = Vec::with_capacity(16);
    header.extend_from_slice(b"NES\x1A");
    header.push(1); // 1 x 16KB PRG
    header.push(1); // 1 x 8KB CHR
    header.push(0); // flags6: horizontal mirroring, mapper 0
    header.push(0); // flags7
    header.push(1); // 8KB PRG-RAM
    header.extend_from_slice(&[0u8; 7]);

    let mut prg = vec![0xEAu8; 16 * 1024];

    // Reset handler at $8000: enable NMI, then count frames in $0200.
    let program: &[u8] = &[
        0xA9, 0x80, // LDA #$80
        0x8D, 0x00, 0x20, // STA $2000
        0xA9, 0x10, // LDA #$10
        0x69, 0x05, // ADC #$05 => A = 0x15
        0x85, 0x10, // STA $10
        0x4C, 0x0B, 0x80, // JMP $800B (spin)
    ];
    prg[..program.len()].copy_from_slice(program);

    // NMI handler at $9000: INC $0200; RTI
    let handler: &[u8] = &[0xEE, 0x00, 0x02, 0x40];
    prg[0x1000..0x1000 + handler.len()].copy_from_slice(handler);

    let (reset, nmi, irq) = (0x8000u16, 0x9000u16, 0x8000u16);
    prg[0x3FFA..0x3FFC].copy_from_slice(&nmi.to_le_bytes());
    prg[0x3FFC..0x3FFE].copy_from_slice(&reset.to_le_bytes());
    prg[0x3FFE..0x4000].copy_from_slice(&irq.to_le_bytes());

    let mut rom = header;
    rom.extend_from_slice(&prg);
    rom.extend_from_slice(&[0u8; 8 * 1024]);
    rom
}

fn main() {
    let rom = build_demo_ines();
    let cart = match Cartridge::from_ines_bytes(&rom) {
        Ok(cart) => cart,
        Err(e) => {
            eprintln!("failed to parse iNES: {e}");
            std::process::exit(1);
        }
    };

    let mut bus = Bus::new();
    bus.attach_cartridge(cart);

    let mut clock = MasterClock::new(
        bus,
        TimingPpu::new(),
        ReloadServicingApu::new(),
        ClockConfig::default(),
    );

    for _ in 0..2 {
        if let Err(e) = clock.run_frame() {
            eprintln!("stopped: {e}");
            std::process::exit(1);
        }
    }

    let cpu = clock.cpu();
    let ram = clock.bus().ram();
    println!("frames: {}", clock.frames());
    println!("A: 0x{:02X}", cpu.a());
    println!("X: 0x{:02X}", cpu.x());
    println!("Y: 0x{:02X}", cpu.y());
    println!("SP: 0x{:02X}", cpu.sp());
    println!("PC: 0x{:04X}", cpu.pc());
    println!("P (flags): 0b{:08b}", cpu.status());
    println!("instructions: {}", cpu.instruction_count());
    println!("mem[0x0010]: 0x{:02X}", ram.read(0x0010));
    println!("mem[0x0200] (NMIs): {}", ram.read(0x0200));
}
