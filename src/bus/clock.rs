/*!
Master clock: the scheduler that keeps CPU, video and audio in step.

Tick model
- One master tick is one PPU dot.
- Every tick steps the video unit.
- Ticks whose counter is a multiple of 3 also step the CPU (one CPU cycle,
  see `Cpu::step`) and the audio unit, giving the fixed 3:1 PPU:CPU ratio.
- Order within a CPU tick: CPU, then video, then audio.

Batches and pacing
- `run_ticks` / `run_frame` execute fixed batches. A frame is
  `ClockConfig::ticks_per_frame` ticks.
- `advance(dt)` feeds wall-clock time to the `Pacer`, which hands back the
  number of whole frames now due; leftover time carries to the next call.
- The loop that waits between calls belongs to the embedding application.

Failure
- The first CPU error stops the clock. The tick that hit it returns
  `ClockError::Cpu`; every later batch call returns `ClockError::Stopped`
  until `reset`.
*/

use std::time::Duration;

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::error::ClockError;
use crate::peripheral::{AudioUnit, NullAudio, NullVideo, VideoUnit};

/// 341 dots x 262 scanlines.
pub const NTSC_TICKS_PER_FRAME: u32 = 89_342;
pub const NTSC_FRAME_RATE: f64 = 60.0988;
pub const TICKS_PER_CPU_CYCLE: u64 = 3;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClockConfig {
    pub ticks_per_frame: u32,
    pub target_fps: f64,
    /// Multiplier on real-time speed (2.0 runs frames twice as often).
    pub speed: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            ticks_per_frame: NTSC_TICKS_PER_FRAME,
            target_fps: NTSC_FRAME_RATE,
            speed: 1.0,
        }
    }
}

impl ClockConfig {
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_target_fps(mut self, fps: f64) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn with_ticks_per_frame(mut self, ticks: u32) -> Self {
        self.ticks_per_frame = ticks;
        self
    }
}

/// Wall-clock accumulator that turns elapsed time into whole frames.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pacer {
    budget: Duration,
    accumulator: Duration,
}

impl Pacer {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            budget: Self::budget_for(config),
            accumulator: Duration::ZERO,
        }
    }

    /// `1 / (target_fps * speed)`. A non-positive or non-finite rate never
    /// schedules a frame.
    fn budget_for(config: &ClockConfig) -> Duration {
        let rate = config.target_fps * config.speed;
        if !rate.is_finite() || rate <= 0.0 {
            return Duration::MAX;
        }
        Duration::try_from_secs_f64(1.0 / rate)
            .unwrap_or(Duration::MAX)
            .max(Duration::from_nanos(1))
    }

    pub fn frame_budget(&self) -> Duration {
        self.budget
    }

    /// Add `dt` and return how many frames are due, saturating at
    /// `u32::MAX`. The remainder is kept.
    pub fn accumulate(&mut self, dt: Duration) -> u32 {
        self.accumulator = self.accumulator.saturating_add(dt);
        if self.budget == Duration::MAX {
            return 0;
        }
        let whole = self.accumulator.as_nanos() / self.budget.as_nanos();
        let due = u32::try_from(whole).unwrap_or(u32::MAX);
        // due <= accumulator / budget, so the product cannot overflow
        self.accumulator -= self.budget * due;
        due
    }

    /// Time carried into the next `accumulate`.
    pub fn leftover(&self) -> Duration {
        self.accumulator
    }

    /// How long until another frame becomes due.
    pub fn time_until_next_frame(&self) -> Duration {
        self.budget.saturating_sub(self.accumulator)
    }

    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

pub struct MasterClock<V: VideoUnit = NullVideo, A: AudioUnit = NullAudio> {
    cpu: Cpu,
    bus: Bus,
    video: V,
    audio: A,
    config: ClockConfig,
    pacer: Pacer,
    ticks: u64,
    frames: u64,
    running: bool,
}

impl<V: VideoUnit, A: AudioUnit> MasterClock<V, A> {
    /// Take ownership of the machine and reset the CPU from the bus vectors.
    pub fn new(mut bus: Bus, video: V, audio: A, config: ClockConfig) -> Self {
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        Self {
            cpu,
            bus,
            video,
            audio,
            pacer: Pacer::new(&config),
            config,
            ticks: 0,
            frames: 0,
            running: true,
        }
    }

    /// Advance one master tick.
    pub fn tick(&mut self) -> Result<(), ClockError> {
        if !self.running {
            return Err(ClockError::Stopped);
        }

        let cpu_tick = self.ticks % TICKS_PER_CPU_CYCLE == 0;
        if cpu_tick {
            if let Err(e) = self.cpu.step(&mut self.bus) {
                self.running = false;
                log::warn!("clock stopped at tick {}: {e}", self.ticks);
                return Err(e.into());
            }
        }

        self.video.step(self.bus.ppu_view());

        if cpu_tick {
            self.audio.step(self.bus.apu_view());
        }

        self.ticks = self.ticks.wrapping_add(1);
        Ok(())
    }

    pub fn run_ticks(&mut self, count: u64) -> Result<(), ClockError> {
        for _ in 0..count {
            self.tick()?;
        }
        Ok(())
    }

    /// Run one fixed-size batch of `ticks_per_frame` ticks.
    pub fn run_frame(&mut self) -> Result<(), ClockError> {
        self.run_ticks(self.config.ticks_per_frame as u64)?;
        self.frames += 1;
        Ok(())
    }

    /// Account `dt` of wall-clock time and run every frame it makes due.
    /// Returns the number of frames run.
    pub fn advance(&mut self, dt: Duration) -> Result<u32, ClockError> {
        if !self.running {
            return Err(ClockError::Stopped);
        }
        let due = self.pacer.accumulate(dt);
        for _ in 0..due {
            self.run_frame()?;
        }
        Ok(due)
    }

    /// Power-cycle: bus state, CPU (from the reset vector), peripherals and
    /// counters. Restarts a stopped clock.
    pub fn reset(&mut self) {
        self.bus.reset();
        self.cpu.reset(&mut self.bus);
        self.video.reset();
        self.audio.reset();
        self.pacer.reset();
        self.ticks = 0;
        self.frames = 0;
        self.running = true;
    }

    /// Change the real-time multiplier. Accumulated time is kept.
    pub fn set_speed(&mut self, speed: f64) {
        self.config.speed = speed;
        self.pacer.budget = Pacer::budget_for(&self.config);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn video(&self) -> &V {
        &self.video
    }

    pub fn video_mut(&mut self) -> &mut V {
        &mut self.video
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{ApuView, PpuView};
    use crate::cartridge::Cartridge;
    use crate::error::CpuError;
    use crate::test_utils::build_nrom_with_prg;

    #[derive(Default)]
    struct CountingVideo {
        steps: u64,
        resets: u32,
    }

    impl VideoUnit for CountingVideo {
        fn step(&mut self, _bus: PpuView<'_>) {
            self.steps += 1;
        }
        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    #[derive(Default)]
    struct CountingAudio {
        steps: u64,
    }

    impl AudioUnit for CountingAudio {
        fn step(&mut self, _bus: ApuView<'_>) {
            self.steps += 1;
        }
    }

    fn clock_with(prg: &[u8], config: ClockConfig) -> MasterClock<CountingVideo, CountingAudio> {
        let rom = build_nrom_with_prg(prg, Some((0x8000, 0x8000)));
        let mut bus = Bus::new();
        bus.attach_cartridge(Cartridge::from_ines_bytes(&rom).expect("parse"));
        MasterClock::new(bus, CountingVideo::default(), CountingAudio::default(), config)
    }

    // LDA #$05; STA $0010; JMP $8000
    const LOOP: [u8; 8] = [0xA9, 0x05, 0x8D, 0x10, 0x00, 0x4C, 0x00, 0x80];

    #[test]
    fn video_every_tick_cpu_and_audio_every_third() {
        let mut clock = clock_with(&LOOP, ClockConfig::default());
        clock.run_ticks(9).unwrap();
        assert_eq!(clock.video().steps, 9);
        assert_eq!(clock.audio().steps, 3);
        assert_eq!(clock.ticks(), 9);
        // Ticks 0, 3, 6 are CPU cycles: LDA #imm (2) then STA abs begins.
        assert_eq!(clock.cpu().a(), 0x05);
        assert_eq!(clock.cpu().pc(), 0x8005);
    }

    #[test]
    fn loop_program_reaches_steady_state() {
        let mut clock = clock_with(&LOOP, ClockConfig::default());
        // 2 + 4 + 3 CPU cycles per iteration; run a few iterations.
        clock.run_ticks(9 * 3 * 4).unwrap();
        assert_eq!(clock.cpu().a(), 0x05);
        assert_eq!(clock.bus().ram().read(0x0010), 0x05);
        assert_eq!(clock.cpu().pc(), 0x8000);
        assert_eq!(clock.cpu().remaining_cycles(), 0);
    }

    #[test]
    fn run_frame_counts_frames() {
        let config = ClockConfig::default().with_ticks_per_frame(30);
        let mut clock = clock_with(&LOOP, config);
        clock.run_frame().unwrap();
        clock.run_frame().unwrap();
        assert_eq!(clock.frames(), 2);
        assert_eq!(clock.ticks(), 60);
        assert_eq!(clock.audio().steps, 20);
    }

    #[test]
    fn cpu_error_stops_the_clock_until_reset() {
        // NOP; BRK
        let mut clock = clock_with(&[0xEA, 0x00], ClockConfig::default());
        let err = clock.run_ticks(100).unwrap_err();
        assert_eq!(
            err,
            ClockError::Cpu(CpuError::UnimplementedOpcode {
                opcode: 0x00,
                pc: 0x8001,
                instruction_count: 1,
            })
        );
        assert!(!clock.is_running());
        // NOP occupies CPU ticks 0 and 3; BRK is fetched on tick 6.
        assert_eq!(clock.ticks(), 6);
        assert_eq!(clock.tick(), Err(ClockError::Stopped));
        assert_eq!(clock.run_frame(), Err(ClockError::Stopped));
        assert_eq!(clock.advance(Duration::from_secs(1)), Err(ClockError::Stopped));

        clock.reset();
        assert!(clock.is_running());
        assert_eq!(clock.ticks(), 0);
        assert_eq!(clock.cpu().pc(), 0x8000);
        assert_eq!(clock.video().resets, 1);
    }

    #[test]
    fn pacer_budget_follows_speed() {
        let normal = Pacer::new(&ClockConfig::default().with_target_fps(50.0));
        assert_eq!(normal.frame_budget(), Duration::from_millis(20));
        let double = Pacer::new(&ClockConfig::default().with_target_fps(50.0).with_speed(2.0));
        assert_eq!(double.frame_budget(), Duration::from_millis(10));
        let paused = Pacer::new(&ClockConfig::default().with_speed(0.0));
        assert_eq!(paused.frame_budget(), Duration::MAX);
    }

    #[test]
    fn pacer_carries_leftover_time() {
        let mut pacer = Pacer::new(&ClockConfig::default());
        let budget = pacer.frame_budget();
        assert_eq!(pacer.accumulate(budget / 2), 0);
        assert_eq!(pacer.leftover(), budget / 2);
        assert_eq!(pacer.accumulate(budget - budget / 2), 1);
        assert_eq!(pacer.leftover(), Duration::ZERO);
        assert_eq!(pacer.accumulate(budget * 3 + budget / 4), 3);
        assert_eq!(pacer.leftover(), budget / 4);
        assert_eq!(pacer.time_until_next_frame(), budget - budget / 4);
    }

    #[test]
    fn advance_runs_whole_frames_only() {
        let config = ClockConfig::default()
            .with_target_fps(100.0)
            .with_ticks_per_frame(12);
        let mut clock = clock_with(&LOOP, config);
        assert_eq!(clock.advance(Duration::from_millis(25)).unwrap(), 2);
        assert_eq!(clock.frames(), 2);
        assert_eq!(clock.ticks(), 24);
        assert_eq!(clock.advance(Duration::from_millis(5)).unwrap(), 1);
        assert_eq!(clock.frames(), 3);
    }

    #[test]
    fn set_speed_keeps_accumulated_time() {
        let config = ClockConfig::default().with_target_fps(100.0).with_ticks_per_frame(3);
        let mut clock = clock_with(&LOOP, config);
        assert_eq!(clock.advance(Duration::from_millis(6)).unwrap(), 0);
        clock.set_speed(2.0);
        assert_eq!(clock.pacer().frame_budget(), Duration::from_millis(5));
        assert_eq!(clock.pacer().leftover(), Duration::from_millis(6));
        assert_eq!(clock.advance(Duration::from_millis(4)).unwrap(), 2);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn non_finite_rate_pauses_the_pacer() {
        for speed in [f64::INFINITY, f64::NAN, -1.0] {
            let mut pacer = Pacer::new(&ClockConfig::default().with_speed(speed));
            assert_eq!(pacer.frame_budget(), Duration::MAX);
            assert_eq!(pacer.accumulate(Duration::from_secs(5)), 0);
            assert_eq!(pacer.accumulate(Duration::MAX), 0);
        }
    }

    #[test]
    fn accumulate_saturates_the_frame_count() {
        // 1 ns budget: five seconds is 5e9 frames, past u32::MAX.
        let mut pacer = Pacer::new(&ClockConfig::default().with_target_fps(2e9));
        assert_eq!(pacer.frame_budget(), Duration::from_nanos(1));
        assert_eq!(pacer.accumulate(Duration::from_secs(5)), u32::MAX);
        let rest = 5_000_000_000 - u32::MAX as u64;
        assert_eq!(pacer.leftover(), Duration::from_nanos(rest));
        assert_eq!(pacer.accumulate(Duration::ZERO), rest as u32);
        assert_eq!(pacer.leftover(), Duration::ZERO);
    }

    #[test]
    fn paused_clock_runs_nothing() {
        let config = ClockConfig::default().with_speed(f64::INFINITY);
        let mut clock = clock_with(&LOOP, config);
        assert_eq!(clock.advance(Duration::from_secs(60)).unwrap(), 0);
        assert_eq!(clock.ticks(), 0);
    }
}
