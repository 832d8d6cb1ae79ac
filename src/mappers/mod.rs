//! Bank-switching mapper implementations beyond the fixed NROM layout.

pub mod mmc1;

pub use mmc1::{Mmc1, Mmc1Registers, Mmc1Target};
