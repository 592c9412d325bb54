//! Cycle-accurate Ricoh 2C02 PPU (Picture Processing Unit) emulator for NES.
//!
//! This crate renders the NES's 256×240 video output dot-by-dot, matching
//! the real PPU's scanline/dot timing (341 dots × 262 scanlines per frame,
//! with the familiar odd-frame short scanline) closely enough to support
//! mid-frame raster tricks such as split-screen status bars.
//!
//! # Architecture
//!
//! [`Ppu::read_register`] / [`Ppu::write_register`] model the CPU-visible
//! $2000-$2007 registers. Both take a CHR-access closure so the PPU can
//! fetch/store pattern table data through the cartridge mapper without this
//! crate depending on one. [`Ppu::step_with_chr`] advances the PPU by one
//! dot using the same closure to fetch tile and sprite pattern bytes during
//! rendering; [`Ppu::step`] is a convenience wrapper for callers that don't
//! need real pattern data (e.g. timing-only tests).
//!
//! Nametable RAM and its mirroring live inside [`Vram`]; palette RAM is part
//! of the same struct since real hardware keeps it on-chip rather than on
//! the mirrored CIRAM the mapper's mirroring mode controls.
//!
//! # Example
//!
//! ```no_run
//! use rustynes_ppu::{Mirroring, Ppu};
//!
//! let mut ppu = Ppu::new(Mirroring::Horizontal);
//!
//! // Enable NMI-on-VBlank and background rendering.
//! ppu.write_register(0x2000, 0x80, |_addr, _value| {});
//! ppu.write_register(0x2001, 0x08, |_addr, _value| {});
//!
//! // Step the PPU (call 3 times per CPU cycle for NTSC), wiring the
//! // closure to the cartridge mapper's CHR reads.
//! let (_, nmi) = ppu.step_with_chr(|_pattern_addr| 0u8);
//! if nmi {
//!     // Trigger NMI in the CPU.
//! }
//! ```
//!
//! # Features
//!
//! - `serde`: Enable serialization support for save states.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod background;
mod oam;
mod ppu;
mod registers;
mod scroll;
mod sprites;
mod timing;
mod vram;

pub use background::Background;
pub use oam::{Oam, SecondaryOam, Sprite, SpriteAttributes};
pub use ppu::{Ppu, FRAME_HEIGHT, FRAME_SIZE, FRAME_WIDTH};
pub use registers::{PpuCtrl, PpuMask, PpuStatus};
pub use scroll::ScrollRegisters;
pub use sprites::{SpriteEvaluator, SpriteRenderer};
pub use timing::Timing;
pub use vram::{Mirroring, Vram};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ppu_integration() {
        let mut ppu = Ppu::new(Mirroring::Horizontal);

        // Enable background rendering.
        ppu.write_register(0x2001, 0x08, |_, _| {});

        for _ in 0..100 {
            ppu.step();
        }

        assert_eq!(ppu.frame_buffer().len(), FRAME_SIZE);
    }

    #[test]
    fn test_frame_completion() {
        let mut ppu = Ppu::new(Mirroring::Vertical);

        let mut frames = 0;
        // One full NTSC frame is 341*262 dots (less one on odd frames);
        // stepping well past two frames must complete at least one.
        for _ in 0..(341 * 262 * 2) {
            let (frame_complete, _) = ppu.step();
            if frame_complete {
                frames += 1;
            }
        }

        assert!(frames >= 1);
    }

    #[test]
    fn test_vblank_nmi() {
        let mut ppu = Ppu::new(Mirroring::Horizontal);

        // Enable NMI on VBlank.
        ppu.write_register(0x2000, 0x80, |_, _| {});

        let mut nmi_fired = false;
        for _ in 0..(341 * 262) {
            let (_, nmi) = ppu.step();
            if nmi {
                nmi_fired = true;
                break;
            }
        }

        assert!(nmi_fired);
    }
}
