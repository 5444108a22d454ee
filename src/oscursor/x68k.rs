//! X68000 backend driven by IOCS firmware calls (`trap #15`).
//!
//! The register decoding is plain Rust and runs anywhere; only [`TrapIocs`]
//! needs the real machine.

use super::{Flow, MouseInput, MouseState};
use anyhow::Result;

/// IOCS function numbers, passed in `d0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IocsCall {
    /// `_B_KEYINP`: wait for and consume a key.
    KeyInp = 0x00,
    /// `_B_KEYSNS`: non-zero in `d0` when a key is waiting.
    KeySns = 0x01,
    MsInit = 0x70,
    MsCurOn = 0x71,
    /// `_MS_GETDT`: relative motion and button bytes.
    MsGetDt = 0x74,
    /// `_MS_CURGT`: absolute cursor position.
    MsCurGt = 0x75,
    /// `_SKEY_MOD`: software keyboard mode, `d1 = 0` hides it.
    SkeyMod = 0x7d,
}

pub trait Iocs {
    /// Issues `func` with `d1` as argument and returns `d0`.
    fn call(&mut self, func: IocsCall, d1: u32) -> u32;
}

/// `_MS_GETDT` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseData {
    pub dx: i8,
    pub dy: i8,
    pub left: bool,
    pub right: bool,
}

impl MouseData {
    pub fn decode(d0: u32) -> Self {
        Self {
            dx: (d0 >> 24) as u8 as i8,
            dy: (d0 >> 16) as u8 as i8,
            left: (d0 >> 8) & 0xff != 0,
            right: d0 & 0xff != 0,
        }
    }
}

/// Decodes `_MS_CURGT`: x in the high word, y in the low word.
pub fn decode_cursor(d0: u32) -> (i32, i32) {
    (((d0 >> 16) & 0xffff) as i32, (d0 & 0xffff) as i32)
}

pub struct X68kMouse<I: Iocs> {
    iocs: I,
}

impl<I: Iocs> X68kMouse<I> {
    pub fn new(iocs: I) -> Self {
        Self { iocs }
    }

    pub fn into_inner(self) -> I {
        self.iocs
    }
}

impl<I: Iocs> MouseInput for X68kMouse<I> {
    fn init(&mut self) -> Result<()> {
        self.iocs.call(IocsCall::MsInit, 0);
        self.iocs.call(IocsCall::MsCurOn, 0);
        self.iocs.call(IocsCall::SkeyMod, 0);
        log::debug!("IOCS mouse initialized");
        Ok(())
    }

    fn query(&mut self) -> MouseState {
        let pos = decode_cursor(self.iocs.call(IocsCall::MsCurGt, 0));
        let data = MouseData::decode(self.iocs.call(IocsCall::MsGetDt, 0));
        MouseState::from_cursor(Some(pos), data.left, data.right)
    }

    fn idle(&mut self) -> Flow {
        if self.iocs.call(IocsCall::KeySns, 0) != 0 {
            Flow::Exit
        } else {
            Flow::Continue
        }
    }

    fn finish(&mut self) {
        // drop the key that ended the loop so it does not reach the shell
        self.iocs.call(IocsCall::KeyInp, 0);
    }
}

/// Real firmware calls. Only available when building for the X68000 itself.
#[cfg(all(target_arch = "m68k", feature = "x68k"))]
pub struct TrapIocs;

#[cfg(all(target_arch = "m68k", feature = "x68k"))]
impl Iocs for TrapIocs {
    fn call(&mut self, func: IocsCall, d1: u32) -> u32 {
        let d0: u32;
        unsafe {
            core::arch::asm!(
                "trap #15",
                inout("d0") func as u32 => d0,
                inout("d1") d1 => _,
            );
        }
        d0
    }
}
