//! Platform mouse input.
//!
//! Each backend answers "where is the pointer and which buttons are down" and
//! tells the display loop when the platform wants it to stop.

use anyhow::Result;
pub use mousegx_status::MouseState;

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
pub use windows::*;

pub mod simulated;
pub mod x68k;

/// Whether the display loop keeps going after a platform step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub trait MouseInput {
    /// Brings up the input subsystem. This is the only step allowed to fail.
    fn init(&mut self) -> Result<()>;

    /// Services pending platform events before a poll.
    fn pump(&mut self) -> Flow {
        Flow::Continue
    }

    /// Reads the current pointer state. An unreadable position is reported as
    /// [`MouseState::UNAVAILABLE`] on both axes.
    fn query(&mut self) -> MouseState;

    /// Runs between frames, after the frame has been written.
    fn idle(&mut self) -> Flow;

    /// Called once after the loop has stopped.
    fn finish(&mut self) {}
}

impl<T: MouseInput + ?Sized> MouseInput for Box<T> {
    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn pump(&mut self) -> Flow {
        (**self).pump()
    }

    fn query(&mut self) -> MouseState {
        (**self).query()
    }

    fn idle(&mut self) -> Flow {
        (**self).idle()
    }

    fn finish(&mut self) {
        (**self).finish()
    }
}
