use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One poll of the pointer: cursor position plus the two main buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseState {
    pub x: i32,
    pub y: i32,
    pub left: bool,
    pub right: bool,
}

impl MouseState {
    /// Coordinate reported on both axes when the position could not be read.
    pub const UNAVAILABLE: i32 = -1;

    pub fn from_cursor(pos: Option<(i32, i32)>, left: bool, right: bool) -> Self {
        let (x, y) = pos.unwrap_or((Self::UNAVAILABLE, Self::UNAVAILABLE));
        Self { x, y, left, right }
    }

    pub fn position_unavailable(&self) -> bool {
        self.x == Self::UNAVAILABLE && self.y == Self::UNAVAILABLE
    }

    pub fn status_line(&self) -> String {
        self.to_string()
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        let mut msg = serde_json::to_vec(self).expect("MouseState should serialize");
        msg.push(b'\n');
        msg
    }
}

fn on_off(pressed: bool) -> &'static str {
    if pressed {
        "ON"
    } else {
        "OFF"
    }
}

impl fmt::Display for MouseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Position: ({}, {}) Buttons: Left: {} | Right: {}",
            self.x,
            self.y,
            on_off(self.left),
            on_off(self.right)
        )
    }
}

impl FromStr for MouseState {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}
