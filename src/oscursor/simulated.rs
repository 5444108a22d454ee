//! Scripted mouse input for running the display loop without hardware.
//!
//! One frame per line:
//!
//! ```text
//! # x y buttons
//! 10 20
//! 11 20 L
//! - R      # position unreadable, right button down
//! quit     # same as closing the window
//! ```
//!
//! A `fail-init` line anywhere makes setup fail. The script ending also ends
//! the loop.

use super::{Flow, MouseInput, MouseState};
use anyhow::{anyhow, bail, Context, Result};
use std::collections::VecDeque;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    Frame {
        pos: Option<(i32, i32)>,
        left: bool,
        right: bool,
    },
    Quit,
}

#[derive(Debug, Default)]
pub struct SimulatedMouse {
    events: VecDeque<SimEvent>,
    fail_init: bool,
    frames_read: usize,
}

fn parse_coord(s: &str, lnum: usize) -> Result<i32> {
    s.parse()
        .map_err(|e| anyhow!("line {lnum}: invalid coordinate {s:?}: {e}"))
}

fn parse_line(line: &str, lnum: usize) -> Result<SimEvent> {
    let mut tokens = line.split_whitespace();
    let pos = match tokens.next() {
        Some("quit") => {
            if let Some(extra) = tokens.next() {
                bail!("line {lnum}: unexpected {extra:?} after quit");
            }
            return Ok(SimEvent::Quit);
        }
        Some("-") => None,
        Some(x) => {
            let x = parse_coord(x, lnum)?;
            let y = tokens
                .next()
                .ok_or_else(|| anyhow!("line {lnum}: missing y coordinate"))?;
            Some((x, parse_coord(y, lnum)?))
        }
        None => bail!("line {lnum}: empty frame"),
    };

    let (mut left, mut right) = (false, false);
    for token in tokens {
        match token {
            "L" | "l" => left = true,
            "R" | "r" => right = true,
            other => bail!("line {lnum}: unknown button {other:?}, expected L or R"),
        }
    }
    Ok(SimEvent::Frame { pos, left, right })
}

impl SimulatedMouse {
    pub fn new(events: impl IntoIterator<Item = SimEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_init: true,
            ..Default::default()
        }
    }

    pub fn parse(script: &str) -> Result<Self> {
        let mut sim = Self::default();
        for (i, raw) in script.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            if line == "fail-init" {
                sim.fail_init = true;
                continue;
            }
            sim.events.push_back(parse_line(line, i + 1)?);
        }
        log::debug!("simulated script has {} event(s)", sim.events.len());
        Ok(sim)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read simulation script {}", path.display()))?;
        Self::parse(&script).with_context(|| format!("in {}", path.display()))
    }

    /// Number of frames handed out by [`MouseInput::query`] so far.
    pub fn frames_read(&self) -> usize {
        self.frames_read
    }
}

impl MouseInput for SimulatedMouse {
    fn init(&mut self) -> Result<()> {
        if self.fail_init {
            bail!("simulated input subsystem failed to initialize");
        }
        Ok(())
    }

    fn pump(&mut self) -> Flow {
        match self.events.front() {
            None | Some(SimEvent::Quit) => Flow::Exit,
            Some(SimEvent::Frame { .. }) => Flow::Continue,
        }
    }

    fn query(&mut self) -> MouseState {
        match self.events.pop_front() {
            Some(SimEvent::Frame { pos, left, right }) => {
                self.frames_read += 1;
                MouseState::from_cursor(pos, left, right)
            }
            Some(SimEvent::Quit) => {
                self.events.push_front(SimEvent::Quit);
                MouseState::from_cursor(None, false, false)
            }
            None => MouseState::from_cursor(None, false, false),
        }
    }

    fn idle(&mut self) -> Flow {
        Flow::Continue
    }
}
