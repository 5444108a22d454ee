//! The display loop: poll, print in place, wait, repeat until the platform
//! asks to stop.

use crate::oscursor::{Flow, MouseInput, MouseState};
use anyhow::{Context, Result};
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One console line overwritten in place.
    #[default]
    Line,
    /// One JSON object per frame.
    Json,
}

fn write_frame(out: &mut impl Write, state: &MouseState, format: OutputFormat) -> Result<()> {
    match format {
        // trailing blanks clear leftovers from a longer previous line
        OutputFormat::Line => write!(out, "\r{state}  ")?,
        OutputFormat::Json => out.write_all(&state.as_bytes())?,
    }
    out.flush()?;
    Ok(())
}

/// Initializes `input` and runs the display loop until the platform requests
/// exit. Nothing is written if initialization fails.
pub fn run(input: &mut impl MouseInput, out: &mut impl Write, format: OutputFormat) -> Result<()> {
    input
        .init()
        .context("input subsystem failed to initialize")?;
    log::info!("polling mouse state");

    let result = display_loop(input, out, format);
    input.finish();
    let frames = result?;

    if format == OutputFormat::Line && frames > 0 {
        writeln!(out)?;
    }
    log::debug!("display loop stopped after {frames} frame(s)");
    Ok(())
}

fn display_loop(
    input: &mut impl MouseInput,
    out: &mut impl Write,
    format: OutputFormat,
) -> Result<usize> {
    let mut frames = 0;
    let mut last: Option<MouseState> = None;
    loop {
        if input.pump() == Flow::Exit {
            break;
        }
        let state = input.query();
        if last != Some(state) {
            log::trace!("mouse state changed: {state:?}");
            last = Some(state);
        }
        write_frame(out, &state, format)?;
        frames += 1;
        if input.idle() == Flow::Exit {
            break;
        }
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscursor::simulated::SimulatedMouse;
    use anyhow::bail;

    /// Records the order of platform calls and stops after `idle_limit` idles.
    struct Recorder {
        calls: Vec<&'static str>,
        fail_init: bool,
        idle_limit: usize,
        idles: usize,
    }

    impl Recorder {
        fn new(idle_limit: usize) -> Self {
            Self {
                calls: vec![],
                fail_init: false,
                idle_limit,
                idles: 0,
            }
        }
    }

    impl MouseInput for Recorder {
        fn init(&mut self) -> Result<()> {
            self.calls.push("init");
            if self.fail_init {
                bail!("no mouse");
            }
            Ok(())
        }

        fn pump(&mut self) -> Flow {
            self.calls.push("pump");
            Flow::Continue
        }

        fn query(&mut self) -> MouseState {
            self.calls.push("query");
            MouseState::from_cursor(Some((self.idles as i32, 0)), false, false)
        }

        fn idle(&mut self) -> Flow {
            self.calls.push("idle");
            self.idles += 1;
            if self.idles >= self.idle_limit {
                Flow::Exit
            } else {
                Flow::Continue
            }
        }

        fn finish(&mut self) {
            self.calls.push("finish");
        }
    }

    #[test]
    fn test_setup_failure_skips_loop() {
        let mut input = Recorder::new(10);
        input.fail_init = true;
        let mut out = Vec::new();
        let err = run(&mut input, &mut out, OutputFormat::Line).unwrap_err();
        assert!(format!("{err:#}").contains("no mouse"));
        assert!(out.is_empty());
        assert_eq!(input.calls, vec!["init"]);
    }

    #[test]
    fn test_setup_failure_from_script() {
        let mut input = SimulatedMouse::parse("fail-init\n1 2\n").unwrap();
        let mut out = Vec::new();
        assert!(run(&mut input, &mut out, OutputFormat::Json).is_err());
        assert!(out.is_empty());
        assert_eq!(input.frames_read(), 0);
    }

    #[test]
    fn test_call_order() {
        let mut input = Recorder::new(2);
        let mut out = Vec::new();
        run(&mut input, &mut out, OutputFormat::Line).unwrap();
        assert_eq!(
            input.calls,
            vec!["init", "pump", "query", "idle", "pump", "query", "idle", "finish"]
        );
    }

    #[test]
    fn test_runs_until_termination_signal() {
        for limit in [1, 3, 25] {
            let mut input = Recorder::new(limit);
            let mut out = Vec::new();
            run(&mut input, &mut out, OutputFormat::Json).unwrap();
            let text = String::from_utf8(out).unwrap();
            assert_eq!(text.lines().count(), limit);
            assert_eq!(input.idles, limit);
        }
    }

    #[test]
    fn test_line_output_overwrites_in_place() {
        let mut input = SimulatedMouse::parse("10 20\n- L R\n30 40 R\nquit\n99 99\n").unwrap();
        let mut out = Vec::new();
        run(&mut input, &mut out, OutputFormat::Line).unwrap();
        assert_eq!(input.frames_read(), 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\rPosition: (10, 20) Buttons: Left: OFF | Right: OFF  \
             \rPosition: (-1, -1) Buttons: Left: ON | Right: ON  \
             \rPosition: (30, 40) Buttons: Left: OFF | Right: ON  \n"
        );
    }

    #[test]
    fn test_json_output() {
        let mut input = SimulatedMouse::parse("5 6 L\n").unwrap();
        let mut out = Vec::new();
        run(&mut input, &mut out, OutputFormat::Json).unwrap();
        let text = String::from_utf8(out).unwrap();
        let states: Vec<MouseState> = text.lines().map(|l| l.parse().unwrap()).collect();
        assert_eq!(
            states,
            vec![MouseState {
                x: 5,
                y: 6,
                left: true,
                right: false,
            }]
        );
    }

    #[test]
    fn test_immediate_quit_prints_nothing() {
        let mut input = SimulatedMouse::parse("quit\n1 1\n").unwrap();
        let mut out = Vec::new();
        run(&mut input, &mut out, OutputFormat::Line).unwrap();
        assert!(out.is_empty());
    }
}
