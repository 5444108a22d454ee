use anyhow::Result;
use clap::Parser;
use mousegx::oscursor::simulated::SimulatedMouse;
use mousegx::{MouseInput, OutputFormat};
use simplelog::*;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, verbatim_doc_comment)]
/// Prints the mouse cursor position and button state on one console line.
///
/// On Windows, close the small window that opens to exit.
/// On the X68000, press any key to exit.
struct Args {
    /// Delay between polls in milliseconds. Only used where the platform
    /// needs throttling (Windows).
    #[arg(short, long, default_value_t = 50)]
    interval: u64,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Line)]
    format: OutputFormat,

    /// Read frames from a script instead of the real mouse.
    #[arg(short, long, value_name = "FILE")]
    simulate: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging; implies --debug as well.
    #[arg(short, long)]
    trace: bool,
}

#[cfg(target_os = "windows")]
fn native_input(args: &Args) -> Result<Box<dyn MouseInput>> {
    Ok(Box::new(mousegx::oscursor::WinMouse::new(
        Duration::from_millis(args.interval),
    )))
}

#[cfg(all(target_arch = "m68k", feature = "x68k"))]
fn native_input(_args: &Args) -> Result<Box<dyn MouseInput>> {
    use mousegx::oscursor::x68k::{TrapIocs, X68kMouse};
    Ok(Box::new(X68kMouse::new(TrapIocs)))
}

#[cfg(not(any(target_os = "windows", all(target_arch = "m68k", feature = "x68k"))))]
fn native_input(args: &Args) -> Result<Box<dyn MouseInput>> {
    log::debug!("ignoring interval {:?}", Duration::from_millis(args.interval));
    anyhow::bail!("no native mouse backend for this platform, use --simulate <FILE>")
}

fn cli_init() -> Args {
    let args = Args::parse();

    let log_lvl = match (args.debug, args.trace) {
        (_, true) => LevelFilter::Trace,
        (true, false) => LevelFilter::Debug,
        (false, false) => LevelFilter::Info,
    };

    let mut log_cfg = ConfigBuilder::new();
    if let Err(e) = log_cfg.set_time_offset_to_local() {
        eprintln!("WARNING: could not set log TZ to local: {e:?}");
    };
    log_cfg.set_time_format_rfc3339();
    // stdout belongs to the status line
    CombinedLogger::init(vec![TermLogger::new(
        log_lvl,
        log_cfg.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )])
    .expect("logger can init");
    log::info!("mousegx v{} starting", env!("CARGO_PKG_VERSION"));
    args
}

fn main_impl(args: &Args) -> Result<()> {
    let mut input: Box<dyn MouseInput> = match &args.simulate {
        Some(path) => {
            log::info!("using simulated input from {}", path.display());
            Box::new(SimulatedMouse::from_file(path)?)
        }
        None => native_input(args)?,
    };
    let stdout = std::io::stdout();
    mousegx::run(&mut input, &mut stdout.lock(), args.format)
}

fn main() {
    let args = cli_init();
    if let Err(e) = main_impl(&args) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
