#![cfg_attr(
    all(target_arch = "m68k", feature = "x68k"),
    feature(asm_experimental_arch)
)]

pub mod display;
pub mod oscursor;

pub use display::{run, OutputFormat};
pub use oscursor::{Flow, MouseInput, MouseState};
