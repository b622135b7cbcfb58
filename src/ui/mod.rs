//! Console presentation: stdin prompts, styled output lines, and the
//! numbered menu loop.

mod input;
mod menu;
mod output;

pub use menu::run_menu;
