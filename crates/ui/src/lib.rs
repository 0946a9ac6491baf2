pub mod terminal;
pub mod vm;

pub use terminal::{TerminalView, render_menu, render_screen};
