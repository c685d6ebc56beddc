pub mod icons;
pub mod progress;
pub mod shell;

pub use progress::CallSpinner;
pub use shell::{Shell, TerminalShell, apply_effects};
