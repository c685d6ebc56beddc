//! Shared UI icons.
//!
//! Each icon falls back to a plain-text tag on terminals without emoji support.

use console::Emoji;

// Banner kinds
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[?]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");

// Transcript
pub static USER: Emoji<'_, '_> = Emoji("👤 ", ">");
pub static GATE: Emoji<'_, '_> = Emoji("🚪 ", "<");
pub static PROMPT: Emoji<'_, '_> = Emoji("📝 ", "");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "[T]");
