//! The rendering side of the UI shell.
//!
//! [`Shell`] is the narrow output interface the state machine talks to through
//! [`Effect`]s. [`TerminalShell`] renders those effects as styled terminal
//! lines; tests substitute a recording implementation.

use console::style;

use crate::gate::GateOption;
use crate::session::{Author, Effect, StatusKind, TranscriptLine};
use crate::ui::icons::{CHECK, CROSS, GATE, PROMPT, USER, WARN};

pub trait Shell {
    fn render_prompt(&mut self, text: &str);
    fn render_status(&mut self, kind: StatusKind, title: &str, text: &str);
    fn render_options(&mut self, options: &[GateOption]);
    fn hide_options(&mut self);
    fn append_transcript_line(&mut self, line: &TranscriptLine);
    fn clear_all(&mut self);
}

/// Render `effects` in order.
pub fn apply_effects<S: Shell + ?Sized>(shell: &mut S, effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::RenderPrompt(text) => shell.render_prompt(text),
            Effect::RenderStatus { kind, title, text } => shell.render_status(*kind, title, text),
            Effect::RenderOptions(options) => shell.render_options(options),
            Effect::HideOptions => shell.hide_options(),
            Effect::AppendTranscript(line) => shell.append_transcript_line(line),
            Effect::ClearAll => shell.clear_all(),
        }
    }
}

/// Plain stdout renderer.
///
/// Terminal output is append-only, so hiding options is a no-op and clearing
/// prints a separator.
#[derive(Debug, Default)]
pub struct TerminalShell;

impl TerminalShell {
    pub fn new() -> Self {
        Self
    }
}

impl Shell for TerminalShell {
    fn render_prompt(&mut self, text: &str) {
        println!("{}{}", PROMPT, style("Scenario").bold());
        for line in text.lines() {
            println!("    {}", style(line).dim());
        }
        println!();
    }

    fn render_status(&mut self, kind: StatusKind, title: &str, text: &str) {
        let (icon, title) = match kind {
            StatusKind::Ok => (CHECK, style(title).green().bold()),
            StatusKind::Warn => (WARN, style(title).yellow().bold()),
            StatusKind::Bad => (CROSS, style(title).red().bold()),
        };
        println!("{}{}", icon, title);
        if !text.is_empty() {
            println!("    {}", text);
        }
    }

    fn render_options(&mut self, options: &[GateOption]) {
        for (i, opt) in options.iter().enumerate() {
            if opt.label == opt.id {
                println!("    {} {}", style(format!("[{}]", i + 1)).cyan(), opt.label);
            } else {
                println!(
                    "    {} {} {}",
                    style(format!("[{}]", i + 1)).cyan(),
                    opt.label,
                    style(format!("({})", opt.id)).dim()
                );
            }
        }
    }

    fn hide_options(&mut self) {}

    fn append_transcript_line(&mut self, line: &TranscriptLine) {
        match line.author {
            Author::User => println!("  {}{}", USER, style(line).cyan()),
            Author::System => println!("  {}{}", GATE, line),
            Author::Unexpected => println!("  {}", style(line).red()),
            Author::Notice => println!("  {}", style(line).dim()),
        }
    }

    fn clear_all(&mut self) {
        println!("{}", style("─".repeat(40)).dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Shell for Recorder {
        fn render_prompt(&mut self, text: &str) {
            self.calls.push(format!("prompt:{text}"));
        }
        fn render_status(&mut self, kind: StatusKind, title: &str, _text: &str) {
            self.calls.push(format!("status:{kind:?}:{title}"));
        }
        fn render_options(&mut self, options: &[GateOption]) {
            self.calls.push(format!("options:{}", options.len()));
        }
        fn hide_options(&mut self) {
            self.calls.push("hide".into());
        }
        fn append_transcript_line(&mut self, line: &TranscriptLine) {
            self.calls.push(format!("line:{line}"));
        }
        fn clear_all(&mut self) {
            self.calls.push("clear".into());
        }
    }

    #[test]
    fn test_apply_effects_preserves_order() {
        let mut shell = Recorder::default();
        let effects = vec![
            Effect::ClearAll,
            Effect::RenderPrompt("p".into()),
            Effect::RenderStatus {
                kind: StatusKind::Warn,
                title: "t".into(),
                text: "x".into(),
            },
            Effect::RenderOptions(vec![GateOption {
                id: "a".into(),
                label: "a".into(),
            }]),
            Effect::AppendTranscript(TranscriptLine::user("a")),
            Effect::HideOptions,
        ];
        apply_effects(&mut shell, &effects);
        assert_eq!(
            shell.calls,
            vec![
                "clear",
                "prompt:p",
                "status:Warn:t",
                "options:1",
                "line:User: a",
                "hide"
            ]
        );
    }
}
