//! Interaction state machine for one resolve → clarify → re-resolve cycle.
//!
//! A [`Turn`] owns the current scenario, the transcript and the phase. Every
//! operation mutates the turn and returns the [`Effect`]s the UI shell should
//! render; the turn itself never touches the terminal or the network.
//!
//! ```text
//! Idle ──start──▶ Calling ──STOP──────▶ AwaitingClarification ──choose──▶ Calling
//!                    │                                                      │
//!                    ├──RESOLVED──▶ TerminalResolved ◀──────RESOLVED────────┤
//!                    └──other/error──▶ TerminalError ◀──────anything else───┘
//! ```
//!
//! `reset` and `change_scenario` return to `Idle` from any phase.
//!
//! Each call is handed out as a [`CallTicket`] stamped with the turn's
//! generation. Any later action bumps the generation, so a response that
//! arrives for an abandoned call is reported as [`Completion::Stale`] and
//! never applied.

pub mod transcript;

use tracing::{debug, warn};

use crate::errors::{GateError, SessionError};
use crate::gate::{GateOption, GateResponse, GateStatus, VERDICT_INADMISSIBLE_UNSUPPORTED};
use crate::scenario::{self, Scenario};

pub use transcript::{Author, TranscriptLine};

pub const CALLING_NOTICE: &str = "Calling gate…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Calling,
    AwaitingClarification,
    TerminalResolved,
    TerminalError,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::TerminalResolved | Phase::TerminalError)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Calling => write!(f, "calling"),
            Phase::AwaitingClarification => write!(f, "awaiting_clarification"),
            Phase::TerminalResolved => write!(f, "resolved"),
            Phase::TerminalError => write!(f, "error"),
        }
    }
}

/// Banner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Ok,
    Warn,
    Bad,
}

/// A rendering request for the UI shell.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RenderPrompt(String),
    RenderStatus {
        kind: StatusKind,
        title: String,
        text: String,
    },
    RenderOptions(Vec<GateOption>),
    HideOptions,
    AppendTranscript(TranscriptLine),
    ClearAll,
}

/// Permission to perform exactly one gate call for the current turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTicket {
    generation: u64,
    scenario: &'static Scenario,
    binding: Option<String>,
}

impl CallTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scenario(&self) -> &'static Scenario {
        self.scenario
    }

    pub fn binding(&self) -> Option<&str> {
        self.binding.as_deref()
    }
}

/// Result of a user action: effects to render and, possibly, a call to make.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub effects: Vec<Effect>,
    pub call: Option<CallTicket>,
}

/// Result of feeding a call outcome back into the turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Applied(Vec<Effect>),
    /// The ticket belongs to an abandoned call; nothing changed.
    Stale,
}

#[derive(Debug, Clone)]
pub struct Turn {
    scenario: &'static Scenario,
    phase: Phase,
    transcript: Vec<TranscriptLine>,
    options: Vec<GateOption>,
    /// Binding attached to the call in flight or last made.
    binding: Option<String>,
    generation: u64,
    /// Why the turn ended in `TerminalError`.
    failure: Option<GateError>,
}

impl Turn {
    /// An idle turn for `scenario_id`; unknown ids fall back to the default scenario.
    pub fn new(scenario_id: &str) -> Self {
        Self {
            scenario: scenario::lookup(scenario_id),
            phase: Phase::Idle,
            transcript: Vec::new(),
            options: Vec::new(),
            binding: None,
            generation: 0,
            failure: None,
        }
    }

    pub fn scenario(&self) -> &'static Scenario {
        self.scenario
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn transcript(&self) -> &[TranscriptLine] {
        &self.transcript
    }

    #[cfg(test)]
    fn generation(&self) -> u64 {
        self.generation
    }

    /// The error that ended the turn, once it is in `TerminalError`.
    pub fn failure(&self) -> Option<&GateError> {
        self.failure.as_ref()
    }

    /// Selectable bindings; empty unless awaiting clarification.
    pub fn options(&self) -> &[GateOption] {
        if self.phase == Phase::AwaitingClarification {
            &self.options
        } else {
            &[]
        }
    }

    /// Begin a new turn and request the first, unbound call.
    pub fn start(&mut self) -> Transition {
        self.clear();
        self.phase = Phase::Calling;
        debug!(scenario = self.scenario.id, generation = self.generation, "turn started");

        let notice = TranscriptLine::notice(CALLING_NOTICE);
        self.transcript.push(notice.clone());

        Transition {
            effects: vec![
                Effect::ClearAll,
                Effect::RenderPrompt(self.scenario.prompt.to_string()),
                Effect::AppendTranscript(notice),
            ],
            call: Some(self.ticket()),
        }
    }

    /// Submit one of the offered bindings.
    pub fn choose(&mut self, binding: &str) -> Result<Transition, SessionError> {
        if self.phase != Phase::AwaitingClarification {
            return Err(SessionError::NotAwaitingClarification {
                phase: self.phase.to_string(),
            });
        }
        if !self.options.iter().any(|o| o.id == binding) {
            return Err(SessionError::UnknownBinding {
                binding: binding.to_string(),
            });
        }

        self.generation += 1;
        self.binding = Some(binding.to_string());
        self.options.clear();
        self.phase = Phase::Calling;
        debug!(binding, generation = self.generation, "binding chosen");

        let line = TranscriptLine::user(binding);
        self.transcript.push(line.clone());

        Ok(Transition {
            effects: vec![Effect::HideOptions, Effect::AppendTranscript(line)],
            call: Some(self.ticket()),
        })
    }

    /// Apply the outcome of the call `ticket` was issued for.
    pub fn complete(
        &mut self,
        ticket: &CallTicket,
        outcome: Result<GateResponse, GateError>,
    ) -> Completion {
        if ticket.generation != self.generation || self.phase != Phase::Calling {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale gate outcome"
            );
            return Completion::Stale;
        }

        let effects = match outcome {
            Err(err) => self.fail(err),
            Ok(resp) if self.binding.is_none() => self.apply_initial(resp),
            Ok(resp) => self.apply_post_binding(resp),
        };
        Completion::Applied(effects)
    }

    /// Abandon the turn and return to idle.
    pub fn reset(&mut self) -> Transition {
        self.clear();
        Transition {
            effects: vec![
                Effect::ClearAll,
                Effect::RenderPrompt(self.scenario.prompt.to_string()),
            ],
            call: None,
        }
    }

    /// Switch scenario; this always abandons the current turn.
    pub fn change_scenario(&mut self, scenario_id: &str) -> Transition {
        self.scenario = scenario::lookup(scenario_id);
        debug!(scenario = self.scenario.id, "scenario changed");
        self.reset()
    }

    fn clear(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.transcript.clear();
        self.options.clear();
        self.binding = None;
        self.failure = None;
    }

    fn ticket(&self) -> CallTicket {
        CallTicket {
            generation: self.generation,
            scenario: self.scenario,
            binding: self.binding.clone(),
        }
    }

    fn push(&mut self, effects: &mut Vec<Effect>, line: TranscriptLine) {
        self.transcript.push(line.clone());
        effects.push(Effect::AppendTranscript(line));
    }

    fn apply_initial(&mut self, resp: GateResponse) -> Vec<Effect> {
        let title = verdict_title(&resp.verdict);
        let mut effects = Vec::new();

        match resp.status {
            GateStatus::Stop => {
                self.phase = Phase::AwaitingClarification;
                self.options = resp.options;
                effects.push(Effect::RenderStatus {
                    kind: StatusKind::Warn,
                    title,
                    text: "Clarification required.".to_string(),
                });
                effects.push(Effect::RenderOptions(self.options.clone()));
                self.push(&mut effects, TranscriptLine::system(GateStatus::Stop.as_str()));
                let question = resp.question.unwrap_or_default();
                self.push(&mut effects, TranscriptLine::system(question));
            }
            GateStatus::Resolved => {
                self.phase = Phase::TerminalResolved;
                effects.push(Effect::RenderStatus {
                    kind: StatusKind::Ok,
                    title,
                    text: "Resolution permitted.".to_string(),
                });
                let statement = resp.statement.unwrap_or_default();
                self.push(&mut effects, TranscriptLine::system(statement));
            }
            GateStatus::Other(status) => {
                let err = GateError::UnexpectedStatus {
                    status: status.clone(),
                };
                warn!(kind = err.kind(), %status, "gate returned unknown status");
                self.phase = Phase::TerminalError;
                self.failure = Some(err);
                effects.push(Effect::RenderStatus {
                    kind: StatusKind::Bad,
                    title,
                    text: resp
                        .message
                        .clone()
                        .unwrap_or_else(|| "Unknown scenario.".to_string()),
                });
                self.push(&mut effects, TranscriptLine::system(status));
                if let Some(message) = resp.message {
                    self.push(&mut effects, TranscriptLine::system(message));
                }
            }
        }
        effects
    }

    fn apply_post_binding(&mut self, resp: GateResponse) -> Vec<Effect> {
        let title = verdict_title(&resp.verdict);
        let mut effects = vec![Effect::HideOptions];

        if resp.status == GateStatus::Resolved {
            self.phase = Phase::TerminalResolved;
            effects.push(Effect::RenderStatus {
                kind: StatusKind::Ok,
                title,
                text: "Resolution permitted after binding.".to_string(),
            });
            let statement = resp.statement.unwrap_or_default();
            self.push(&mut effects, TranscriptLine::system(statement));
            return effects;
        }

        // One binding must settle the ambiguity; a second STOP is a failure too.
        let err = GateError::UnexpectedStatus {
            status: resp.status.to_string(),
        };
        warn!(
            kind = err.kind(),
            status = %resp.status,
            "unexpected gate response after binding"
        );
        self.phase = Phase::TerminalError;
        self.failure = Some(err);
        effects.push(Effect::RenderStatus {
            kind: StatusKind::Bad,
            title,
            text: resp
                .message
                .clone()
                .unwrap_or_else(|| "Unexpected response.".to_string()),
        });
        self.push(&mut effects, TranscriptLine::unexpected(resp.raw_dump()));
        effects
    }

    fn fail(&mut self, err: GateError) -> Vec<Effect> {
        self.phase = Phase::TerminalError;
        warn!(kind = err.kind(), error = %err, "gate call failed");

        let message = err.to_string();
        self.failure = Some(err);
        let mut effects = vec![
            Effect::HideOptions,
            Effect::RenderStatus {
                kind: StatusKind::Bad,
                title: verdict_title(VERDICT_INADMISSIBLE_UNSUPPORTED),
                text: message.clone(),
            },
        ];
        self.push(&mut effects, TranscriptLine::notice(message));
        effects
    }
}

fn verdict_title(label: &str) -> String {
    format!("Gate verdict: {label}")
}
