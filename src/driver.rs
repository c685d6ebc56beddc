//! UI-shell boundary: runs user actions through a [`Turn`] and a [`GateClient`].
//!
//! The driver owns no decisions. It forwards actions to the turn, renders the
//! resulting effects, performs the requested gate call and feeds the outcome
//! back. A call that fails outside the client (the call task panicking, say)
//! is caught here and reported like any other transport failure.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{GateError, SessionError};
use crate::gate::GateClient;
use crate::session::{Completion, Phase, Transition, Turn};
use crate::ui::{CallSpinner, Shell, apply_effects};

pub struct Driver<S: Shell> {
    client: Arc<dyn GateClient>,
    shell: S,
    turn: Turn,
    spinner: bool,
    verbose: bool,
}

impl<S: Shell> Driver<S> {
    pub fn new(client: Arc<dyn GateClient>, shell: S, scenario_id: &str) -> Self {
        Self {
            client,
            shell,
            turn: Turn::new(scenario_id),
            spinner: false,
            verbose: false,
        }
    }

    /// Show a spinner while calls are in flight.
    pub fn with_spinner(mut self, verbose: bool) -> Self {
        self.spinner = true;
        self.verbose = verbose;
        self
    }

    pub fn turn(&self) -> &Turn {
        &self.turn
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// Render the current scenario on a clean screen.
    pub fn show_scenario(&mut self) {
        let transition = self.turn.reset();
        apply_effects(&mut self.shell, &transition.effects);
    }

    pub async fn start(&mut self) -> Phase {
        self.start_until(std::future::pending()).await
    }

    /// Like [`Self::start`], but `cancel` resolving first resets the turn.
    pub async fn start_until<F: Future<Output = ()>>(&mut self, cancel: F) -> Phase {
        let transition = self.turn.start();
        self.dispatch(transition, cancel).await
    }

    pub async fn choose(&mut self, binding: &str) -> Result<Phase, SessionError> {
        self.choose_until(binding, std::future::pending()).await
    }

    pub async fn choose_until<F: Future<Output = ()>>(
        &mut self,
        binding: &str,
        cancel: F,
    ) -> Result<Phase, SessionError> {
        let transition = self.turn.choose(binding)?;
        Ok(self.dispatch(transition, cancel).await)
    }

    pub fn reset(&mut self) {
        let transition = self.turn.reset();
        apply_effects(&mut self.shell, &transition.effects);
    }

    pub fn change_scenario(&mut self, scenario_id: &str) {
        let transition = self.turn.change_scenario(scenario_id);
        apply_effects(&mut self.shell, &transition.effects);
    }

    async fn dispatch<F: Future<Output = ()>>(&mut self, transition: Transition, cancel: F) -> Phase {
        apply_effects(&mut self.shell, &transition.effects);
        let Some(ticket) = transition.call else {
            return self.turn.phase();
        };

        let spinner = self
            .spinner
            .then(|| CallSpinner::start(ticket.scenario().id, ticket.binding()));

        // The call runs detached so a cancelled turn stops waiting without
        // aborting the request itself.
        let client = Arc::clone(&self.client);
        let call_ticket = ticket.clone();
        let mut call = tokio::spawn(async move {
            client
                .submit(call_ticket.scenario(), call_ticket.binding())
                .await
        });

        let outcome = tokio::select! {
            joined = &mut call => Some(joined.unwrap_or_else(|e| {
                Err(GateError::Transport(format!("gate call aborted: {e}")))
            })),
            _ = cancel => None,
        };

        if let Some(spinner) = spinner {
            spinner.finish(self.verbose);
        }

        match outcome {
            Some(outcome) => match self.turn.complete(&ticket, outcome) {
                Completion::Applied(effects) => {
                    apply_effects(&mut self.shell, &effects);
                    if self.turn.phase().is_terminal() {
                        debug!(phase = %self.turn.phase(), "turn finished");
                    }
                }
                Completion::Stale => debug!(
                    generation = ticket.generation(),
                    "gate outcome arrived for an abandoned turn"
                ),
            },
            None => {
                info!(
                    scenario = ticket.scenario().id,
                    "call cancelled; turn reset and late response will be ignored"
                );
                self.reset();
            }
        }
        self.turn.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{GateOption, GateResponse};
    use crate::scenario::Scenario;
    use crate::session::{StatusKind, TranscriptLine};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    type Scripted = Result<serde_json::Value, GateError>;

    /// Replies with scripted outcomes in order and records each request.
    struct ScriptedGate {
        replies: Mutex<VecDeque<Scripted>>,
        requests: Mutex<Vec<(String, Option<String>)>>,
        delay: Option<Duration>,
    }

    impl ScriptedGate {
        fn new(replies: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
                delay: None,
            })
        }

        fn slow(replies: Vec<Scripted>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
                delay: Some(delay),
            })
        }

        fn requests(&self) -> Vec<(String, Option<String>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GateClient for ScriptedGate {
        async fn submit(
            &self,
            scenario: &Scenario,
            binding: Option<&str>,
        ) -> Result<GateResponse, GateError> {
            self.requests
                .lock()
                .unwrap()
                .push((scenario.id.to_string(), binding.map(str::to_string)));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted reply left");
            GateResponse::from_value(reply?)
        }
    }

    #[derive(Default)]
    struct RecordingShell {
        statuses: Vec<(StatusKind, String, String)>,
        options: Vec<GateOption>,
        lines: Vec<TranscriptLine>,
        prompts: Vec<String>,
    }

    impl Shell for RecordingShell {
        fn render_prompt(&mut self, text: &str) {
            self.prompts.push(text.to_string());
        }
        fn render_status(&mut self, kind: StatusKind, title: &str, text: &str) {
            self.statuses.push((kind, title.to_string(), text.to_string()));
        }
        fn render_options(&mut self, options: &[GateOption]) {
            self.options = options.to_vec();
        }
        fn hide_options(&mut self) {
            self.options.clear();
        }
        fn append_transcript_line(&mut self, line: &TranscriptLine) {
            self.lines.push(line.clone());
        }
        fn clear_all(&mut self) {
            self.statuses.clear();
            self.options.clear();
            self.lines.clear();
        }
    }

    fn stop() -> Scripted {
        Ok(json!({
            "status": "STOP",
            "question": "Whose bird is missing?",
            "options": [{"id": "james", "label": "James's bird"}, "jenny"]
        }))
    }

    #[tokio::test]
    async fn test_full_clarification_cycle() {
        let gate = ScriptedGate::new(vec![
            stop(),
            Ok(json!({"status": "RESOLVED", "statement": "Jenny's bird is missing."})),
        ]);
        let mut driver = Driver::new(gate.clone(), RecordingShell::default(), "bird_missing_v1");

        assert_eq!(driver.start().await, Phase::AwaitingClarification);
        let labels: Vec<&str> = driver
            .shell()
            .options
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(labels, vec!["James's bird", "jenny"]);

        assert_eq!(driver.choose("jenny").await.unwrap(), Phase::TerminalResolved);
        assert!(driver.shell().options.is_empty());

        let (kind, title, text) = driver.shell().statuses.last().unwrap().clone();
        assert_eq!(kind, StatusKind::Ok);
        assert_eq!(title, "Gate verdict: ADMISSIBLE");
        assert_eq!(text, "Resolution permitted after binding.");

        let rendered: Vec<String> = driver.shell().lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "Calling gate…",
                "System: STOP",
                "System: Whose bird is missing?",
                "User: jenny",
                "System: Jenny's bird is missing.",
            ]
        );
        assert_eq!(
            gate.requests(),
            vec![
                ("bird_missing_v1".to_string(), None),
                ("bird_missing_v1".to_string(), Some("jenny".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_reaches_transcript() {
        let gate = ScriptedGate::new(vec![Err(GateError::Transport("dns lookup failed".into()))]);
        let mut driver = Driver::new(gate, RecordingShell::default(), "telescope_v1");

        assert_eq!(driver.start().await, Phase::TerminalError);
        let (kind, title, _) = driver.shell().statuses.last().unwrap().clone();
        assert_eq!(kind, StatusKind::Bad);
        assert_eq!(title, "Gate verdict: INADMISSIBLE_UNSUPPORTED");
        assert!(
            driver
                .shell()
                .lines
                .iter()
                .any(|l| l.text.contains("dns lookup failed"))
        );
    }

    #[tokio::test]
    async fn test_choose_without_pending_question_is_rejected() {
        let gate = ScriptedGate::new(vec![]);
        let mut driver = Driver::new(gate.clone(), RecordingShell::default(), "trophy_v1");
        let err = driver.choose("trophy").await.unwrap_err();
        assert!(matches!(err, SessionError::NotAwaitingClarification { .. }));
        assert!(gate.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_resets_turn_and_drops_late_reply() {
        let gate = ScriptedGate::slow(
            vec![Ok(json!({"status": "RESOLVED", "statement": "late"}))],
            Duration::from_millis(200),
        );
        let mut driver = Driver::new(gate.clone(), RecordingShell::default(), "bird_missing_v1");

        let phase = driver
            .start_until(tokio::time::sleep(Duration::from_millis(10)))
            .await;
        assert_eq!(phase, Phase::Idle);
        assert!(driver.turn().transcript().is_empty());
        assert!(driver.shell().lines.is_empty());

        // the detached call still completes; nothing is applied
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(driver.turn().phase(), Phase::Idle);
        assert!(driver.shell().statuses.is_empty());
        assert_eq!(gate.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_change_scenario_renders_new_prompt() {
        let gate = ScriptedGate::new(vec![]);
        let mut driver = Driver::new(gate, RecordingShell::default(), "bird_missing_v1");
        driver.change_scenario("trophy_v1");
        assert_eq!(driver.turn().scenario().id, "trophy_v1");
        assert_eq!(
            driver.shell().prompts.last().map(String::as_str),
            Some(crate::scenario::lookup("trophy_v1").prompt)
        );
    }
}
