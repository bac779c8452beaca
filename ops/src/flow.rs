//! Lifecycle stages shared by every orchestrated action.

use std::fmt;

use crate::error::FlowError;

/// The operator action being orchestrated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Deploy,
    Vote,
    Mint,
    Transfer,
    Delegate,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Vote => "vote",
            Self::Mint => "mint",
            Self::Transfer => "transfer",
            Self::Delegate => "delegate",
        }
    }

    /// Past-tense tag used in operator summaries, e.g. `[Minted]`.
    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Deploy => "Deployed",
            Self::Vote => "Voted",
            Self::Mint => "Minted",
            Self::Transfer => "Transferred",
            Self::Delegate => "Delegated",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    Validating,
    ReadingContext,
    AwaitingConfirmation,
    Submitting,
    AwaitingLedgerConfirmation,
    Verifying,
    Done,
    Cancelled,
    Failed(String),
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::Failed(_))
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    pub fn can_advance_to(&self, next: &Stage) -> bool {
        use Stage::*;
        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (_, Failed(_)) => true,
            (Validating, ReadingContext)
            | (ReadingContext, AwaitingConfirmation)
            | (AwaitingConfirmation, Submitting)
            | (AwaitingConfirmation, Cancelled)
            | (Submitting, AwaitingLedgerConfirmation)
            | (AwaitingLedgerConfirmation, Verifying)
            | (Verifying, Done) => true,
            _ => false,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::ReadingContext => "reading-context",
            Self::AwaitingConfirmation => "awaiting-confirmation",
            Self::Submitting => "submitting",
            Self::AwaitingLedgerConfirmation => "awaiting-ledger-confirmation",
            Self::Verifying => "verifying",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "failed ({reason})"),
            other => f.write_str(other.label()),
        }
    }
}

/// Tracks one action through its stages.
#[derive(Debug)]
pub struct FlowRun {
    action: Action,
    history: Vec<Stage>,
}

impl FlowRun {
    pub fn start(action: Action) -> Self {
        tracing::debug!(action = action.as_str(), "flow started");
        Self {
            action,
            history: vec![Stage::Validating],
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn current(&self) -> &Stage {
        // history starts non-empty and is only ever appended to
        &self.history[self.history.len() - 1]
    }

    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    pub fn into_history(self) -> Vec<Stage> {
        self.history
    }

    pub fn advance(&mut self, next: Stage) -> Result<(), FlowError> {
        if !self.current().can_advance_to(&next) {
            return Err(FlowError::IllegalTransition {
                from: self.current().to_string(),
                to: next.to_string(),
            });
        }
        tracing::debug!(action = self.action.as_str(), stage = %next, "flow stage");
        self.history.push(next);
        Ok(())
    }

    /// Record the terminal stage for `result`. A run that already reached a
    /// terminal stage is left untouched.
    pub fn finish<T>(&mut self, result: &Result<T, FlowError>) {
        if self.current().is_terminal() {
            return;
        }
        let terminal = match result {
            Ok(_) => Stage::Done,
            Err(e) if e.is_cancellation() => Stage::Cancelled,
            Err(e) => Stage::Failed(e.to_string()),
        };
        if self.current().can_advance_to(&terminal) {
            self.history.push(terminal);
        } else {
            // a success reported before verification finished
            self.history.push(Stage::Failed(format!(
                "finished early from {}",
                self.current()
            )));
        }
        match self.current() {
            Stage::Failed(reason) => {
                tracing::warn!(action = self.action.as_str(), %reason, "flow failed")
            }
            stage => tracing::info!(action = self.action.as_str(), %stage, "flow finished"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(run: &mut FlowRun) {
        for stage in [
            Stage::ReadingContext,
            Stage::AwaitingConfirmation,
            Stage::Submitting,
            Stage::AwaitingLedgerConfirmation,
            Stage::Verifying,
        ] {
            run.advance(stage).unwrap();
        }
    }

    #[test]
    fn happy_path_reaches_done() {
        let mut run = FlowRun::start(Action::Mint);
        walk(&mut run);
        run.finish(&Ok::<(), FlowError>(()));
        assert_eq!(run.current(), &Stage::Done);
        assert_eq!(run.history().len(), 7);
    }

    #[test]
    fn cancellation_only_from_prompt() {
        let mut run = FlowRun::start(Action::Vote);
        assert!(run.advance(Stage::Cancelled).is_err());
        run.advance(Stage::ReadingContext).unwrap();
        run.advance(Stage::AwaitingConfirmation).unwrap();
        run.finish(&Err::<(), _>(FlowError::OperatorCancelled));
        assert_eq!(run.current(), &Stage::Cancelled);
    }

    #[test]
    fn failure_from_any_live_stage() {
        let mut run = FlowRun::start(Action::Deploy);
        run.advance(Stage::ReadingContext).unwrap();
        run.finish(&Err::<(), _>(FlowError::LedgerUnavailable("refused".into())));
        assert!(matches!(run.current(), Stage::Failed(r) if r.contains("refused")));
    }

    #[test]
    fn stages_cannot_be_skipped() {
        let mut run = FlowRun::start(Action::Transfer);
        let err = run.advance(Stage::Submitting).unwrap_err();
        assert!(matches!(err, FlowError::IllegalTransition { .. }));
        assert_eq!(run.current(), &Stage::Validating);
    }

    #[test]
    fn terminal_stages_are_final() {
        let mut run = FlowRun::start(Action::Delegate);
        walk(&mut run);
        run.finish(&Ok::<(), FlowError>(()));
        assert!(run.advance(Stage::Failed("late".into())).is_err());
        run.finish(&Err::<(), _>(FlowError::OperatorCancelled));
        assert_eq!(run.current(), &Stage::Done);
    }
}
