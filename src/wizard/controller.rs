use super::consumer::{LogConsumer, Submission, SubmissionConsumer};
use super::error_map::ErrorMap;
use super::field::{Field, Step};
use super::record::FormRecord;
use super::validator;
use crate::errors::Result;

/// Everything the wizard knows about the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    pub record: FormRecord,
    pub errors: ErrorMap,
    pub step: Step,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_go_previous(&self) -> bool {
        !self.step.is_first()
    }

    pub fn can_go_next(&self) -> bool {
        !self.step.is_last()
    }

    pub fn can_submit(&self) -> bool {
        self.step.is_last()
    }
}

/// Result of a `go_next`/`go_previous` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The wizard moved to the contained step.
    Moved(Step),
    /// Nothing to move to; the step was left as is.
    Unchanged,
    /// Validation failed; the step's failures are attached.
    Blocked(ErrorMap),
}

/// Result of a `submit` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(Submission),
    Blocked(ErrorMap),
    /// Submit was requested before the final step.
    Unavailable,
}

type Observer = Box<dyn FnMut(&WizardState)>;

/// Owns the session state and the only operations allowed to change it.
///
/// Observers registered through [`WizardController::subscribe`] run after
/// every operation that touched the state, which is how views re-render.
pub struct WizardController<C: SubmissionConsumer = LogConsumer> {
    state: WizardState,
    consumer: C,
    observers: Vec<Observer>,
}

impl WizardController<LogConsumer> {
    pub fn new() -> Self {
        Self::with_consumer(LogConsumer)
    }
}

impl Default for WizardController<LogConsumer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: SubmissionConsumer> WizardController<C> {
    pub fn with_consumer(consumer: C) -> Self {
        Self {
            state: WizardState::new(),
            consumer,
            observers: Vec::new(),
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn record(&self) -> &FormRecord {
        &self.state.record
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.state.errors
    }

    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&WizardState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Stores `value` and clears the field's own stored error. No
    /// revalidation happens here.
    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        self.state.record.set(field, value);
        self.state.errors.clear(field);
        tracing::debug!(field = field.key(), "field updated");
        self.notify();
    }

    pub fn go_next(&mut self) -> Navigation {
        let step = self.state.step;
        let result = self.validate_current();
        let outcome = if !result.is_clean() {
            tracing::debug!(step = step.number(), failures = result.failures().count(), "step blocked");
            Navigation::Blocked(result)
        } else if let Some(next) = step.next() {
            self.state.step = next;
            tracing::debug!(from = step.number(), to = next.number(), "advanced");
            Navigation::Moved(next)
        } else {
            Navigation::Unchanged
        };
        self.notify();
        outcome
    }

    pub fn go_previous(&mut self) -> Navigation {
        let step = self.state.step;
        match step.previous() {
            Some(previous) => {
                self.state.step = previous;
                tracing::debug!(from = step.number(), to = previous.number(), "moved back");
                self.notify();
                Navigation::Moved(previous)
            }
            None => Navigation::Unchanged,
        }
    }

    /// Validates the final step and hands the record to the consumer.
    ///
    /// Earlier steps are not revalidated. A consumer failure is returned as
    /// an error; the state is left exactly as a successful validation leaves
    /// it.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        if !self.state.can_submit() {
            tracing::debug!(step = self.state.step.number(), "submit unavailable");
            return Ok(SubmitOutcome::Unavailable);
        }

        let result = self.validate_current();
        if !result.is_clean() {
            tracing::debug!(failures = result.failures().count(), "submission blocked");
            self.notify();
            return Ok(SubmitOutcome::Blocked(result));
        }

        let submission = Submission::new(self.state.record.clone());
        let consumed = self.consumer.consume(&submission);
        self.notify();
        match consumed {
            Ok(()) => {
                tracing::info!(id = %submission.id, "submission accepted");
                Ok(SubmitOutcome::Submitted(submission))
            }
            Err(err) => {
                tracing::warn!(id = %submission.id, error = %err, "submission consumer failed");
                Err(err)
            }
        }
    }

    fn validate_current(&mut self) -> ErrorMap {
        let step = self.state.step;
        let result = validator::validate(step, &self.state.record);
        self.state.errors.merge_step(step, &result);
        result
    }

    fn notify(&mut self) {
        for observer in self.observers.iter_mut() {
            observer(&self.state);
        }
    }
}
