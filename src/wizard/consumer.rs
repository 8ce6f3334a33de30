use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::FormRecord;
use crate::errors::Result;

/// A finalized record handed to the outside world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub record: FormRecord,
}

impl Submission {
    pub fn new(record: FormRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            record,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Receives the record once the final step validates.
pub trait SubmissionConsumer {
    fn consume(&mut self, submission: &Submission) -> Result<()>;
}

impl<F> SubmissionConsumer for F
where
    F: FnMut(&Submission) -> Result<()>,
{
    fn consume(&mut self, submission: &Submission) -> Result<()> {
        self(submission)
    }
}

/// Emits submissions through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogConsumer;

impl SubmissionConsumer for LogConsumer {
    fn consume(&mut self, submission: &Submission) -> Result<()> {
        let payload = serde_json::to_string(&submission.record)?;
        tracing::info!(
            id = %submission.id,
            submitted_at = %submission.submitted_at.to_rfc3339(),
            record = %payload,
            "Form submitted"
        );
        Ok(())
    }
}

/// Keeps every submission in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingConsumer {
    submissions: Vec<Submission>,
}

impl CollectingConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn last(&self) -> Option<&Submission> {
        self.submissions.last()
    }
}

impl SubmissionConsumer for CollectingConsumer {
    fn consume(&mut self, submission: &Submission) -> Result<()> {
        self.submissions.push(submission.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WizardError;
    use crate::wizard::Field;

    #[test]
    fn submission_json_uses_camel_case_keys() {
        let submission = Submission::new(FormRecord::new().with(Field::Name, "Ada"));
        let json = submission.to_json_pretty().unwrap();
        assert!(json.contains("\"submittedAt\""));
        assert!(json.contains("\"postalCode\""));
        assert!(json.contains("\"Ada\""));
    }

    #[test]
    fn closures_act_as_consumers() {
        let mut seen = 0;
        let mut consumer = |_: &Submission| -> Result<()> {
            seen += 1;
            Err(WizardError::Consumer("offline".into()))
        };
        let result = consumer.consume(&Submission::new(FormRecord::new()));
        assert!(matches!(result, Err(WizardError::Consumer(reason)) if reason == "offline"));
        assert_eq!(seen, 1);
    }
}
