//! Three-step checkout wizard: identity, address, then payment.
//!
//! [`WizardController`] owns the session; [`validator::validate`] decides
//! whether a step may be left; [`view::render`] projects the state for a
//! front end.

mod consumer;
mod controller;
mod error_map;
mod field;
mod record;
pub mod validator;
pub mod view;

pub use consumer::{CollectingConsumer, LogConsumer, Submission, SubmissionConsumer};
pub use controller::{Navigation, SubmitOutcome, WizardController, WizardState};
pub use error_map::ErrorMap;
pub use field::{Field, Step};
pub use record::FormRecord;
pub use validator::validate;
pub use view::{render, Action, FieldView, View};
