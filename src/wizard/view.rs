//! Pure projection of [`WizardState`] into something a front end can draw.

use std::fmt;

use super::controller::WizardState;
use super::field::{Field, Step};

/// Navigation affordances offered by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Previous,
    Next,
    Submit,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Previous => "Previous",
            Action::Next => "Next",
            Action::Submit => "Submit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field: Field,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub error: Option<String>,
}

impl FieldView {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// `  Label: value`, showing the placeholder in angle brackets while empty.
    pub fn value_line(&self) -> String {
        if self.value.is_empty() {
            format!("  {}: <{}>", self.label, self.placeholder)
        } else {
            format!("  {}: {}", self.label, self.value)
        }
    }

    pub fn error_line(&self) -> Option<String> {
        self.error.as_ref().map(|error| format!("    ! {}", error))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub step: Step,
    pub title: String,
    pub fields: Vec<FieldView>,
    pub actions: Vec<Action>,
}

impl View {
    pub fn offers(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Plain-text rendering, one entry per output line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone()];
        for field in &self.fields {
            lines.push(field.value_line());
            lines.extend(field.error_line());
        }
        lines.push(self.actions_line());
        lines
    }

    pub fn actions_line(&self) -> String {
        let actions: Vec<&str> = self.actions.iter().map(|action| action.label()).collect();
        format!("Actions: {}", actions.join(" | "))
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// Builds the view for the active step only.
pub fn render(state: &WizardState) -> View {
    let step = state.step;
    let fields = step
        .fields()
        .iter()
        .map(|field| FieldView {
            field: *field,
            label: field.label(),
            placeholder: field.placeholder(),
            value: state.record.get(*field).to_string(),
            error: state.errors.message(*field).map(str::to_string),
        })
        .collect();

    let mut actions = Vec::new();
    if state.can_go_previous() {
        actions.push(Action::Previous);
    }
    if state.can_go_next() {
        actions.push(Action::Next);
    }
    if state.can_submit() {
        actions.push(Action::Submit);
    }

    View {
        step,
        title: format!("Step {} of {}", step.number(), Step::COUNT),
        fields,
        actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_are_gated_by_step() {
        let mut state = WizardState::new();
        assert_eq!(render(&state).actions, vec![Action::Next]);
        state.step = Step::Address;
        assert_eq!(render(&state).actions, vec![Action::Previous, Action::Next]);
        state.step = Step::Payment;
        assert_eq!(
            render(&state).actions,
            vec![Action::Previous, Action::Submit]
        );
    }

    #[test]
    fn only_non_empty_errors_are_shown() {
        let mut state = WizardState::new();
        state.errors.insert(Field::Name, "");
        state.errors.insert(Field::Email, "Email is required.");
        state.errors.insert(Field::Cvv, "CVV is required.");
        let view = render(&state);
        assert_eq!(view.fields.len(), 2);
        assert!(!view.fields[0].has_error());
        assert_eq!(view.fields[1].error.as_deref(), Some("Email is required."));
    }
}
