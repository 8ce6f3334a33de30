use std::collections::BTreeSet;

use checkout_wizard::wizard::{
    validate, CollectingConsumer, Field, FormRecord, Navigation, Step, SubmitOutcome,
    WizardController,
};

fn wizard() -> WizardController<CollectingConsumer> {
    WizardController::with_consumer(CollectingConsumer::new())
}

fn fill(wizard: &mut WizardController<CollectingConsumer>, values: &[(Field, &str)]) {
    for (field, value) in values {
        wizard.update_field(*field, *value);
    }
}

const IDENTITY: &[(Field, &str)] = &[(Field::Name, "John Doe"), (Field::Email, "john@example.com")];
const ADDRESS: &[(Field, &str)] = &[
    (Field::Street, "42 Residency Road"),
    (Field::City, "Bengaluru"),
    (Field::State, "Karnataka"),
    (Field::PostalCode, "560025"),
];
const PAYMENT: &[(Field, &str)] = &[
    (Field::CardNumber, "4111111111111111"),
    (Field::Expiry, "12/25"),
    (Field::Cvv, "123"),
];

#[test]
fn validate_returns_exactly_the_step_field_set() {
    let records = [
        FormRecord::new(),
        FormRecord::new()
            .with(Field::Name, "John123")
            .with(Field::PostalCode, "123456")
            .with(Field::Cvv, "12"),
    ];
    for record in &records {
        for step in Step::ALL {
            let result = validate(step, record);
            let keys: BTreeSet<Field> = result.fields().collect();
            let expected: BTreeSet<Field> = step.fields().iter().copied().collect();
            assert_eq!(keys, expected, "step {step}");
            assert_eq!(result, validate(step, record), "validate must be idempotent");
        }
    }
}

#[test]
fn valid_identity_advances_to_address() {
    let mut wizard = wizard();
    fill(&mut wizard, IDENTITY);
    assert_eq!(wizard.go_next(), Navigation::Moved(Step::Address));
    assert!(wizard.errors().is_clean());
}

#[test]
fn digits_in_name_block_advancement() {
    let mut wizard = wizard();
    fill(&mut wizard, &[(Field::Name, "John123"), (Field::Email, "john@example.com")]);

    let Navigation::Blocked(errors) = wizard.go_next() else {
        panic!("expected step 1 to be blocked");
    };
    assert_eq!(
        errors.message(Field::Name),
        Some("Name should only contain alphabets and spaces.")
    );
    assert_eq!(errors.entry(Field::Email), Some(""));
    assert_eq!(wizard.step(), Step::Identity);
    assert_eq!(
        wizard.errors().message(Field::Name),
        Some("Name should only contain alphabets and spaces.")
    );
}

#[test]
fn postal_code_must_have_six_digits() {
    let mut wizard = wizard();
    fill(&mut wizard, IDENTITY);
    wizard.go_next();
    fill(&mut wizard, &ADDRESS[..3]);
    wizard.update_field(Field::PostalCode, "12345");

    assert!(matches!(wizard.go_next(), Navigation::Blocked(_)));
    assert_eq!(
        wizard.errors().message(Field::PostalCode),
        Some("Postal Code must be a 6-digit number.")
    );

    wizard.update_field(Field::PostalCode, "123456");
    assert_eq!(wizard.go_next(), Navigation::Moved(Step::Payment));
    assert_eq!(wizard.errors().entry(Field::PostalCode), Some(""));
}

#[test]
fn expiry_month_thirteen_blocks_submission() {
    let mut wizard = wizard();
    fill(&mut wizard, IDENTITY);
    wizard.go_next();
    fill(&mut wizard, ADDRESS);
    wizard.go_next();
    fill(&mut wizard, PAYMENT);
    wizard.update_field(Field::Expiry, "13/25");

    let SubmitOutcome::Blocked(errors) = wizard.submit().unwrap() else {
        panic!("expected submission to be blocked");
    };
    assert_eq!(
        errors.message(Field::Expiry),
        Some("Expiry date must be in MM/YY format.")
    );
    assert!(wizard.consumer().submissions().is_empty());
    assert_eq!(wizard.step(), Step::Payment);
}

#[test]
fn go_previous_decrements_without_validation_and_floors_at_one() {
    let mut wizard = wizard();
    fill(&mut wizard, IDENTITY);
    wizard.go_next();
    fill(&mut wizard, ADDRESS);
    wizard.go_next();
    assert_eq!(wizard.step(), Step::Payment);

    let before = wizard.errors().clone();
    assert_eq!(wizard.go_previous(), Navigation::Moved(Step::Address));
    assert_eq!(wizard.go_previous(), Navigation::Moved(Step::Identity));
    assert_eq!(wizard.go_previous(), Navigation::Unchanged);
    assert_eq!(wizard.step(), Step::Identity);
    assert_eq!(wizard.errors(), &before);
}

#[test]
fn other_step_errors_survive_a_later_validation() {
    let mut wizard = wizard();
    assert!(matches!(wizard.go_next(), Navigation::Blocked(_)));
    fill(&mut wizard, IDENTITY);
    wizard.go_next();

    // Step 2 fails; step 1's cleared entries must still be present.
    assert!(matches!(wizard.go_next(), Navigation::Blocked(_)));
    assert_eq!(wizard.errors().entry(Field::Name), Some(""));
    assert_eq!(wizard.errors().entry(Field::Email), Some(""));
    assert_eq!(wizard.errors().message(Field::City), Some("City is required."));
    assert!(!wizard.errors().contains(Field::Cvv));
}

#[test]
fn happy_path_emits_record_and_stays_on_last_step() {
    let mut wizard = wizard();
    fill(&mut wizard, IDENTITY);
    assert_eq!(wizard.go_next(), Navigation::Moved(Step::Address));
    fill(&mut wizard, ADDRESS);
    assert_eq!(wizard.go_next(), Navigation::Moved(Step::Payment));
    fill(&mut wizard, PAYMENT);

    let SubmitOutcome::Submitted(submission) = wizard.submit().unwrap() else {
        panic!("expected a submission");
    };
    assert_eq!(wizard.step(), Step::Payment);
    assert_eq!(&submission.record, wizard.record());
    assert_eq!(submission.record.postal_code, "560025");
    assert_eq!(wizard.consumer().submissions().len(), 1);
    assert_eq!(wizard.consumer().last().map(|s| s.id), Some(submission.id));
}
