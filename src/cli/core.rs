use std::io;

use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::config::{Config, ConfigManager};
use crate::errors::WizardError;
use crate::utils::build_info;
use crate::wizard::{
    render, Action, ErrorMap, Field, LogConsumer, Navigation, Step, SubmitOutcome,
    WizardController,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

pub(crate) type CommandResult = Result<LoopControl, CommandError>;

pub(crate) struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

pub(crate) const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "set",
        usage: "set <field> <value>",
        description: "Enter a value on the current step; quote it to keep repeated spaces",
    },
    CommandSpec {
        name: "clear",
        usage: "clear <field>",
        description: "Empty a field on the current step",
    },
    CommandSpec {
        name: "next",
        usage: "next",
        description: "Validate this step and continue",
    },
    CommandSpec {
        name: "previous",
        usage: "previous | back",
        description: "Return to the previous step without validating",
    },
    CommandSpec {
        name: "submit",
        usage: "submit",
        description: "Validate the payment step and submit the form",
    },
    CommandSpec {
        name: "show",
        usage: "show",
        description: "Display the current step",
    },
    CommandSpec {
        name: "record",
        usage: "record",
        description: "Print every entered value as JSON",
    },
    CommandSpec {
        name: "config",
        usage: "config [show|set <key> <on|off>]",
        description: "Show or change display preferences",
    },
    CommandSpec {
        name: "help",
        usage: "help",
        description: "List available commands",
    },
    CommandSpec {
        name: "version",
        usage: "version",
        description: "Show build information",
    },
    CommandSpec {
        name: "exit",
        usage: "exit | quit",
        description: "Leave the wizard",
    },
];

/// Session state shared by the interactive and script shells.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) running: bool,
    config: Config,
    config_manager: Option<ConfigManager>,
    controller: WizardController<LogConsumer>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Ok(Self::with_manager(mode, ConfigManager::new()))
    }

    /// Loads preferences from `manager`; `config set` writes back through it.
    pub fn with_manager(mode: CliMode, manager: ConfigManager) -> Self {
        let config = match manager.load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "falling back to default configuration");
                cli_io::print_warning(format!("Using default settings: {err}"));
                Config::default()
            }
        };
        let mut context = Self::with_config(mode, config);
        context.config_manager = Some(manager);
        context
    }

    /// In-memory preferences only; nothing is saved.
    pub fn with_config(mode: CliMode, config: Config) -> Self {
        output::set_preferences(OutputPreferences::from(&config));
        let mut controller = WizardController::new();
        controller.subscribe(|state| output::view(&render(state)));
        Self {
            mode,
            running: true,
            config,
            config_manager: None,
            controller,
        }
    }

    pub fn controller(&self) -> &WizardController<LogConsumer> {
        &self.controller
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = COMMANDS.iter().map(|spec| spec.name).collect();
        names.extend(["back", "quit"]);
        names
    }

    pub(crate) fn prompt(&self) -> String {
        format!(
            "checkout [step {}/{}]> ",
            self.controller.step().number(),
            Step::COUNT
        )
    }

    pub(crate) fn greet(&self) {
        cli_io::print_info("Checkout wizard. Type `help` for commands.");
        self.show();
    }

    pub(crate) fn dispatch(&mut self, command: &str, raw: &str, args: &[&str]) -> CommandResult {
        match command {
            "set" => self.cmd_set(args),
            "clear" => self.cmd_clear(args),
            "next" => self.cmd_next(),
            "previous" | "prev" | "back" => self.cmd_previous(),
            "submit" => self.cmd_submit(),
            "show" => {
                self.show();
                Ok(LoopControl::Continue)
            }
            "record" => {
                println!("{}", serde_json::to_string_pretty(self.controller.record())?);
                Ok(LoopControl::Continue)
            }
            "config" => self.cmd_config(args),
            "help" => {
                print_help();
                Ok(LoopControl::Continue)
            }
            "version" => {
                println!("{}", build_info::current().summary());
                Ok(LoopControl::Continue)
            }
            "exit" | "quit" => Ok(LoopControl::Exit),
            _ => {
                self.suggest_command(raw);
                Ok(LoopControl::Continue)
            }
        }
    }

    fn cmd_set(&mut self, args: &[&str]) -> CommandResult {
        let Some((name, rest)) = args.split_first() else {
            return Err(CommandError::InvalidArguments(
                "Usage: set <field> <value> (quote the value to keep repeated spaces)".into(),
            ));
        };
        if rest.is_empty() {
            return Err(CommandError::InvalidArguments(format!(
                "Provide a value for `{}`. Use `clear {}` to empty it.",
                name, name
            )));
        }
        let field = self.field_on_current_step(name)?;
        self.controller.update_field(field, rest.join(" "));
        Ok(LoopControl::Continue)
    }

    fn cmd_clear(&mut self, args: &[&str]) -> CommandResult {
        let [name] = args else {
            return Err(CommandError::InvalidArguments("Usage: clear <field>".into()));
        };
        let field = self.field_on_current_step(name)?;
        self.controller.update_field(field, "");
        Ok(LoopControl::Continue)
    }

    fn cmd_next(&mut self) -> CommandResult {
        if !self.offers(Action::Next) {
            cli_io::print_warning("This is the last step. Use `submit` to finish.");
            return Ok(LoopControl::Continue);
        }
        if let Navigation::Blocked(errors) = self.controller.go_next() {
            cli_io::print_warning(blocked_message(&errors));
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_previous(&mut self) -> CommandResult {
        if !self.offers(Action::Previous) {
            cli_io::print_warning("Already at the first step.");
            return Ok(LoopControl::Continue);
        }
        self.controller.go_previous();
        Ok(LoopControl::Continue)
    }

    fn cmd_submit(&mut self) -> CommandResult {
        match self.controller.submit()? {
            SubmitOutcome::Submitted(submission) => {
                cli_io::print_success("Form Submitted Successfully");
                if self.config.show_record_on_submit {
                    println!("{}", submission.to_json_pretty()?);
                }
            }
            SubmitOutcome::Blocked(errors) => {
                cli_io::print_warning(blocked_message(&errors));
            }
            SubmitOutcome::Unavailable => {
                cli_io::print_warning(format!(
                    "Submit is only available on step {}. Use `next` to continue.",
                    Step::COUNT
                ));
            }
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_config(&mut self, args: &[&str]) -> CommandResult {
        match args {
            [] | ["show"] => {
                output::section("Configuration");
                for (key, value) in self.config.flags() {
                    println!("  {}: {}", key, on_off(value));
                }
                Ok(LoopControl::Continue)
            }
            ["set", key, value] => {
                let value = parse_toggle(value)?;
                self.config.set_flag(key, value)?;
                if let Some(manager) = &self.config_manager {
                    manager.save(&self.config)?;
                    tracing::info!(path = %manager.path().display(), "configuration saved");
                }
                output::set_preferences(OutputPreferences::from(&self.config));
                cli_io::print_success("Configuration updated.");
                Ok(LoopControl::Continue)
            }
            _ => Err(CommandError::InvalidArguments(
                "Usage: config [show|set <key> <on|off>]".into(),
            )),
        }
    }

    fn offers(&self, action: Action) -> bool {
        render(self.controller.state()).offers(action)
    }

    fn field_on_current_step(&self, name: &str) -> Result<Field, CommandError> {
        let field: Field = name.parse()?;
        let step = self.controller.step();
        if field.step() != step {
            return Err(CommandError::InvalidArguments(format!(
                "`{}` is entered on step {}; you are on step {}.",
                field.key(),
                field.step().number(),
                step.number()
            )));
        }
        Ok(field)
    }

    fn show(&self) {
        output::view(&render(self.controller.state()));
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_ascii_lowercase();
        let best = self
            .command_names()
            .into_iter()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(
            "Exit the wizard? Entered values will be discarded.",
            false,
        )?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_info("Use `help` for usage details.");
                Ok(())
            }
            CommandError::Wizard(WizardError::UnknownField(name)) => {
                cli_io::print_error(format!("Unknown field `{}`.", name));
                let fields: Vec<&str> = self
                    .controller
                    .step()
                    .fields()
                    .iter()
                    .map(|field| field.key())
                    .collect();
                cli_io::print_info(format!("Fields on this step: {}", fields.join(", ")));
                Ok(())
            }
            CommandError::Io(err) => Err(CliError::Io(err)),
            other => {
                cli_io::print_error(&other);
                Ok(())
            }
        }
    }
}

fn parse_toggle(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(CommandError::InvalidArguments(format!(
            "Expected on or off, got `{}`.",
            value
        ))),
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn blocked_message(errors: &ErrorMap) -> String {
    let count = errors.failures().count();
    let noun = if count == 1 { "field needs" } else { "fields need" };
    format!("{count} {noun} attention before continuing.")
}

fn print_help() {
    output::section("Commands");
    let width = COMMANDS
        .iter()
        .map(|spec| spec.usage.len())
        .max()
        .unwrap_or_default();
    for spec in COMMANDS {
        println!("  {:<width$}  {}", spec.usage, spec.description, width = width);
    }
    let fields: Vec<&str> = Field::ALL.iter().map(|field| field.key()).collect();
    println!();
    println!("Fields: {}", fields.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script_context() -> ShellContext {
        ShellContext::with_config(CliMode::Script, Config::default())
    }

    fn run(context: &mut ShellContext, line: &str) -> CommandResult {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (command, args) = tokens.split_first().expect("non-empty command line");
        context.dispatch(&command.to_lowercase(), command, args)
    }

    #[test]
    fn set_joins_remaining_tokens_into_value() {
        let mut context = script_context();
        run(&mut context, "set name John Doe").unwrap();
        assert_eq!(context.controller().record().name, "John Doe");
    }

    #[test]
    fn set_rejects_fields_from_other_steps() {
        let mut context = script_context();
        let err = run(&mut context, "set cvv 123").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(message) if message.contains("step 3")));
        assert!(context.controller().record().cvv.is_empty());
    }

    #[test]
    fn unknown_field_surfaces_as_wizard_error() {
        let mut context = script_context();
        let err = run(&mut context, "set zip 123456").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Wizard(WizardError::UnknownField(name)) if name == "zip"
        ));
    }

    #[test]
    fn hidden_actions_leave_state_unchanged() {
        let mut context = script_context();
        run(&mut context, "previous").unwrap();
        run(&mut context, "submit").unwrap();
        assert_eq!(context.controller().step(), Step::Identity);
        assert!(context.controller().errors().is_empty());
    }

    #[test]
    fn exit_and_quit_end_the_loop() {
        let mut context = script_context();
        assert_eq!(run(&mut context, "exit").unwrap(), LoopControl::Exit);
        assert_eq!(run(&mut context, "quit").unwrap(), LoopControl::Exit);
    }

    #[test]
    fn clear_empties_the_field_and_its_error() {
        let mut context = script_context();
        run(&mut context, "set name John123").unwrap();
        run(&mut context, "next").unwrap();
        assert!(context.controller().errors().message(Field::Name).is_some());

        run(&mut context, "clear name").unwrap();
        assert_eq!(context.controller().record().name, "");
        assert_eq!(context.controller().errors().entry(Field::Name), Some(""));
    }

    #[test]
    fn back_returns_to_the_previous_step_without_validating() {
        let mut context = script_context();
        run(&mut context, "set name Ada").unwrap();
        run(&mut context, "set email ada@example.com").unwrap();
        run(&mut context, "next").unwrap();
        assert_eq!(context.controller().step(), Step::Address);

        run(&mut context, "back").unwrap();
        assert_eq!(context.controller().step(), Step::Identity);
        assert!(!context.controller().errors().contains(Field::City));
    }

    #[test]
    fn read_only_commands_keep_the_session_running() {
        let mut context = script_context();
        for line in ["show", "record", "help", "version", "config", "config show"] {
            assert_eq!(run(&mut context, line).unwrap(), LoopControl::Continue, "{line}");
        }
        assert_eq!(context.controller().step(), Step::Identity);
    }

    #[test]
    fn script_mode_exit_needs_no_confirmation() {
        let context = script_context();
        assert!(context.confirm_exit().unwrap());
    }

    #[test]
    fn config_set_saves_through_the_manager() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = dir.path().join("prefs");
        let mut context =
            ShellContext::with_manager(CliMode::Script, ConfigManager::with_base_dir(base.clone()));
        assert!(!base.exists());

        run(&mut context, "config set show_record_on_submit off").unwrap();
        assert!(!context.config().show_record_on_submit);
        let stored = ConfigManager::with_base_dir(base).load().unwrap();
        assert!(!stored.show_record_on_submit);
    }

    #[test]
    fn config_set_rejects_unknown_keys_and_values() {
        let mut context = script_context();
        let err = run(&mut context, "config set show_record_on_submit maybe").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        let err = run(&mut context, "config set theme on").unwrap_err();
        assert!(matches!(err, CommandError::Wizard(WizardError::Config(_))));
        assert_eq!(context.config(), &Config::default());
    }

    #[test]
    fn walks_all_steps_via_commands() {
        let mut context = script_context();
        for line in [
            "set name Ada Lovelace",
            "set email ada@example.com",
            "next",
            "set street 12 Analytical Row",
            "set city London",
            "set state Greater London",
            "set postal_code 560001",
            "next",
            "set card-number 4111111111111111",
            "set expiry 09/29",
            "set cvv 321",
            "submit",
        ] {
            assert_eq!(run(&mut context, line).unwrap(), LoopControl::Continue);
        }
        assert_eq!(context.controller().step(), Step::Payment);
        assert!(context.controller().errors().is_clean());
        assert_eq!(context.controller().record().street, "12 Analytical Row");
    }
}
