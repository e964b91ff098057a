mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use ledgerchat_client::ClientError;
use stdout_io::write_stdout_text;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_ENV: &str = "LEDGERCHAT_LOG";

const ROOT_HELP: &str = "ledgerchat - natural-language bookkeeping interpreter

Usage:
  ledgerchat <command>

Start here:
  ledgerchat chat \"午餐 120 元\"
  ledgerchat record --help
  ledgerchat keywords
";

const TOP_LEVEL_HELP: &str = "ledgerchat — natural-language bookkeeping interpreter

USAGE: ledgerchat <command>

Interpret a message:
  ledgerchat chat \"午餐 120 元\"                     Detect the intent and run the matching parser
  ledgerchat record \"昨天 晚餐 火鍋 $680\"           Parse an income or expense record
  ledgerchat query \"上個月餐飲花多少\"               Parse a spending question into a date range
  ledgerchat intent \"我是不是花太多了\"              Classify as record, query, or analysis

Keyword table:
  ledgerchat keywords                               Show the active categories and their keywords

Common flags:
  --today YYYY-MM-DD                                Reference date for 今天/昨天/上個月 (default: local date)
  --keywords <path>                                 Keyword table JSON (else LEDGERCHAT_KEYWORDS, then ~/.ledgerchat/keywords.json)
  --json                                            Structured JSON output

Set LEDGERCHAT_LOG=debug to trace which date and intent rules fired (written to stderr).
Run `ledgerchat <command> --help` for command usage.
";

const INTERPRET_COMMANDS: [&str; 5] = ["record", "query", "intent", "chat", "keywords"];

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }
    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let body = if is_top_level_help_request(&raw_args) {
                    TOP_LEVEL_HELP.to_string()
                } else {
                    err.to_string()
                };
                if write_stdout_text(&body).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }
            let command_hint = if matches!(
                err.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_from_args(&raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error = parse_error_with_command_hint(&clean_message, command_hint);
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);

    match dispatch::dispatch(&cli) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::debug!(code = %error.code, "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing boilerplate (Usage line, "For more information" hint)
/// so our "What to do next" section is the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// The subcommand named on the command line, for help hints.
fn command_from_args(raw_args: &[String]) -> Option<&'static str> {
    let first = raw_args
        .iter()
        .skip(1)
        .find(|value| !value.starts_with('-'))?;
    INTERPRET_COMMANDS
        .iter()
        .find(|command| **command == first.as_str())
        .copied()
}

fn parse_error_with_command_hint(clean_message: &str, command_hint: Option<&str>) -> ClientError {
    let takes_text = matches!(command_hint, Some("record" | "query" | "intent" | "chat"));
    if let Some(command) = command_hint
        && takes_text
        && clean_message.contains("unexpected argument")
    {
        return ClientError::invalid_argument_with_recovery(
            "The message must be provided as one quoted argument.",
            vec![
                format!("Quote the whole message: `ledgerchat {command} \"午餐 120 元\"`."),
                format!("Run `ledgerchat {command} --help` for usage."),
            ],
        );
    }

    ClientError::invalid_argument_for_command(clean_message, command_hint)
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if is_internal_error(error) || error.is_configuration_error() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn is_internal_error(error: &ClientError) -> bool {
    error.code.starts_with("internal_")
}

#[cfg(test)]
mod tests {
    use ledgerchat_client::ClientError;

    use super::{
        command_from_args, is_internal_error, parse_error_with_command_hint, strip_clap_boilerplate,
    };

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn command_hint_ignores_flags_and_unknown_words() {
        assert_eq!(
            command_from_args(&args(&["ledgerchat", "--json", "record", "午餐"])),
            Some("record")
        );
        assert_eq!(command_from_args(&args(&["ledgerchat", "ledger"])), None);
    }

    #[test]
    fn unquoted_message_gets_quoting_guidance() {
        let error = parse_error_with_command_hint(
            "error: unexpected argument '120' found",
            Some("record"),
        );
        assert_eq!(error.code, "invalid_argument");
        assert!(error.recovery_steps[0].contains("ledgerchat record \"午餐 120 元\""));

        let generic = parse_error_with_command_hint("error: bad value", Some("keywords"));
        assert_eq!(
            generic.recovery_steps,
            vec!["Run `ledgerchat keywords --help` for usage.".to_string()]
        );
    }

    #[test]
    fn clap_boilerplate_is_removed() {
        assert_eq!(
            strip_clap_boilerplate("error: missing\n\nUsage: ledgerchat record <TEXT>\n"),
            "error: missing"
        );
    }

    #[test]
    fn internal_errors_are_recognized_by_prefix() {
        assert!(is_internal_error(&ClientError::internal_serialization("boom")));
        assert!(!is_internal_error(&ClientError::amount_not_found("午餐")));
        assert!(ClientError::keyword_table_missing(std::path::Path::new("/x.json")).is_configuration_error());
    }
}
