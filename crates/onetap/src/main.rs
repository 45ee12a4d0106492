// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Onetap - operator tooling for the credential acquisition orchestrator.
//!
//! This is the binary entry point. It never talks to a device; it inspects
//! tokens, diagnostics and configuration the orchestrator would use.

mod inspect;
mod plan;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use onetap_config::{LoggingConfig, OnetapConfig};
use onetap_orchestrator::SignInMode;

/// Onetap - inspect sign-in tokens, failures and configuration.
#[derive(Parser, Debug)]
#[command(name = "onetap", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the readable claims of an identity token (signature not verified).
    Decode {
        /// Compact `header.payload.signature` token.
        token: String,
    },
    /// Classify a sign-in failure diagnostic and show its remediation hint.
    Classify {
        /// Raw diagnostic text, e.g. "8: no internet".
        diagnostic: String,
        /// Host activity result code (-1 ok, 0 cancelled).
        #[arg(long, allow_hyphen_values = true)]
        result_code: Option<i32>,
    },
    /// Manage Onetap configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Show the strategy ordering a sign-in mode would run.
    Plan {
        /// auto, prompt, auto-then-prompt, auto-then-prompt-then-button or button.
        #[arg(value_parser = parse_mode)]
        mode: SignInMode,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Load and validate configuration, reporting every problem found.
    Check,
    /// Print the effective configuration as TOML.
    Show,
}

fn parse_mode(raw: &str) -> Result<SignInMode, String> {
    raw.parse()
        .map_err(|_| format!("unknown sign-in mode '{raw}'"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { token } => {
            init_tracing(&LoggingConfig::default().level);
            match inspect::render_decoded(&token) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("onetap: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Classify {
            diagnostic,
            result_code,
        } => {
            init_tracing(&LoggingConfig::default().level);
            println!("{}", inspect::render_classified(&diagnostic, result_code));
            ExitCode::SUCCESS
        }
        Commands::Config {
            action: ConfigCommands::Check,
        } => {
            let Some(config) = load_config(cli.config.as_deref()) else {
                return ExitCode::FAILURE;
            };
            init_tracing(&config.logging.level);
            println!("{}", plan::render_config_summary(&config));
            ExitCode::SUCCESS
        }
        Commands::Config {
            action: ConfigCommands::Show,
        } => {
            let Some(config) = load_config(cli.config.as_deref()) else {
                return ExitCode::FAILURE;
            };
            init_tracing(&config.logging.level);
            match onetap_config::to_toml_string(&config) {
                Ok(toml) => {
                    print!("{toml}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("onetap: failed to render configuration: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Plan { mode } => {
            let Some(config) = load_config(cli.config.as_deref()) else {
                return ExitCode::FAILURE;
            };
            init_tracing(&config.logging.level);
            match plan::strategies_for(&config, mode) {
                Ok(strategies) => {
                    print!("{}", plan::render_plan(mode, &strategies));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("onetap: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Load and validate configuration, rendering diagnostics on failure.
fn load_config(path: Option<&std::path::Path>) -> Option<OnetapConfig> {
    let loaded = match path {
        Some(path) => onetap_config::load_and_validate_path(path),
        None => onetap_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => Some(config),
        Err(errors) => {
            onetap_config::render_errors(&errors);
            None
        }
    }
}

/// Initialize the tracing subscriber on stderr. `RUST_LOG` wins over `log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("onetap={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decode() {
        let cli = Cli::try_parse_from(["onetap", "decode", "a.b.c"]).unwrap();
        assert!(matches!(cli.command, Commands::Decode { token } if token == "a.b.c"));
    }

    #[test]
    fn parses_classify_with_negative_result_code() {
        let cli =
            Cli::try_parse_from(["onetap", "classify", "oops", "--result-code", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Classify { result_code: Some(-1), .. }
        ));
    }

    #[test]
    fn parses_plan_mode() {
        let cli = Cli::try_parse_from(["onetap", "plan", "auto-then-prompt-then-button"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Plan { mode: SignInMode::AutoThenPromptThenButton }
        ));
        assert!(Cli::try_parse_from(["onetap", "plan", "silent"]).is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli =
            Cli::try_parse_from(["onetap", "config", "check", "--config", "/tmp/x.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
    }

    #[test]
    fn load_config_reports_invalid_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[identity]\nclient_id = \"not-a-web-client\"").unwrap();
        assert!(load_config(Some(file.path())).is_none());
    }
}
