// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three subcommands:
// - resolve: print the report URL found in a message
// - report:  resolve it and call it, like the "Report phishing" button would
// - links:   list every link in the message and where it really points
//
// The message itself comes from files: --html and/or --text ("-" = stdin).
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

use crate::resolver::DEFAULT_MARKER_KEY;

#[derive(Parser, Debug)]
#[command(
    name = "report-resolver",
    version = "0.1.0",
    about = "Find the phishing-report link in an email and report it",
    long_about = "report-resolver looks through an email body for the campaign's /report?rid=... \
                  endpoint (explicit marker, direct or wrapped link, or rid token + host) \
                  and can call it to register the message as reported."
)]
pub struct Cli {
    /// Show debug logs on stderr (RUST_LOG overrides this)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the message body comes from
#[derive(Args, Debug)]
pub struct BodyArgs {
    /// File with the HTML body ("-" reads stdin)
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// File with the plain-text body ("-" reads stdin, unless --html already does)
    ///
    /// Derived from the HTML body when omitted
    #[arg(long)]
    pub text: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl BodyArgs {
    // Stdin can only be read once, so at most one half may come from it
    pub fn validate(&self) -> Result<()> {
        let stdin = Some(Path::new("-"));
        if self.html.as_deref() == stdin && self.text.as_deref() == stdin {
            bail!("--html and --text cannot both read from stdin");
        }
        Ok(())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the report URL found in a message
    ///
    /// Example: report-resolver resolve --html message.html
    Resolve {
        #[command(flatten)]
        body: BodyArgs,

        /// Keyword of the explicit report-URL marker
        #[arg(long, default_value = DEFAULT_MARKER_KEY)]
        marker_key: String,
    },

    /// Resolve the report URL and call it
    ///
    /// Example: report-resolver report --html message.html --text message.txt
    Report {
        #[command(flatten)]
        body: BodyArgs,

        /// Keyword of the explicit report-URL marker
        #[arg(long, default_value = DEFAULT_MARKER_KEY)]
        marker_key: String,

        /// Give up on the report request after this many seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },

    /// List every link in a message with its unwrapped destination
    ///
    /// Handy when a template's report link isn't being picked up
    Links {
        #[command(flatten)]
        body: BodyArgs,
    },
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[command(flatten)] do?
//    - It pulls the fields of BodyArgs into each subcommand
//    - So --html/--text/--json are written once and shared
//
// 2. What does global = true do on --verbose?
//    - The flag is accepted before or after the subcommand name
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve_defaults() {
        let cli = Cli::parse_from(["report-resolver", "resolve", "--html", "m.html"]);
        match cli.command {
            Commands::Resolve { body, marker_key } => {
                assert_eq!(body.html, Some(PathBuf::from("m.html")));
                assert_eq!(body.text, None);
                assert!(!body.json);
                assert_eq!(marker_key, "BRIXEON_REPORT_URL");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_report_options() {
        let cli = Cli::parse_from([
            "report-resolver",
            "report",
            "--text",
            "-",
            "--timeout-secs",
            "3",
            "--marker-key",
            "ACME_REPORT",
            "--json",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Report { body, marker_key, timeout_secs } => {
                assert_eq!(body.text, Some(PathBuf::from("-")));
                assert!(body.json);
                assert_eq!(marker_key, "ACME_REPORT");
                assert_eq!(timeout_secs, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_stdin_for_both_halves_is_rejected() {
        let cli = Cli::parse_from(["report-resolver", "links", "--html", "-", "--text", "-"]);
        let Commands::Links { body } = cli.command else {
            panic!("expected links command");
        };
        let err = body.validate().unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }

    #[test]
    fn test_stdin_for_one_half_is_fine() {
        let cli = Cli::parse_from(["report-resolver", "links", "--html", "-", "--text", "m.txt"]);
        let Commands::Links { body } = cli.command else {
            panic!("expected links command");
        };
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
