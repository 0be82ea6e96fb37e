// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Read the message body, then resolve / report / list links
// 4. Exit with proper code (0 = success, 1 = not resolved / not reported,
//    2 = unexpected error)
//
// This file is the "host adapter": it plays the part a mail client add-in
// would play (hand over the body, show the notification). All the decisions
// live in the resolver and report modules.
// =============================================================================

mod cli;
mod error;
mod logging;
mod mailbox;
mod notify;
mod report;
mod resolver;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use cli::{BodyArgs, Cli, Commands};
use notify::Notification;
use report::ReportConfig;
use resolver::{Resolution, Resolver, ResolverConfig, Tier};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("Warning: {}", e);
    }

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Resolve { body, marker_key } => handle_resolve(&body, marker_key).await,
        Commands::Report {
            body,
            marker_key,
            timeout_secs,
        } => handle_report(&body, marker_key, timeout_secs).await,
        Commands::Links { body } => handle_links(&body).await,
    }
}

// Reads --html/--text into the combined body string
async fn combined_body(args: &BodyArgs) -> Result<Option<String>> {
    args.validate()?;
    Ok(mailbox::read_message_body(args.html.as_deref(), args.text.as_deref())
        .await
        .combined())
}

// Handles the 'resolve' subcommand
//
// Prints the report URL, or nothing (exit code 1) if none was found
async fn handle_resolve(args: &BodyArgs, marker_key: String) -> Result<i32> {
    let Some(body) = combined_body(args).await? else {
        eprintln!("⚠️  {}", Notification::NoBody.message());
        return Ok(1);
    };

    let resolver = Resolver::new(ResolverConfig { marker_key });
    let resolution = resolver.resolve(&body);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        match &resolution {
            Some(resolution) => print_resolution(resolution),
            None => eprintln!("⚠️  {}", Notification::NoReportLink.message()),
        }
    }

    Ok(if resolution.is_some() { 0 } else { 1 })
}

fn print_resolution(resolution: &Resolution) {
    println!("{}", resolution.url);
    eprintln!("   found by: {}", resolution.tier);

    // A guessed URL works, but a marker makes it certain
    if resolution.tier == Tier::RidFallback {
        eprintln!("   hint: add a BRIXEON_REPORT_URL marker to the template to skip guessing");
    }
}

// Handles the 'report' subcommand
//
// Resolves the report URL, calls it and shows the resulting notification
async fn handle_report(args: &BodyArgs, marker_key: String, timeout_secs: u64) -> Result<i32> {
    args.validate()?;

    let config = ReportConfig {
        timeout: Duration::from_secs(timeout_secs),
        ..ReportConfig::default()
    };

    let client = match report::build_client(&config) {
        Ok(client) => client,
        Err(e) => {
            notify::show_notification(&Notification::Unexpected, args.json)?;
            return Err(e);
        }
    };

    let body = combined_body(args).await?;
    let resolver = Resolver::new(ResolverConfig { marker_key });

    let notification = report::run_report(&client, &resolver, body.as_deref()).await;
    notify::show_notification(&notification, args.json)?;

    Ok(if notification.is_success() { 0 } else { 1 })
}

// One row of the 'links' output
#[derive(serde::Serialize)]
struct LinkRow<'a> {
    url: &'a str,
    destination: String,
}

// Handles the 'links' subcommand
//
// Lists every URL the scanner sees, with the destination behind any wrapper
async fn handle_links(args: &BodyArgs) -> Result<i32> {
    let Some(body) = combined_body(args).await? else {
        eprintln!("⚠️  {}", Notification::NoBody.message());
        return Ok(1);
    };

    let rows: Vec<LinkRow> = resolver::extract_all_urls(&body)
        .into_iter()
        .map(|url| LinkRow {
            url,
            destination: resolver::extract_direct_url(url),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(0);
    }

    if rows.is_empty() {
        println!("No links found");
        return Ok(0);
    }

    for row in &rows {
        if row.destination == row.url {
            println!("{}", row.url);
        } else {
            println!("{}\n   -> {}", row.url, row.destination);
        }
    }

    println!();
    println!("📋 Total: {}", rows.len());

    Ok(0)
}
