//! # MediaBoard Main Entry Point
//!
//! Command-line client for the discussion board.

use anyhow::Result;
use mediaboard::{
    cmd_args::CommandLineArgs,
    config,
    controllers::{run_offline, AppController},
    models::Catalog,
    NoticeKind, ViewEvent,
};
use std::sync::Arc;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing_subscriber();

    let cmd_args = CommandLineArgs::parse();
    let profile_path = config::get_profile_path();
    let profile = config::load_profile(cmd_args.profile(), &profile_path)?;

    let command = cmd_args.command();
    if !command.needs_store() {
        let catalog = match profile.catalog() {
            Some(path) => Catalog::load(path)?,
            None => Catalog::default(),
        };
        println!("{}", run_offline(command, Arc::new(catalog))?);
        return Ok(());
    }

    let mut app = AppController::from_profile(&profile)?;
    if let Some(author) = cmd_args.author() {
        app.set_author(author);
    }
    app.subscribe_to_view_events(Box::new(|event| {
        if let ViewEvent::NoticeRaised(notice) = event {
            match notice.kind {
                NoticeKind::Alert => eprintln!("error: {}", notice.message),
                NoticeKind::Transient => eprintln!("{}", notice.message),
            }
        }
    }));

    let output = app.run(command).await?;
    println!("{}", output.trim_end());
    Ok(())
}

/// Dependency targets whose logs are capped at warn
const QUIET_TARGETS: &[&str] = &[
    "reqwest",
    "hyper",
    "hyper_util",
    "tokio",
    "tower",
    "rustls",
    "tokio_rustls",
];

fn init_tracing_subscriber() {
    let filter = QUIET_TARGETS.iter().fold(
        EnvFilter::from_env(format!(
            "{}_LOG_LEVEL",
            env!("CARGO_PKG_NAME").to_uppercase()
        )),
        |filter, target| {
            filter.add_directive(
                format!("{target}=warn")
                    .parse()
                    .expect("static directive"),
            )
        },
    );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_timer(ChronoLocal::rfc_3339())
        .init();
}
