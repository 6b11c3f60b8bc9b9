use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use selsearch::{
    config::{engines::DEFAULT_CONFIG_FILE, EngineCatalog},
    create_router,
    domain::{modifier::substitute, SEARCH_TERMS},
    validation, AppState,
};

const DEFAULT_BIND: &str = "127.0.0.1:8000";

fn cli() -> Command {
    Command::new("selsearch")
        .about("Builds search URLs from a text selection and per-engine URL templates")
        .arg(
            Arg::new("engines")
                .short('e')
                .long("engines")
                .value_name("ENGINES")
                .help("Path to a YAML file containing search engines")
                .default_value(DEFAULT_CONFIG_FILE)
                .global(true),
        )
        .arg(
            Arg::new("bind")
                .short('b')
                .long("bind")
                .value_name("ADDRESS")
                .help("Address the HTTP server listens on")
                .default_value(DEFAULT_BIND)
                .global(true),
        )
        .subcommand(Command::new("serve").about("Run the redirect server (default)"))
        .subcommand(
            Command::new("expand")
                .about("Substitute text into a single template and print the result")
                .arg(
                    Arg::new("template")
                        .short('t')
                        .long("template")
                        .value_name("TEMPLATE")
                        .required(true),
                )
                .arg(
                    Arg::new("text")
                        .short('x')
                        .long("text")
                        .value_name("TEXT")
                        .required(true),
                )
                .arg(
                    Arg::new("variable")
                        .short('v')
                        .long("variable")
                        .value_name("NAME")
                        .default_value(SEARCH_TERMS),
                )
                .arg(
                    Arg::new("no_encode")
                        .long("no-encode")
                        .action(ArgAction::SetTrue)
                        .help("Do not percent-encode the substituted text"),
                ),
        )
        .subcommand(Command::new("lint").about("Check every engine template in the catalog"))
}

fn string_arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .with_context(|| format!("missing argument: {}", name))
}

async fn serve(matches: &ArgMatches) -> Result<()> {
    let catalog = EngineCatalog::load(string_arg(matches, "engines")?)?;
    let bind = string_arg(matches, "bind")?;

    let app = create_router(AppState::new(catalog));
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Could not bind {}", bind))?;

    info!(address = %bind, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

fn expand(matches: &ArgMatches) -> Result<()> {
    let url = substitute(
        string_arg(matches, "template")?,
        string_arg(matches, "variable")?,
        string_arg(matches, "text")?,
        !matches.get_flag("no_encode"),
    );
    println!("{}", url);
    Ok(())
}

fn lint(matches: &ArgMatches) -> Result<()> {
    let catalog = EngineCatalog::load(string_arg(matches, "engines")?)?;

    let mut failing = 0;
    for engine in catalog.engines() {
        let issues = validation::lint_template(&engine.url);
        if issues.is_empty() {
            continue;
        }
        failing += 1;
        println!("{} ({})", engine.alias, engine.name);
        for issue in issues {
            println!("  - {}", issue);
        }
    }

    if failing > 0 {
        bail!("{} engine(s) have template issues", failing);
    }
    println!("{} engine(s) OK", catalog.len());
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG overrides the default filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("selsearch=info,tower_http=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("expand", sub)) => expand(sub),
        Some(("lint", sub)) => lint(sub),
        Some(("serve", sub)) => serve(sub).await,
        _ => serve(&matches).await,
    }
}
