use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use playgate::config::{ConfigError, ProbeConfig};
use playgate::history::MemoryHistory;
use playgate::probe::{HttpAuthProbe, TransportError};
use playgate::router::{Destination, Router, RouterError};
use playgate::routes::{GuardKind, ROUTES, Target};
use playgate::session::CookieSession;
use playgate::view::View;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Router(#[from] RouterError),
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct VisitReport<'a> {
    trail: &'a [String],
    view: &'a View<Destination>,
}

#[derive(Parser, Debug)]
#[command(name = "playgate", about = "Check sessions and walk guarded routes against a live auth backend")]
struct Cli {
    /// Auth backend base URL. Falls back to `API_URL` from the environment.
    #[arg(long, env = "API_URL")]
    api_url: Option<String>,

    /// Cookie string sent as credentials, e.g. `token=abc; theme=dark`.
    #[arg(long, env = "PLAYGATE_COOKIE", default_value = "")]
    cookie: String,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the auth probe once and print the verdict.
    Probe,
    /// Navigate to a path and follow guard redirects until it settles.
    Visit { path: String },
    /// List the route table.
    Routes,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Routes => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(ROUTES)?);
            } else {
                print_routes();
            }
            Ok(())
        }
        Command::Probe => {
            let probe = build_probe(cli.api_url.as_deref(), &cli.cookie)?;
            let authenticated = probe.verify_auth().await;
            if cli.json {
                println!("{}", serde_json::json!({ "authenticated": authenticated }));
            } else {
                println!("{}", if authenticated { "authenticated" } else { "unauthenticated" });
            }
            Ok(())
        }
        Command::Visit { path } => {
            let probe = build_probe(cli.api_url.as_deref(), &cli.cookie)?;
            let min_verify_delay = probe.config().min_verify_delay;
            let router = Router::new(Arc::new(probe), Arc::new(MemoryHistory::new("/")))
                .with_min_verify_delay(min_verify_delay);

            let visit = router.visit(&path).await?;
            if cli.json {
                let report = VisitReport { trail: &visit.trail, view: &visit.view };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("trail: {}", visit.trail.join(" -> "));
                println!("view:  {}", describe(&visit.view));
            }
            visit.mounted.unmount().await;
            Ok(())
        }
    }
}

fn build_probe(api_url: Option<&str>, cookie: &str) -> Result<HttpAuthProbe, CliError> {
    let api_url = api_url.ok_or(ConfigError::MissingVar("API_URL"))?;
    let config = ProbeConfig::from_env_with_api_url(api_url)?;
    Ok(HttpAuthProbe::from_config(config, Arc::new(CookieSession::parse(cookie)))?)
}

fn describe(view: &View<Destination>) -> String {
    match view {
        View::Loading(indicator) => format!("loading ({})", indicator.caption),
        View::Empty => "nothing".to_owned(),
        View::Content(destination) => {
            let name = match destination.target {
                Target::Page(page) => page.name().to_owned(),
                Target::Redirect(to) => format!("redirect to {to}"),
                Target::AuthCallback => "auth callback".to_owned(),
            };
            if destination.params.is_empty() {
                name
            } else {
                format!("{name} {:?}", destination.params)
            }
        }
    }
}

fn print_routes() {
    for route in ROUTES {
        let guard = match route.guard {
            GuardKind::Protected => "protected",
            GuardKind::Reverse => "reverse",
            GuardKind::Public => "public",
        };
        println!("{:<26} {guard}", route.pattern);
    }
}
