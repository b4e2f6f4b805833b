use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;

use rbxjoin::prelude::*;
use rbxjoin::transport::TransportError;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: join-cli <command>

commands:
  validate                      check that the cookie works
  whoami                        print the account id and name
  ticket                        request a join ticket
  resolve <code|link>           resolve a private server reference
  join <placeId>                fetch a public join script
  join-private <code|link>      resolve, then fetch a private join script
  launch-uri <placeId> [--job <jobId> | --private <code|link>]

environment:
  RBXJOIN_COOKIE         the .ROBLOSECURITY value (required)
  RBXJOIN_TIMEOUT_SECS   per-call deadline in seconds (default 15)
  RUST_LOG               log filter (default info)";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

struct Config {
    cookie: String,
    timeout: Duration,
}

impl Config {
    fn from_env() -> Result<Self, String> {
        let cookie = std::env::var("RBXJOIN_COOKIE")
            .ok()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or("RBXJOIN_COOKIE is not set")?;
        let timeout = match std::env::var("RBXJOIN_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("RBXJOIN_TIMEOUT_SECS is not a number: {raw}"))?,
            Err(_) => 15,
        };
        Ok(Self {
            cookie,
            timeout: Duration::from_secs(timeout),
        })
    }
}

/// Applies the per-call deadline. Expiry is reported as a transport
/// timeout.
async fn deadline<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, RbxJoinError>>,
) -> Result<T, RbxJoinError> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| TransportError::Timeout)?
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn run(config: Config, args: &[String]) -> Result<(), RbxJoinError> {
    let limit = config.timeout;
    let mut client = RbxClient::new(config.cookie)?;
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["validate"] => {
            let result = deadline(limit, client.validate()).await?;
            match (result.ok, result.identity, result.failure) {
                (true, Some(identity), _) => println!(
                    "valid: {} ({})",
                    identity.id,
                    identity.name.as_deref().unwrap_or("name unavailable")
                ),
                (true, None, _) => println!("valid (confirmed by backup check)"),
                (false, _, Some(failure)) => println!("invalid: {failure}"),
                (false, _, None) => println!("invalid"),
            }
        }
        ["whoami"] => {
            let identity = deadline(limit, client.identity()).await?;
            println!("{}\t{}", identity.id, identity.name.unwrap_or_default());
        }
        ["ticket"] => {
            let ticket = deadline(limit, client.issue_ticket()).await?;
            println!("ticket issued ({} chars)", ticket.as_str().len());
        }
        ["resolve", reference] => {
            let server = deadline(limit, client.resolve(reference)).await?;
            println!("{}\t{}", server.place_id, server.server_code);
        }
        ["join", place_id] => {
            let script = deadline(limit, client.join_script(place_id)).await?;
            println!("{script}");
        }
        ["join-private", reference] => {
            let server = deadline(limit, client.resolve(reference)).await?;
            let script = deadline(
                limit,
                client.private_join_script(&server.place_id, &server.server_code),
            )
            .await?;
            println!("{script}");
        }
        ["launch-uri", place_id, rest @ ..] => {
            let target = match rest {
                [] => LaunchTarget::Public,
                ["--job", job_id] => LaunchTarget::Instance {
                    job_id: job_id.to_string(),
                },
                ["--private", reference] => {
                    let server = deadline(limit, client.resolve(reference)).await?;
                    LaunchTarget::Private {
                        access_code: server.server_code,
                    }
                }
                _ => {
                    eprintln!("{USAGE}");
                    return Ok(());
                }
            };
            let uri = deadline(limit, client.prepare_launch(place_id, target)).await?;
            println!("{uri}");
        }
        _ => eprintln!("{USAGE}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(config, &args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, kind = %e.kind(), "command failed");
            eprintln!("{}", e.user_message());
            if e.is_transient() {
                eprintln!("(this may be temporary; try again)");
            }
            ExitCode::FAILURE
        }
    }
}
