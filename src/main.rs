use std::path::Path;
use std::sync::Arc;

use futures::{Stream, StreamExt, stream};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use wellness_coach::api::{self, AppState};
use wellness_coach::chat::{ChatSession, Role, SessionOptions, TranscriptEntry};
use wellness_coach::coach::ResponseSelector;
use wellness_coach::config::{CoachConfig, StoreLocation};
use wellness_coach::profile::Profile;
use wellness_coach::store::{self, Database};

const USAGE: &str = "usage: wellness-coach [serve | chat --user <id>]";

enum Command {
    Serve,
    Chat { user_id: String },
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    match args.next().as_deref() {
        None | Some("serve") => Ok(Command::Serve),
        Some("chat") => {
            let mut user_id =
                std::env::var("WELLNESS_USER").unwrap_or_else(|_| "local-user".to_string());
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--user" | "-u" => {
                        user_id = args.next().ok_or("--user needs a value")?;
                    }
                    other => return Err(format!("unknown argument: {other}")),
                }
            }
            Ok(Command::Chat { user_id })
        }
        Some(other) => Err(format!("unknown command: {other}")),
    }
}

fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "wellness-coach.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}\n{USAGE}");
            std::process::exit(2);
        }
    };

    let config = CoachConfig::from_env()?;
    let _log_guard = init_tracing(config.log_dir.as_deref());

    eprintln!("🌿 Wellness Coach v{}", env!("CARGO_PKG_VERSION"));
    match &config.store {
        StoreLocation::Local(path) => eprintln!("   Database: {}", path.display()),
        StoreLocation::Remote { url, .. } => eprintln!("   Database: {url}"),
    }

    let db = store::open(&config.store).await?;
    let selector = Arc::new(ResponseSelector::new());
    let options = SessionOptions::from(&config);

    match command {
        Command::Serve => serve(&config, db, selector, options).await,
        Command::Chat { user_id } => chat(db, selector, options, &user_id).await,
    }
}

async fn serve(
    config: &CoachConfig,
    db: Arc<dyn Database>,
    selector: Arc<ResponseSelector>,
    options: SessionOptions,
) -> anyhow::Result<()> {
    let app = api::routes(AppState {
        db,
        selector,
        options,
    });
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    eprintln!("   API: http://0.0.0.0:{}/api/users/{{id}}/chat\n", config.port);
    tracing::info!(port = config.port, "HTTP server started");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Lines typed on stdin, trimmed. Ends at EOF.
fn stdin_lines() -> impl Stream<Item = String> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line.trim().to_string()).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
    });

    stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|line| (line, rx)) })
}

fn print_entry(entry: &TranscriptEntry) {
    match entry.role {
        Role::User => println!("you: {}", entry.content),
        Role::Assistant => println!("\n{}\n", entry.content),
    }
}

async fn chat(
    db: Arc<dyn Database>,
    selector: Arc<ResponseSelector>,
    options: SessionOptions,
    user_id: &str,
) -> anyhow::Result<()> {
    let profile = match db.get_profile(user_id).await? {
        Some(profile) => profile,
        None => {
            tracing::warn!(user_id = user_id, "No stored profile, chatting with an empty one");
            Profile::new(user_id)
        }
    };

    let mut session = ChatSession::start(db, selector, profile, options).await;
    for entry in session.transcript().entries() {
        print_entry(entry);
    }
    eprintln!("   Type a message and press Enter. /quit to exit.");

    let lines = stdin_lines();
    futures::pin_mut!(lines);
    eprint!("> ");
    while let Some(line) = lines.next().await {
        if line == "/quit" {
            break;
        }
        if let Some(outcome) = session.submit(&line).await {
            // the user's own line is already on screen
            for entry in outcome.entries.iter().skip(1) {
                print_entry(entry);
            }
        }
        eprint!("> ");
    }
    Ok(())
}
