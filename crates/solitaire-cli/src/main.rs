//! Diagnostic CLI for the solitaire game server.
//!
//! Creates a session, mirrors the server's state, and prints display
//! summaries. `autoplay` additionally drives the server's auto-move
//! endpoint until nothing moves anymore, which makes it a handy smoke
//! test for the whole HTTP surface.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use solitaire_client::config::SessionConfig;
use solitaire_client::error::ClientError;
use solitaire_client::session::SessionClient;
use solitaire_core::protocol::GameVariant;
use solitaire_core::snapshot::{PileId, TABLEAU_COUNT};
use solitaire_core::summary::DisplaySummary;

#[derive(Parser)]
#[command(name = "solitaire")]
#[command(about = "Talk to a solitaire game server", long_about = None)]
struct Cli {
    /// Game server base URL
    #[arg(short, long, default_value = "http://localhost:8080")]
    server: String,

    /// Rule variant to play (klondike, klondike-3)
    #[arg(short, long, default_value = "klondike")]
    variant: GameVariant,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a game and print a state summary
    Summary,
    /// List the variants the server offers
    Variants,
    /// Create a game and auto-play server-chosen moves
    Autoplay {
        /// Stop after this many moves
        #[arg(short, long, default_value_t = 32)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() {
    // Initialise tracing (respects RUST_LOG env var).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let config = SessionConfig::new(cli.server, cli.variant);
    let mut client = SessionClient::new(config);

    match cli.command {
        Command::Variants => {
            let list = client.list_variants().await?;
            for v in &list.variants {
                let marker = if *v == list.default_variant { " (default)" } else { "" };
                println!("{v}{marker}");
            }
        }
        Command::Summary => {
            let snapshot = client.new_game().await?;
            println!("{}", DisplaySummary::of(&snapshot));
            println!("{} cards on the table, {}", snapshot.total_cards(), client.meta());
        }
        Command::Autoplay { limit } => {
            client.new_game().await?;
            autoplay(&mut client, limit).await?;
            if let Some(summary) = client.summarize() {
                println!("{summary}");
            }
            println!("{}", client.meta());
        }
    }
    Ok(())
}

/// Repeatedly ask the server to auto-move from the waste and each tableau
/// column, drawing from the stock when nothing moves. Stops on win, on
/// `limit`, or when the server has nothing left to offer.
async fn autoplay(client: &mut SessionClient, limit: u32) -> Result<(), ClientError> {
    let mut played = 0;
    while played < limit {
        let mut moved = false;
        let sources =
            std::iter::once(PileId::Waste).chain((0..TABLEAU_COUNT).map(PileId::Tableau));
        for from in sources {
            if played >= limit {
                return Ok(());
            }
            let empty = client
                .snapshot()
                .is_none_or(|s| s.cards(from).is_empty());
            if empty {
                continue;
            }
            match client.auto_move(from).await {
                Ok(chosen) => {
                    println!("moved {chosen}");
                    played += 1;
                    moved = true;
                    if client.check_win().await?.game_won {
                        println!("game won, {}", client.meta());
                        return Ok(());
                    }
                }
                // "No moves from <pile>" comes back as a 200 rejection.
                Err(ClientError::Rejected { status: 200, .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        if !moved {
            match client.draw().await {
                Ok(_) => println!("drew from stock"),
                // Stock exhausted: nothing movable anywhere, stop.
                Err(ClientError::Rejected { status: 200, .. }) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }
    Ok(())
}
