//! netops-voice command line entry point

use clap::{Parser, Subcommand};
use netops_voice::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// Voice and text command dispatch for the network operations dashboard
#[derive(Parser, Debug)]
#[command(name = "netops-voice")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Serve canned payloads instead of calling the data service
    #[arg(long, global = true)]
    offline: bool,

    /// Enable JSON logging format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dispatch one utterance and print the announcement
    Say {
        /// The utterance, e.g. "investigate bww store 155"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Read utterances from stdin, one per line (default)
    Repl,
    /// Press a keyboard shortcut, e.g. "Ctrl+Shift+H"
    Key {
        chord: String,
    },
    /// List exact phrases and grammar rules in match order
    Patterns,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so announcements stay readable on stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    if let Some(Command::Patterns) = args.command {
        return cli::run_patterns(args.json);
    }

    let config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    match args.command {
        Some(Command::Say { text }) => {
            cli::run_say(config, args.offline, &text.join(" "), args.json).await
        }
        Some(Command::Key { chord }) => cli::run_key(config, args.offline, &chord, args.json).await,
        Some(Command::Patterns) => cli::run_patterns(args.json),
        Some(Command::Repl) | None => cli::run_repl(config, args.offline, args.json).await,
    }
}
