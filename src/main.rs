use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use sat_quiz::protocol::DEFAULT_PORT;
use sat_quiz::{
    ConfigError, Quiz, QuizConfig, QuizError, RemoteRepository, SetupField, SetupForm, logging,
    server,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve a question bank to remote takers
    Serve {
        /// JSON question bank
        #[arg(short, long, env = "SAT_QUIZ_BANK")]
        bank: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT, env = "SAT_QUIZ_PORT")]
        port: u16,

        /// Address to bind to
        #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
        host: IpAddr,
    },

    /// Take a timed practice test in the terminal
    Take {
        /// JSON question bank
        #[arg(
            short,
            long,
            env = "SAT_QUIZ_BANK",
            conflicts_with = "server",
            required_unless_present = "server"
        )]
        bank: Option<PathBuf>,

        /// Question server URL (e.g., ws://192.168.1.5:4000)
        #[arg(short, long, env = "SAT_QUIZ_SERVER")]
        server: Option<String>,

        /// Test number to pre-fill
        #[arg(short, long)]
        test: Option<String>,

        /// Number of questions to pre-fill
        #[arg(short = 'n', long)]
        count: Option<String>,

        /// Seconds to wait for the question server to answer
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// TOML file overriding the time budget and tick interval
        #[arg(short, long, env = "SAT_QUIZ_CONFIG")]
        config: Option<PathBuf>,

        /// Write logs to this file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<(), QuizError> {
    match command {
        Command::Serve { bank, port, host } => {
            logging::init_stderr()?;
            server::run(SocketAddr::new(host, port), bank).await
        }
        Command::Take {
            bank,
            server,
            test,
            count,
            timeout,
            config,
            log_file,
        } => {
            if let Some(path) = log_file {
                logging::init_file(path)?;
            }

            let config = match config {
                Some(path) => QuizConfig::load(path)?,
                None => QuizConfig::default(),
            };

            let quiz = match (bank, server) {
                (Some(bank), _) => {
                    info!("Using question bank {}", bank.display());
                    Quiz::from_json(bank, config)?
                }
                (None, Some(url)) => {
                    info!("Using question server {}", url);
                    let repository = RemoteRepository::new(url)
                        .with_timeout(Duration::from_secs(timeout));
                    Quiz::new(config, Arc::new(repository))?
                }
                (None, None) => {
                    return Err(ConfigError::Invalid(
                        "either --bank or --server is required".to_string(),
                    )
                    .into());
                }
            };

            let form = SetupForm {
                focus: if test.is_some() {
                    SetupField::Count
                } else {
                    SetupField::TestId
                },
                test_id: test.unwrap_or_default(),
                count: count.unwrap_or_default(),
            };

            quiz.with_setup(form).run().await
        }
    }
}
