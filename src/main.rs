use std::path::PathBuf;

use clap::Parser;
use quiz_manager::protocol::DEFAULT_PORT;
use quiz_manager::{Config, Listen};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// JSON file to keep the quizzes in (in-memory if omitted)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// JSON file with extra quizzes to add at startup
    #[arg(long)]
    import: Option<PathBuf>,

    /// Do not create the default quizzes on an empty store
    #[arg(long)]
    no_seed: bool,

    /// Serve a single session on stdin/stdout instead of TCP
    #[arg(long, conflicts_with_all = ["host", "port"])]
    stdio: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let listen = if args.stdio {
            Listen::Stdio
        } else {
            Listen::Tcp {
                host: args.host,
                port: args.port,
            }
        };
        Config {
            listen,
            data: args.data,
            import: args.import,
            seed: !args.no_seed,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = quiz_manager::run(args.into()).await {
        eprintln!("Error running quiz server: {}", e);
        std::process::exit(1);
    }
}
