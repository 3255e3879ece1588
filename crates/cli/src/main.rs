use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::PathBuf;
use talkbridge_core::channels::{InboundMessage, WebhookPayload};
use talkbridge_core::content::AccountContext;

#[derive(Parser)]
#[command(name = "talkbridge")]
#[command(about = "talkbridge CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: TALKBRIDGE_CONFIG_PATH or ~/.talkbridge/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Resolve a Talk webhook body (from FILE or stdin) into text and attachments.
    /// Prints nothing for events that carry no message.
    Resolve {
        /// Config file path (default: TALKBRIDGE_CONFIG_PATH or ~/.talkbridge/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Nextcloud base URL (overrides TALKBRIDGE_BASE_URL and config)
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Account for WebDAV download URLs (overrides TALKBRIDGE_API_USER and config)
        #[arg(long, value_name = "USER")]
        api_user: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Webhook body file; reads stdin when omitted
        file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Resolved text plus one line per attachment
    Text,
    /// Inbound message as JSON
    Json,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("talkbridge {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Resolve {
            config,
            base_url,
            api_user,
            format,
            file,
        }) => {
            if let Err(e) = run_resolve(config, base_url, api_user, format, file) {
                log::error!("resolve failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(talkbridge_core::config::default_config_path);
    let dir = talkbridge_core::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

fn read_body(file: Option<PathBuf>) -> anyhow::Result<Vec<u8>> {
    use anyhow::Context;

    match file {
        Some(path) => {
            std::fs::read(&path)
                .with_context(|| format!("reading webhook body from {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("reading webhook body from stdin")?;
            Ok(buf)
        }
    }
}

fn run_resolve(
    config_path: Option<PathBuf>,
    base_url: Option<String>,
    api_user: Option<String>,
    format: OutputFormat,
    file: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (config, _) = talkbridge_core::config::load_config(config_path)?;
    let configured = AccountContext::from_config(&config);
    let account = AccountContext::new(
        base_url.or_else(|| configured.base_url().map(String::from)),
        api_user.or_else(|| configured.api_user().map(String::from)),
    );
    if !account.is_configured() {
        log::info!("no base URL/account configured; download URLs come from payload links");
    }

    let body = read_body(file)?;
    let envelope = WebhookPayload::parse(&body)?.into_envelope(chrono::Utc::now());
    let Some(message) = InboundMessage::from_envelope(&envelope, &account) else {
        log::info!("{} event carries no message, nothing to print", envelope.category);
        return Ok(());
    };

    match format {
        OutputFormat::Text => {
            println!("{}", talkbridge_core::render::render_text(&message.message))
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&message)?),
    }
    Ok(())
}
