use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use console::style;
use dotenv::dotenv;
use romagnosi_core::{
    GeminiClient, Provider, Service, provider::GEMINI_API_URL, validate_api_key,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "romagnosi")]
#[command(about = "Romagnosi Bot: orientation quiz, school assistant, speech and image-to-video")]
struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    api: ApiArgs,

    #[command(subcommand)]
    command: Command,
}

/// Endpoint and model overrides
#[derive(Args, Clone)]
pub struct ApiArgs {
    /// Base URL of the Gemini REST API
    #[arg(long, global = true, env = "GEMINI_API_URL", default_value = GEMINI_API_URL)]
    api_url: String,

    #[arg(long, global = true, env = "ROMAGNOSI_CHAT_MODEL")]
    chat_model: Option<String>,

    #[arg(long, global = true, env = "ROMAGNOSI_SPEECH_MODEL")]
    speech_model: Option<String>,

    #[arg(long, global = true, env = "ROMAGNOSI_VIDEO_MODEL")]
    video_model: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Take the orientation quiz
    Quiz(commands::quiz::QuizArgs),
    /// Talk to the school assistant
    Chat,
    /// Read a text aloud into a WAV file
    Speak(commands::speak::SpeakArgs),
    /// Animate a picture into a short video
    Animate(commands::animate::AnimateArgs),
}

/// Build a client, exiting early when no API key is configured
pub fn connect(api: &ApiArgs) -> GeminiClient {
    let api_key = match validate_api_key() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let mut provider = Provider::new(api_key).with_api_url(&api.api_url);
    for (service, model) in [
        (Service::Chat, &api.chat_model),
        (Service::Speech, &api.speech_model),
        (Service::Video, &api.video_model),
    ] {
        if let Some(model) = model {
            provider = provider.with_model(service, model);
        }
    }
    GeminiClient::new(provider)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize .env before clap reads env fallbacks
    dotenv().ok();

    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::WARN
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    println!(
        "\n{}  {}\n",
        style("romagnosi").cyan().bold(),
        style("I.I.S. G.D. Romagnosi").dim()
    );

    match cli.command {
        Command::Quiz(args) => commands::quiz::run(args, &cli.api).await,
        Command::Chat => commands::chat::run(connect(&cli.api)).await,
        Command::Speak(args) => commands::speak::run(args, connect(&cli.api)).await,
        Command::Animate(args) => commands::animate::run(args, &cli.api).await,
    }
}
