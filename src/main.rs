use clap::{Parser, Subcommand};
use std::path::PathBuf;

use orientador::config::Config;
use orientador::{commands, logging, ui};

#[derive(Parser)]
#[command(name = "orientador")]
#[command(version)]
#[command(about = "Asistente de formación para orientadores de Cuentas Sanas", long_about = None)]
struct Cli {
    /// Path to the config file (default: ~/.orientador/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the model from the config file
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question and print the streamed answer
    Ask { question: Vec<String> },
    /// List the suggested questions
    Suggestions,
    /// List the quick resources
    Resources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let log_path = logging::init_file(&Config::home_dir()?.join("logs"))?;
            let config = Config::load(cli.config.as_deref())?.with_model(cli.model);
            tracing::info!("Starting chat UI, logging to {}", log_path.display());
            ui::run(config).await
        }
        Some(Commands::Ask { question }) => {
            logging::init_stderr();
            let config = Config::load(cli.config.as_deref())?.with_model(cli.model);
            commands::ask(&config, &question.join(" ")).await
        }
        Some(Commands::Suggestions) => {
            commands::list_suggestions();
            Ok(())
        }
        Some(Commands::Resources) => {
            commands::list_resources();
            Ok(())
        }
    }
}
