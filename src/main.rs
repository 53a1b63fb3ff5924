use anyhow::Result;
use clap::Parser;
use log::info;
use podscript::app::{self, App};
use podscript::config::{Cli, Command};
use podscript::headless;
use podscript::logging;
use podscript::podcast_request::GeneratePodcastRequest;
use podscript::script_generator::{HttpScriptGenerator, ScriptGenerator};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let endpoint = cli.generate_url()?;

    match &cli.command {
        None => {
            logging::init_file_logger(&cli.log_file, cli.log_level)?;
            info!("Starting podscript UI against {}", endpoint);
            let generator: Arc<dyn ScriptGenerator> =
                Arc::new(HttpScriptGenerator::new(endpoint, cli.timeout())?);
            app::start_ui(App::new(), generator)
        }
        Some(Command::Generate { topic, articles, message }) => {
            logging::init_stderr_logger(cli.log_level)?;
            let generator = HttpScriptGenerator::new(endpoint, cli.timeout())?;
            let request = GeneratePodcastRequest::new(topic, Some(*articles), message);
            let endpoint = generator.endpoint().to_string();
            let mut stdout = std::io::stdout().lock();
            headless::run_generate(&generator, &request, &endpoint, &mut stdout).await
        }
    }
}
