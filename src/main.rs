use clap::Parser;
use deepseek_chat::cli::Args;
use deepseek_chat::config::Config;
use dotenv::dotenv;
use log::error;
use std::error::Error;
use std::process;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    deepseek_chat::run(config).await
}
