// src/bin/cli.rs
use color_eyre::eyre::Result;

use ir_survey::cli::{self, Command};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    match cli::parse_args(std::env::args().skip(1))? {
        Command::Help => {
            eprintln!("{}", cli::HELP);
            Ok(())
        }
        Command::Run(options) => {
            cli::run(options).await?;
            Ok(())
        }
    }
}
