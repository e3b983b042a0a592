//! Command-line entrypoints: the web server and a one-shot terminal lookup.

use clap::{Parser, Subcommand};

use crate::entities::drug;
use crate::render;
use crate::sources::openfda::OpenFdaClient;

#[derive(Parser, Debug)]
#[command(
    name = "druginfo",
    version,
    about = "Look up openFDA drug labels by generic or Indian brand name"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web front-end
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Look up one drug and print its label summary
    Lookup {
        /// Generic or brand name, e.g. `dolo 650`
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        /// Print JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
}

/// Runs a parsed command and returns what should be printed to stdout.
///
/// # Errors
///
/// Returns an error when the server cannot start or output cannot be rendered.
pub async fn run(cli: Cli) -> anyhow::Result<String> {
    match cli.command {
        Commands::Serve { host, port } => {
            crate::web::run_http(&host, port).await?;
            Ok(String::new())
        }
        Commands::Lookup { name, json } => {
            let client = OpenFdaClient::new()?;
            let info = drug::get(&client, &name.join(" ")).await?;
            if json {
                Ok(render::json::to_pretty(&info)?)
            } else {
                Ok(render::markdown::drug_markdown(&info)?)
            }
        }
    }
}
