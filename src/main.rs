use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    init_tracing();

    let cli = druginfo_web::cli::Cli::parse();
    match druginfo_web::cli::run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            std::process::ExitCode::SUCCESS
        }
        Err(err) => {
            if let Some(app_err) = err.downcast_ref::<druginfo_web::error::DrugInfoError>() {
                eprintln!("Error: {app_err}");
            } else {
                eprintln!("Error: {err}");
            }
            std::process::ExitCode::from(1)
        }
    }
}
