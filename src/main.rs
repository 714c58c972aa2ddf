// src/main.rs

use dagrun::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(succeeded) => {
            if !succeeded {
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("dagrun error: {err:?}");
            std::process::exit(2);
        }
    }
}

async fn run_main() -> anyhow::Result<bool> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    let summary = run(args).await?;
    Ok(summary.succeeded)
}
