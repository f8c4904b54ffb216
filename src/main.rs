use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    pokeguess::cli::run_cli().await
}
