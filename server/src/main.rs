use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    catalog_server::start_server().await
}
