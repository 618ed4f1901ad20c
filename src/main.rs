use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    auth_gate::app::run().await
}
