#[tokio::main]
async fn main() -> anyhow::Result<()> {
    misinfo_risk_lib::run().await
}
