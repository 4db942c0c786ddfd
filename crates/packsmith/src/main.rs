#[tokio::main]
async fn main() -> anyhow::Result<()> {
    packsmith_lib::main().await
}
