#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sleep_tracker_backend::run().await
}
