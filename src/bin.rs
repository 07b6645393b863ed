use embed_smoke::embedding::UnavailableProvider;
use embed_smoke::openai::OpenAiEmbeddingProvider;
use embed_smoke::runner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log records share stdout with the report; stay quiet unless RUST_LOG asks.
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()?;

    match OpenAiEmbeddingProvider::from_env() {
        Ok(provider) => {
            log::debug!("using embedding endpoint {}", provider.config().endpoint());
            runner::run(&provider).await;
        }
        Err(err) => runner::run(&UnavailableProvider::new(err)).await,
    }

    anyhow::Ok(())
}
