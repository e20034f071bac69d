use agentview::preprocess::{self, PreprocessConfig};
use anyhow::Context;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = PreprocessConfig::from_env();
    let summary = preprocess::run(&config)
        .with_context(|| format!("preprocessing into {}", config.output.display()))?;

    tracing::info!(
        "Done: {} agents written, {} failed, {} price series loaded",
        summary.agents_written,
        summary.agents_failed,
        summary.symbols_loaded
    );
    Ok(())
}
