use anyhow::{Error, Result};
use tracing::error;
use webhook_relay::{
    api::run_api_server,
    config::{Config, LogFormat},
    telemetry::init_tracing,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    let config = Config::load();
    let log_format = match &config {
        Ok(config) => config.log_format,
        Err(_) => LogFormat::from_vars(std::env::vars()),
    };
    init_tracing(log_format);

    let config = config.inspect_err(|e| error!(error = %e, "Invalid configuration"))?;

    run_api_server(config).await
}
