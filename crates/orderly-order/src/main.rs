use orderly_core::Config;
use orderly_infra::{init_logging, shutdown_logging, start_server};
use orderly_order::setup::initialize_app;
use orderly_order::SERVICE_NAME;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env(SERVICE_NAME)?;

    let guard = init_logging(&config.log)?;

    let (_state, router) = match initialize_app(&config).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Failed to initialize application");
            shutdown_logging(guard);
            return Err(e);
        }
    };

    let result = start_server(&config, router).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Server stopped with error");
    }

    shutdown_logging(guard);
    result.map_err(Into::into)
}
