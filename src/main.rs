use tracing::info;

use otel_hello::{logging, trace, Config, Server};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logging::init();

    info!("Starting otel_hello server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {}", err);
            std::process::exit(1);
        }
    };
    config.log_summary();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let provider = trace::init_tracer(&config.otel).map_err(|e| {
        eprintln!("Failed to initialize tracing: {}", e);
        e
    })?;

    let server = Server::new(config, &provider);

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                eprintln!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    // Flush any spans still queued in the batch processor.
    trace::shutdown_tracer(&provider);

    Ok(())
}
