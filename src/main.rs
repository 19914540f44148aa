use fusionquant::application::client::ForecastClient;
use fusionquant::application::forecast_agent::ForecastAgent;
use fusionquant::config::{Config, log_filter};
use fusionquant::interfaces::ui::ForecastApp;

use tracing::info;
use tracing_subscriber::prelude::*;

fn main() -> anyhow::Result<()> {
    // 0. Load Env (before starting anything)
    dotenvy::dotenv().ok();

    // 1. Setup Logging
    tracing_subscriber::registry()
        .with(log_filter())
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    info!("Initializing FusionQuant {}...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Mode={:?}, Deployment={:?}, Service={}",
        config.mode, config.deployment, config.service.base_url
    );
    let service = config.create_prediction_service()?;

    // 2. Tokio Runtime in a background thread; the UI owns the main thread
    let (handle_tx, handle_rx) = crossbeam_channel::bounded(1);

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!("Failed to build Tokio runtime: {}", e);
                return;
            }
        };

        let _ = handle_tx.send(rt.handle().clone());
        info!("Background Runtime Started.");

        // Fetch tasks are detached; the runtime must not drop.
        rt.block_on(std::future::pending::<()>());
    });

    let runtime = handle_rx
        .recv()
        .map_err(|_| anyhow::anyhow!("Background runtime failed to start"))?;

    // 3. Run UI (Blocks Main Thread)
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("FusionQuant"),
        ..Default::default()
    };

    let default_ticker = config.default_ticker.clone();
    eframe::run_native(
        "FusionQuant",
        native_options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let client =
                ForecastClient::new(runtime, service).with_notifier(move || ctx.request_repaint());
            let agent = ForecastAgent::new(client, &default_ticker);
            Ok(Box::new(ForecastApp::new(agent)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
