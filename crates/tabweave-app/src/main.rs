mod app_state;
mod cli;
mod parser;
mod transport;

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        eprintln!("\n--- tabweave crashed ---");
        if let Some(location) = info.location() {
            eprintln!("at {}:{}", location.file(), location.line());
        }
        eprintln!("------------------------\n");
        default_hook(info);
    }));
}

fn main() {
    install_panic_hook();

    let args = cli::parse();

    // Config is read before logging so its level can seed the filter. Load
    // errors, validation included, are only reported once the subscriber
    // is installed below.
    let config = tabweave_config::load_config_from(args.config.as_deref());

    let fallback = config
        .as_ref()
        .map(|c| c.logging.level.directive())
        .unwrap_or("tabweave=info");
    let log_directive = args.log_level.as_deref().unwrap_or(fallback);
    let directive: Directive = log_directive
        .parse()
        .or_else(|_| fallback.parse())
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    tracing::info!("tabweave v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    let config = config.unwrap_or_else(|e| {
        tracing::warn!("Config load failed: {e}");
        tracing::warn!("Falling back to default config");
        tabweave_config::TabweaveConfig::default()
    });
    tracing::info!(
        "Config loaded (tick rate: {} Hz, max tabs: {})",
        config.runtime.tick_hz,
        config.tabs.max_tabs
    );

    let mut app = app_state::HeadlessApp::new(config);

    if let Some(ref path) = args.script {
        match app_state::load_script(path) {
            Ok(commands) => {
                tracing::info!("Loaded {} script commands from {}", commands.len(), path.display());
                app.queue_commands(commands);
            }
            Err(e) => tracing::error!("Script rejected: {e}"),
        }
    }

    for url in &args.urls {
        if let Err(e) = app.open(url) {
            tracing::warn!("Could not open {url}: {e}");
        }
    }

    let summary = app.run(args.max_ticks);
    for notification in app.notifications().visible() {
        tracing::warn!("{}: {}", notification.title, notification.body);
    }
    tracing::info!("{} tabs open at exit", app.browser().tabs().len());
    tracing::info!(
        ticks = summary.ticks,
        rendered = summary.rendered,
        failed = summary.failed,
        "Shutdown complete"
    );
    if summary.failed > 0 {
        std::process::exit(1);
    }
}
