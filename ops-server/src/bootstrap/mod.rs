//! Application bootstrap
//!
//! Wires configuration, logging, and services into a ready-to-serve
//! router. `main` stays thin: it calls `setup()` and serves the result.

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;

pub mod logging;
pub mod services;

use crate::api::{create_router, AppState};
use crate::config::Config;

pub struct Application {
    pub router: Router,
    pub bind_address: String,
    pub socket_addr: SocketAddr,
}

pub async fn setup() -> Result<Application> {
    // 1. Load configuration
    let config = load_config();

    // 2. Setup logging
    logging::setup(&config);

    // 3. Setup services
    let registry = services::setup(&config).await?;

    // 4. Build the API router
    let allowed_origins = config.allowed_origins();
    let cors_disabled = config.cors.disable;

    let app_state = AppState {
        store: registry.store,
        registry: registry.registry,
        hub: registry.hub,
        coordinator: registry.coordinator,
        allowed_origins: allowed_origins.clone(),
        cors_disabled,
        config: Arc::new(config.clone()),
    };

    if cors_disabled {
        tracing::warn!("CORS is DISABLED in config - all origins will be allowed!");
    } else {
        tracing::info!("API state created with CORS origins: {:?}", allowed_origins);
    }

    let router = create_router(app_state);
    tracing::info!("API router built");

    let bind_address = config.server_address();
    let socket_addr: SocketAddr = bind_address
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", bind_address, e))?;

    Ok(Application {
        router,
        bind_address,
        socket_addr,
    })
}

fn load_config() -> Config {
    // Determine config directory
    let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_string_lossy().into_owned()))
            .unwrap_or_else(|| ".".to_string())
    });
    let config_base = format!("{}/config", config_dir);

    eprintln!(
        "Config directory: {}, config base: {}",
        config_dir, config_base
    );

    match Config::from_file(&config_base) {
        Ok(cfg) => {
            eprintln!("Configuration loaded successfully from {}", config_base);
            cfg
        }
        Err(e) => {
            eprintln!("Failed to load configuration: {}, using defaults", e);
            // Drop a commented starter file so the defaults are discoverable
            if let Err(e) = Config::write_default(format!("{}.toml", config_base)) {
                eprintln!("Failed to write default config: {}", e);
            }
            Config::default()
        }
    }
}
