//! # Application State
//!
//! Shared state for the Axum application: product catalog, payment
//! method registry, provider router, the durable cart store, and the
//! live checkout sessions.

use cart_core::{
    CartStore, Condition, Currency, JsonFileRepository, MethodRegistry, PaymentSession, Price,
    Product, ProductCatalog, ProductCategory, ProviderRouter,
};
use cart_providers::{simulated_router, SimDelays, SimGateway};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Base URL for links in responses
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Directory holding the durable cart slot
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            data_dir: std::env::var("CART_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Product catalog
    pub catalog: Arc<ProductCatalog>,
    /// Payment method registry (fees, limits, availability)
    pub methods: Arc<MethodRegistry>,
    /// Provider router
    pub providers: Arc<ProviderRouter>,
    /// Verification/refund gateway
    pub gateway: Arc<SimGateway>,
    /// The buyer's durable cart
    pub cart: Arc<Mutex<CartStore>>,
    /// Live checkout sessions
    pub sessions: Arc<Mutex<HashMap<Uuid, PaymentSession>>>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState with the simulated provider stack
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let delays = SimDelays::from_env();

        let catalog = load_product_catalog();
        let methods = load_method_registry();

        let repo = JsonFileRepository::new(&config.data_dir);
        let cart = CartStore::open(Box::new(repo));

        Ok(Self::with_parts(
            catalog,
            methods,
            simulated_router(delays),
            SimGateway::new(delays.gateway),
            cart,
            config,
        ))
    }

    /// Assemble state from explicit parts (tests inject an in-memory
    /// repository and zero-latency providers here)
    pub fn with_parts(
        catalog: ProductCatalog,
        methods: MethodRegistry,
        providers: ProviderRouter,
        gateway: SimGateway,
        cart: CartStore,
        config: AppConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            methods: Arc::new(methods),
            providers: Arc::new(providers),
            gateway: Arc::new(gateway),
            cart: Arc::new(Mutex::new(cart)),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }
}

/// Load the product catalog from config, falling back to the built-in
/// demo listing
fn load_product_catalog() -> ProductCatalog {
    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            match ProductCatalog::from_toml(&content) {
                Ok(catalog) => {
                    tracing::info!("Loaded {} products from {}", catalog.products.len(), path);
                    return catalog;
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path, e);
                }
            }
        }
    }

    tracing::warn!("No product catalog found, using demo catalog");
    demo_catalog()
}

/// Load payment method overrides from config, falling back to defaults
fn load_method_registry() -> MethodRegistry {
    let config_paths = [
        "config/methods.toml",
        "../config/methods.toml",
        "../../config/methods.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            match MethodRegistry::from_toml(&content) {
                Ok(registry) => {
                    tracing::info!("Loaded payment method config from {}", path);
                    return registry;
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path, e);
                }
            }
        }
    }

    MethodRegistry::defaults()
}

/// Built-in demo listing so a cold start still has something to sell
fn demo_catalog() -> ProductCatalog {
    let mut catalog = ProductCatalog::new();

    catalog.add(
        Product::new(
            "galaxy-s22",
            "Samsung Galaxy S22",
            Price::from_minor(285_000, Currency::XAF),
        )
        .with_brand("Samsung")
        .with_category(ProductCategory::Smartphone)
        .with_description("128 GB, very good condition, dual SIM")
        .with_stock(4),
    );

    catalog.add(
        Product::new(
            "iphone-12",
            "Apple iPhone 12",
            Price::from_minor(310_000, Currency::XAF),
        )
        .with_brand("Apple")
        .with_category(ProductCategory::Smartphone)
        .with_description("64 GB, battery health 88%")
        .with_stock(2),
    );

    catalog.add(
        Product::new(
            "redmi-pad",
            "Xiaomi Redmi Pad SE",
            Price::from_minor(95_000, Currency::XAF),
        )
        .with_brand("Xiaomi")
        .with_category(ProductCategory::Tablet)
        .with_stock(7),
    );

    let mut charger = Product::new(
        "usb-c-charger",
        "USB-C Fast Charger 33W",
        Price::from_minor(8_500, Currency::XAF),
    )
    .with_brand("Anker")
    .with_category(ProductCategory::Accessory);
    charger.condition = Condition::Excellent;
    catalog.add(charger);

    catalog
}
