use std::env;

use log::*;
use osg_common::{Money, Secret};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use settlement_engine::fees::{
    FeeSchedule,
    DEFAULT_FLAT_DELIVERY_FEE,
    DEFAULT_FREE_SHIPPING_THRESHOLD,
    DEFAULT_PROCESSING_FEE_BPS,
    DEFAULT_SERVICE_FEE_BPS,
};

const DEFAULT_OSG_HOST: &str = "127.0.0.1";
const DEFAULT_OSG_PORT: u16 = 8360;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The payment gateway's shared secret, used to authenticate "payment completed" callbacks.
    pub gateway: GatewayConfig,
    /// The fee parameters applied to every vendor group at settlement.
    pub fees: FeeSchedule,
}

#[derive(Clone, Debug, Default)]
pub struct GatewayConfig {
    pub secret: Secret<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OSG_HOST.to_string(),
            port: DEFAULT_OSG_PORT,
            database_url: String::default(),
            gateway: GatewayConfig::default(),
            fees: FeeSchedule::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("OSG_HOST").ok().unwrap_or_else(|| DEFAULT_OSG_HOST.into());
        let port = env::var("OSG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for OSG_PORT. {e} Using the default, {DEFAULT_OSG_PORT}, instead."
                    );
                    DEFAULT_OSG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_OSG_PORT);
        let database_url = env::var("OSG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ OSG_DATABASE_URL is not set. Please set it to the URL for the settlement database.");
            String::default()
        });
        let gateway = GatewayConfig::from_env_or_default();
        let fees = fee_schedule_from_env();
        Self { host, port, database_url, gateway, fees }
    }
}

impl GatewayConfig {
    pub fn from_env_or_default() -> Self {
        let secret = match env::var("OSG_GATEWAY_SECRET") {
            Ok(s) if !s.trim().is_empty() => Secret::new(s),
            _ => {
                let random: String = thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect();
                error!(
                    "🪛️ OSG_GATEWAY_SECRET is not set. A random secret has been generated, which means NO gateway \
                     callback will verify until the real shared secret is configured."
                );
                Secret::new(random)
            },
        };
        Self { secret }
    }
}

fn fee_schedule_from_env() -> FeeSchedule {
    let free_shipping_threshold =
        money_from_env("OSG_FREE_SHIPPING_THRESHOLD", DEFAULT_FREE_SHIPPING_THRESHOLD);
    let flat_delivery_fee = money_from_env("OSG_DELIVERY_FEE", DEFAULT_FLAT_DELIVERY_FEE);
    let service_fee_bps = bps_from_env("OSG_SERVICE_FEE_BPS", DEFAULT_SERVICE_FEE_BPS);
    let processing_fee_bps = bps_from_env("OSG_PROCESSING_FEE_BPS", DEFAULT_PROCESSING_FEE_BPS);
    FeeSchedule { free_shipping_threshold, flat_delivery_fee, service_fee_bps, processing_fee_bps }
}

/// Reads a monetary amount, in minor units, from the environment.
fn money_from_env(var: &str, default: Money) -> Money {
    match env::var(var) {
        Ok(s) => s.parse::<i64>().map(Money::from_cents).unwrap_or_else(|e| {
            error!("🪛️ {var}={s} is not a valid amount in minor units. {e} Using the default, {default}.");
            default
        }),
        Err(_) => default,
    }
}

fn bps_from_env(var: &str, default: u32) -> u32 {
    match env::var(var) {
        Ok(s) => s.parse::<u32>().unwrap_or_else(|e| {
            error!("🪛️ {var}={s} is not a valid rate in basis points. {e} Using the default, {default}.");
            default
        }),
        Err(_) => default,
    }
}
