use std::net::SocketAddr;

use serde::Deserialize;
use fakesvc_core::error::{FakeSvcError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub simulation: SimulationSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            simulation: SimulationSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(FakeSvcError::Configuration(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.simulation.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            FakeSvcError::Configuration(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    /// Fixed RNG seed; OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Multiplier applied to every simulated delay. `0.0` disables sleeping.
    #[serde(default = "default_latency_scale")]
    pub latency_scale: f64,

    #[serde(default)]
    pub success: SuccessRates,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            seed: None,
            latency_scale: default_latency_scale(),
            success: SuccessRates::default(),
        }
    }
}

impl SimulationSection {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=10.0).contains(&self.latency_scale) {
            return Err(FakeSvcError::Configuration(
                "simulation.latency_scale must be between 0.0 and 10.0".into(),
            ));
        }
        self.success.validate()
    }
}

fn default_latency_scale() -> f64 {
    1.0
}

/// Success probability per simulated dependency.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuccessRates {
    #[serde(default = "default_email_validation")]
    pub email_validation: f64,
    #[serde(default = "default_payment_gateway")]
    pub payment_gateway: f64,
    #[serde(default = "default_pricing_service")]
    pub pricing_service: f64,
}

impl Default for SuccessRates {
    fn default() -> Self {
        Self {
            email_validation: default_email_validation(),
            payment_gateway: default_payment_gateway(),
            pricing_service: default_pricing_service(),
        }
    }
}

impl SuccessRates {
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("email_validation", self.email_validation),
            ("payment_gateway", self.payment_gateway),
            ("pricing_service", self.pricing_service),
        ];
        for (name, p) in rates {
            if !(0.0..=1.0).contains(&p) {
                return Err(FakeSvcError::Configuration(format!(
                    "simulation.success.{name} must be between 0.0 and 1.0"
                )));
            }
        }
        Ok(())
    }
}

fn default_email_validation() -> f64 {
    0.9
}
fn default_payment_gateway() -> f64 {
    0.85
}
fn default_pricing_service() -> f64 {
    0.9
}
