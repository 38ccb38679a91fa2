use chrono::Duration as ChronoDuration;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

use crate::services::{
    pricing_service::PricingPolicy, simulated_task::SimulatedTask,
    two_factor_service::TwoFactorSettings,
};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const SESSION_TTL_SECS: i64 = 60 * 60;

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

fn millis(key: &str, default: u64) -> Duration {
    Duration::from_millis(env_or(key, default))
}

/// Delays of the simulated remote calls.
#[derive(Debug, Clone)]
pub struct Delays {
    pub send_code: Duration,
    pub verify_code: Duration,
    pub complete_booking: Duration,
    pub submit_review: Duration,
    pub timeout: Duration,
}

impl Delays {
    pub fn none() -> Self {
        Self {
            send_code: Duration::ZERO,
            verify_code: Duration::ZERO,
            complete_booking: Duration::ZERO,
            submit_review: Duration::ZERO,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn send_code_task(&self) -> SimulatedTask {
        SimulatedTask::new(self.send_code, self.timeout)
    }

    pub fn verify_code_task(&self) -> SimulatedTask {
        SimulatedTask::new(self.verify_code, self.timeout)
    }

    pub fn complete_booking_task(&self) -> SimulatedTask {
        SimulatedTask::new(self.complete_booking, self.timeout)
    }

    pub fn submit_review_task(&self) -> SimulatedTask {
        SimulatedTask::new(self.submit_review, self.timeout)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub two_factor: TwoFactorSettings,
    pub delays: Delays,
    pub pricing: PricingPolicy,
    /// Booking and review sessions older than this are discarded.
    pub session_ttl: ChronoDuration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            two_factor: TwoFactorSettings::default(),
            delays: Delays {
                send_code: Duration::from_millis(2000),
                verify_code: Duration::from_millis(1500),
                complete_booking: Duration::from_millis(3000),
                submit_review: Duration::from_millis(3000),
                timeout: Duration::from_secs(30),
            },
            pricing: PricingPolicy::default(),
            session_ttl: ChronoDuration::seconds(SESSION_TTL_SECS),
        }
    }
}

impl AppConfig {
    /// Reads the environment. Unset or unparsable values keep their default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let code = std::env::var("TWO_FA_CODE")
            .ok()
            .filter(|code| code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(defaults.two_factor.code);

        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            two_factor: TwoFactorSettings {
                code,
                ttl: ChronoDuration::seconds(env_or("TWO_FA_TTL_SECS", 300)),
                max_attempts: env_or("TWO_FA_MAX_ATTEMPTS", defaults.two_factor.max_attempts)
                    .max(1),
            },
            delays: Delays {
                send_code: millis("SEND_CODE_DELAY_MS", 2000),
                verify_code: millis("VERIFY_CODE_DELAY_MS", 1500),
                complete_booking: millis("COMPLETE_BOOKING_DELAY_MS", 3000),
                submit_review: millis("SUBMIT_REVIEW_DELAY_MS", 3000),
                timeout: millis("TASK_TIMEOUT_MS", 30_000),
            },
            session_ttl: ChronoDuration::seconds(
                env_or("SESSION_TTL_SECS", SESSION_TTL_SECS).max(1),
            ),
            pricing: PricingPolicy {
                tax_rate: env_or::<Decimal>("TAX_RATE", defaults.pricing.tax_rate),
                service_fee_rate: env_or::<Decimal>(
                    "SERVICE_FEE_RATE",
                    defaults.pricing.service_fee_rate,
                ),
            },
        }
    }

    /// Defaults with every simulated delay set to zero.
    pub fn without_delays() -> Self {
        Self {
            delays: Delays::none(),
            ..Self::default()
        }
    }
}
