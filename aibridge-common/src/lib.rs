//! aibridge-common
//!
//! Shared building blocks for the NEAR AI bridge agent: the error taxonomy
//! every service reports through, environment driven configuration, and the
//! status snapshot published by the chain executors.

use chrono::{SecondsFormat, Utc};

pub mod config;
pub mod error;
pub mod keys;
pub mod status;
pub mod units;

pub use config::{
    BridgeConfig, IntentsConfig, NearAiConfig, NearConfig, NearNetwork, SecretConfig,
    ZcashConfig,
};
pub use error::BridgeError;
pub use status::{BridgeHealth, ServiceStatus};
pub use units::{format_near_amount, parse_near_amount, ONE_NEAR, TGAS};

/// Version string reported by the status and capability endpoints.
pub const BRIDGE_VERSION: &str = "alpha-0.1.0";

/// Milliseconds since the Unix epoch.
pub fn current_timestamp_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Current time as an RFC 3339 string with millisecond precision.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// RFC 3339 timestamp `millis_ago` milliseconds in the past.
pub fn iso_timestamp_ago(millis_ago: i64) -> String {
    (Utc::now() - chrono::Duration::milliseconds(millis_ago))
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a number in base 36 using lowercase digits.
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn test_iso_timestamp_ordering() {
        let earlier = iso_timestamp_ago(3_600_000);
        let now = iso_timestamp();
        assert!(earlier < now);
        assert!(now.ends_with('Z'));
    }
}
