use crate::settings::Settings;
use anyhow::{Result, bail};
use std::net::{IpAddr, SocketAddr};

/// Validate the configuration values
pub fn validate_config(settings: &Settings) -> Result<()> {
    // Validate log level
    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&settings.log_level.to_lowercase().as_str()) {
        bail!(
            "Invalid log level '{}'. Valid options are: {:?}",
            settings.log_level,
            valid_log_levels
        );
    }

    // Validate server settings
    if !validate_socket_addr(&settings.server.listen_addr) {
        bail!("Invalid listen address: {}", settings.server.listen_addr);
    }

    if settings.server.max_body_bytes == 0 {
        bail!("Server max_body_bytes must be greater than 0");
    }

    // Validate stats settings
    if !settings.stats.default_threshold_ms.is_finite() {
        bail!(
            "Stats default_threshold_ms must be a finite number, got {}",
            settings.stats.default_threshold_ms
        );
    }

    if let Some(metrics) = &settings.metrics {
        if !validate_socket_addr(&metrics.addr) {
            bail!("Invalid SocketAddr: {}", metrics.addr)
        }

        if metrics.addr == settings.server.listen_addr {
            bail!(
                "Metrics address {} conflicts with the server listen address",
                metrics.addr
            );
        }
    }

    Ok(())
}

fn validate_socket_addr(addr: &SocketAddr) -> bool {
    match addr.ip() {
        IpAddr::V4(ipv4) => !ipv4.is_broadcast() && !ipv4.is_multicast(),
        IpAddr::V6(ipv6) => !ipv6.is_multicast(),
    }
}
