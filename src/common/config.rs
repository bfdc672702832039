/// Application configuration constants
pub struct AppConfig;

impl AppConfig {
    // Sysfs layout
    pub const DEFAULT_SYSFS_ROOT: &'static str = "/sys/fs/bcachefs";
    pub const DEVICE_DIR_PREFIX: &'static str = "dev-";

    // Per-device pseudo-files
    pub const DEFAULT_USAGE_FILE: &'static str = "usage";
    pub const DEFAULT_CAPACITY_FILE: &'static str = "capacity";
    pub const ALLOC_DEBUG_FILE: &'static str = "alloc_debug";
    pub const BUCKET_SIZE_FILE: &'static str = "bucket_size";
    pub const LABEL_FILE: &'static str = "label";
    pub const BLOCK_LINK: &'static str = "block";

    // bcachefs always reports sectors in 512 byte units, even on 4k devices
    pub const SECTOR_SHIFT: u32 = 9;

    // Network Configuration
    pub const DEFAULT_LISTEN_ADDR: &'static str = "[::1]:22903";
    pub const METRICS_PATH: &'static str = "/metrics";
    pub const PROMETHEUS_CONTENT_TYPE: &'static str = "text/plain; version=0.0.4";

    // Logging
    pub const DEFAULT_LOG_FILTER: &'static str = "bcachefs_exporter=info,tower_http=info";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listen_addr_parses() {
        let addr: std::net::SocketAddr = AppConfig::DEFAULT_LISTEN_ADDR.parse().unwrap();
        assert_eq!(addr.port(), 22903);
    }
}
