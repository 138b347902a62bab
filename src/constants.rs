//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default base URL of the product REST API
pub const DEFAULT_API_BASE: &str = "https://api.escuelajs.co/api/v1";

/// Rows per page on startup
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the page-size selector
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];

/// Default HTTP request timeout in seconds (0 disables it)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Directory (under the home directory) holding config and logs
pub const CONFIG_DIR_NAME: &str = ".catalog-tui";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Log file name
pub const LOG_FILE_NAME: &str = "catalog-tui.log";

/// Environment variable overriding the API base URL
pub const API_BASE_ENV: &str = "CATALOG_API_BASE";

/// Application name
pub const APP_NAME: &str = "Catalog TUI";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
