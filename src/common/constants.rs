/// Defaults shared by the CLI, the settings layer and the pipeline.

// Remote result source
pub const DEFAULT_BASE_URL: &str = "https://example.com/swimmeets";
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;
pub const DEFAULT_EXTENSION: &str = "xml";
pub const COMPILATION_FOLDER: &str = "compilation";
pub const ACCEPT_HEADER: &str = "application/xml, application/json, text/csv;q=0.9, */*;q=0.8";

// Output
pub const DEFAULT_DATA_DIR: &str = "_data";
pub const OUTPUT_EXTENSION: &str = "csv";
pub const SEASON_PLACEHOLDER: &str = "{season}";

// Environment variables
pub const ENV_BASE_URL: &str = "SWIMMEET_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "SWIMMEET_TIMEOUT_SECS";
pub const ENV_LOG_DIR: &str = "SWIMMEET_LOG_DIR";

// Process exit codes
pub const EXIT_OK: u8 = 0;
pub const EXIT_ITEM_FAILED: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
