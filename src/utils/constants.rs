/// File names
pub const DEFAULT_SITES_FILE: &str = "helper_files/monitoring.json";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_CONFIG_FILE: &str = "timemap.toml";
pub const SITE_DATA_SUFFIX: &str = "_data.csv";

/// Measurement table layout
pub const TIMESTAMP_COLUMN: &str = "MeasurementDateGMT";
pub const MISSING_VALUE_MARKERS: [&str; 5] = ["", "NaN", "nan", "NA", "N/A"];

/// Outlier fences: quartile -/+ multiplier * IQR
pub const LOWER_QUARTILE: f64 = 0.25;
pub const UPPER_QUARTILE: f64 = 0.75;
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Normalized value used for every point when the pooled range collapses
pub const DEGENERATE_MIDPOINT: f64 = 0.5;

/// Popup text
pub const POPUP_LINE_BREAK: &str = "<br />";
pub const VALUE_DECIMALS: usize = 2;

/// Feature styling
pub const FEATURE_ICON: &str = "circle";
pub const FEATURE_FILL_OPACITY: f64 = 0.8;
pub const FEATURE_WEIGHT: u32 = 1;
pub const FEATURE_RADIUS: u32 = 10;
pub const SITE_MARKER_COLOR: &str = "#9c9a95";
pub const SITE_MARKER_FILL_OPACITY: f64 = 0.4;

/// Playback defaults
pub const PLAYBACK_PERIOD: &str = "P1W";
pub const MIN_PLAYBACK_SPEED: u32 = 5;
pub const MAX_PLAYBACK_SPEED: u32 = 50;
pub const PLAYBACK_SPEED_STEP: u32 = 1;
pub const DATE_DISPLAY_FORMAT: &str = "YYYY-MM-DD";
pub const LAYER_NAME_PREFIX: &str = "Time Map for";

/// Geographic bounds
pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;
