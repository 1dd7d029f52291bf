pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod logging;
pub mod progress;

pub use constants::*;
pub use coordinates::{parse_optional_coordinate, validate_coordinates};
pub use filename::{collection_path, generate_default_output_dir, heatmap_path, site_layer_path};
pub use logging::init_logging;
pub use progress::ProgressReporter;
