pub mod concurrent_reader;
pub mod measurement_reader;
pub mod site_reader;

pub use concurrent_reader::{ConcurrentReader, LoadedData};
pub use measurement_reader::{normalize_column_name, MeasurementReader};
pub use site_reader::SiteCatalogReader;
