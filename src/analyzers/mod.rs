pub mod collection_analyzer;

pub use collection_analyzer::{CollectionAnalyzer, CollectionStatistics, GeographicBounds};
