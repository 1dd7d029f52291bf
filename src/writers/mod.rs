pub mod geojson_writer;

pub use geojson_writer::{CollectionFileInfo, GeoJsonWriter};
