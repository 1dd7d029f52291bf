use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{ProcessingError, Result};
use crate::models::MeasurementSeries;
use crate::readers::{MeasurementReader, SiteCatalogReader};
use crate::sources::{SiteDataStore, SiteIndex};
use crate::utils::filename::site_code_from_path;

/// Catalog and measurement snapshots loaded from local files.
#[derive(Debug)]
pub struct LoadedData {
    pub catalog: SiteIndex,
    pub store: SiteDataStore,
    /// Files that could not be read, with the reason
    pub skipped_files: Vec<(PathBuf, String)>,
}

pub struct ConcurrentReader {
    max_workers: usize,
}

impl ConcurrentReader {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    /// Read the site catalog and every per-site table concurrently
    pub async fn read_all(&self, sites_file: &Path, data_dir: &Path) -> Result<LoadedData> {
        let sites_file = sites_file.to_path_buf();
        let data_dir = data_dir.to_path_buf();
        let max_workers = self.max_workers;

        let catalog_handle =
            tokio::task::spawn_blocking(move || SiteCatalogReader::new().read_catalog(&sites_file));
        let store_handle =
            tokio::task::spawn_blocking(move || Self::read_data_dir_blocking(&data_dir, max_workers));

        let (catalog, store) = tokio::try_join!(catalog_handle, store_handle)?;
        let catalog = catalog?;
        let (store, skipped_files) = store?;

        info!(
            sites = catalog.len(),
            tables = store.len(),
            skipped = skipped_files.len(),
            "loaded site catalog and measurement tables"
        );

        Ok(LoadedData {
            catalog,
            store,
            skipped_files,
        })
    }

    /// Read every `<SITE>_data.csv` in a directory on a rayon pool.
    /// Unreadable files are skipped and reported rather than failing the load.
    pub fn read_data_dir_blocking(
        data_dir: &Path,
        max_workers: usize,
    ) -> Result<(SiteDataStore, Vec<(PathBuf, String)>)> {
        let files = Self::find_site_files(data_dir)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_workers.max(1))
            .build()
            .map_err(|e| ProcessingError::ThreadPool(e.to_string()))?;

        let results: Vec<(PathBuf, Result<MeasurementSeries>)> = pool.install(|| {
            files
                .par_iter()
                .map(|path| (path.clone(), MeasurementReader::new().read_series(path)))
                .collect()
        });

        let mut store = SiteDataStore::new();
        let mut skipped = Vec::new();
        for (path, result) in results {
            match result {
                Ok(series) => {
                    if let Some(previous) = store.insert(series) {
                        warn!(site = previous.site_code(), "duplicate table replaced");
                    }
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping unreadable table");
                    skipped.push((path, e.to_string()));
                }
            }
        }

        Ok((store, skipped))
    }

    /// Per-site measurement files in a directory, sorted by name
    pub fn find_site_files(data_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(data_dir)? {
            let path = entry?.path();
            if path.is_file() && site_code_from_path(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl Default for ConcurrentReader {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
