use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::analyzers::CollectionAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::{ProcessingError, Result};
use crate::models::Pollutant;
use crate::processors::{DegenerateRangePolicy, PollutantResolver, TimeMapPipeline};
use crate::readers::{ConcurrentReader, SiteCatalogReader};
use crate::sources::{SiteCatalog, SiteDataStore, SiteIndex};
use crate::utils::filename::{collection_path, heatmap_path, site_layer_path};
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::GeoJsonWriter;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            data_dir,
            sites_file,
            output_dir,
            pollutants,
            with_sites,
            heatmap,
            iqr_multiplier,
            degenerate_policy,
            pretty,
            max_workers,
        } => {
            let settings = GenerateSettings {
                data_dir: data_dir.unwrap_or_else(|| config.data_dir.clone()),
                sites_file: sites_file.unwrap_or_else(|| config.sites_file.clone()),
                output_dir: output_dir.unwrap_or_else(|| config.output_dir.clone()),
                codes: if pollutants.is_empty() {
                    Pollutant::ALL.iter().map(|p| p.code().to_string()).collect()
                } else {
                    pollutants
                },
                with_sites,
                heatmap,
                iqr_multiplier: iqr_multiplier.unwrap_or(config.pipeline.iqr_multiplier),
                degenerate_policy: degenerate_policy.unwrap_or(config.pipeline.degenerate_policy),
                pretty: pretty || config.pretty,
                max_workers: max_workers.unwrap_or(config.max_workers),
            };
            generate(&config, settings).await?;
        }

        Commands::Sites {
            sites_file,
            pollutant,
        } => {
            let sites_file = sites_file.unwrap_or_else(|| config.sites_file.clone());
            list_sites(&sites_file, &pollutant)?;
        }

        Commands::Info { file, sample } => {
            show_info(&file, sample)?;
        }
    }

    Ok(())
}

struct GenerateSettings {
    data_dir: PathBuf,
    sites_file: PathBuf,
    output_dir: PathBuf,
    codes: Vec<String>,
    with_sites: bool,
    heatmap: bool,
    iqr_multiplier: f64,
    degenerate_policy: DegenerateRangePolicy,
    pretty: bool,
    max_workers: usize,
}

async fn generate(config: &AppConfig, settings: GenerateSettings) -> Result<()> {
    println!("Generating air-quality time maps...");
    println!("Site catalog: {}", settings.sites_file.display());
    println!("Data directory: {}", settings.data_dir.display());
    println!("Output directory: {}", settings.output_dir.display());

    let progress = ProgressReporter::new_spinner("Loading sites and measurements...", false);
    let loaded = ConcurrentReader::new(settings.max_workers)
        .read_all(&settings.sites_file, &settings.data_dir)
        .await?;
    progress.finish_with_message(&format!(
        "Loaded {} sites, {} measurement tables",
        loaded.catalog.len(),
        loaded.store.len()
    ));

    for (path, reason) in &loaded.skipped_files {
        println!("Skipped {}: {}", path.display(), reason);
    }

    let mut options = config.pipeline_options();
    options.iqr_multiplier = settings.iqr_multiplier;
    options.degenerate_policy = settings.degenerate_policy;

    let pipeline = TimeMapPipeline::with_options(&loaded.catalog, &loaded.store, options);
    let writer = GeoJsonWriter::new().with_pretty(settings.pretty);

    let mut pollutants = Vec::new();
    let mut failures: Vec<(String, ProcessingError)> = Vec::new();
    for code in &settings.codes {
        match Pollutant::from_code(code) {
            Ok(pollutant) if !pollutants.contains(&pollutant) => pollutants.push(pollutant),
            Ok(_) => {}
            Err(e) => failures.push((code.clone(), e)),
        }
    }

    let results = pipeline.run_many(&pollutants);
    let layers = ProgressReporter::new(results.len() as u64, "Writing layers...", false);

    let mut written = 0usize;
    for (pollutant, result) in results {
        layers.set_message(&format!("Writing {} layers...", pollutant));
        layers.increment(1);
        let (collection, report) = match result {
            Ok(output) => output,
            Err(e) if !e.is_query_failure() => return Err(e),
            Err(e) => {
                failures.push((pollutant.code().to_string(), e));
                continue;
            }
        };

        let path = collection_path(&settings.output_dir, pollutant);
        writer.write_collection(&collection, &path)?;
        written += 1;
        layers.println(&format!(
            "{}: {} features from {} sites -> {}",
            pollutant,
            collection.len(),
            report.contributing_sites(),
            path.display()
        ));
        info!(pollutant = %pollutant, "\n{}", report.generate_summary());

        if settings.with_sites {
            write_site_layer(&pipeline, &writer, &settings.output_dir, pollutant)?;
        }
        if settings.heatmap {
            let frames = pipeline.heatmap(pollutant.code())?;
            writer.write_heatmap(&frames, &heatmap_path(&settings.output_dir, pollutant))?;
        }
    }

    layers.finish_with_message(&format!("{} layers written", written));

    for (code, error) in &failures {
        warn!(pollutant = %code, error = %error, "query failed");
        println!("{}: not generated ({})", code, error);
    }

    if written == 0 {
        if let Some((_, error)) = failures.into_iter().next() {
            return Err(error);
        }
    }

    println!("Generation complete: {} of {} layers written", written, settings.codes.len());
    Ok(())
}

fn write_site_layer(
    pipeline: &TimeMapPipeline<'_, SiteIndex, SiteDataStore>,
    writer: &GeoJsonWriter,
    output_dir: &Path,
    pollutant: Pollutant,
) -> Result<()> {
    let layer = pipeline.site_layer(pollutant.code())?;
    writer.write_site_layer(&layer, &site_layer_path(output_dir, pollutant))
}

fn list_sites(sites_file: &Path, code: &str) -> Result<()> {
    let catalog = SiteCatalogReader::new().read_catalog(sites_file)?;
    let resolved = PollutantResolver::new().resolve(code, &catalog)?;

    println!(
        "{} ({}): {} sites",
        resolved.pollutant,
        resolved.column,
        resolved.site_codes.len()
    );
    for code in &resolved.site_codes {
        let Some(site) = catalog.site(code) else {
            continue;
        };
        let location = match site.coordinates() {
            Some((lat, lon)) => format!("{:.5}, {:.5}", lat, lon),
            None => "no coordinates".to_string(),
        };
        println!("  {:<6} {:<45} {}", site.code, site.name, location);
    }

    Ok(())
}

fn show_info(file: &Path, sample: usize) -> Result<()> {
    println!("Analyzing time-map file: {}", file.display());

    let writer = GeoJsonWriter::new();
    let file_info = writer.get_file_info(file)?;

    match CollectionAnalyzer::new().analyze_file(file) {
        Ok(stats) => println!("\n{}", stats.detailed_summary()),
        Err(e) => println!("\nNo statistics: {}", e),
    }

    println!("\nFile Details:");
    println!("{}", file_info.summary());

    if sample > 0 {
        let features = writer.read_sample_features(file, sample)?;
        println!("\nSample Features (showing {}):", features.len());
        for (i, feature) in features.iter().enumerate() {
            println!(
                "  {}. {} [{:.5}, {:.5}] {} {}",
                i + 1,
                feature.date(),
                feature.geometry.latitude(),
                feature.geometry.longitude(),
                feature.color(),
                feature.popup().replace("<br />", " | ")
            );
        }
    }

    Ok(())
}
