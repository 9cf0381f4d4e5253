use clap::{Parser, Subcommand};
use folio_gallery::config::{self, SiteConfig};
use folio_gallery::loader::ManifestLoader;
use folio_gallery::probe::{self, ImageProber};
use folio_gallery::{generate, output, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio-gallery")]
#[command(about = "Portfolio gallery builder: carousels and modal galleries from a media manifest")]
#[command(long_about = "\
Portfolio gallery builder: carousels and modal galleries from a media manifest

Each category is a folder of images and videos. The manifest lists them;
the built page shows one auto-advancing carousel per category and a modal
with the whole category.

Site structure:

  site/
  ├── config.toml                          # Categories, timing, colors (optional)
  ├── portfolio-manifest.json              # Written by `scan`, read by `build`
  └── Images&videos/
      ├── Embedded Software Development/
      │   ├── 010-STM32 Dehumidifiers.png  # Numbered files sort first
      │   ├── 010-STM32 Dehumidifiers.txt  # Caption sidecar
      │   └── demo.mp4
      └── PCB designing/
          └── Control board.png

Manifest loading tries each transport in order and falls back to a
compiled-in catalog when all of them fail.

Run 'folio-gallery gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site directory
    #[arg(long, default_value = ".", global = true)]
    site: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Manifest endpoint (path or http(s) URL), overriding config.toml
    #[arg(long, global = true)]
    manifest: Option<String>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan category folders and write the manifest
    Scan,
    /// Discover well-known media files without a manifest
    Probe,
    /// Load the manifest and report media that does not resolve
    Check,
    /// Build the gallery page into the output directory
    Build,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Scan => {
            let site_config = site_config(&cli)?;
            let report = scan::scan(&cli.site, &site_config)?;
            let manifest_path = local_manifest_path(&cli.site, &site_config)?;
            scan::write_manifest(&report.manifest, &manifest_path)?;
            output::print_scan_output(&report);
            println!("Wrote {}", manifest_path.display());
        }
        Command::Probe => {
            let site_config = site_config(&cli)?;
            let manifest = probe::discover(&ImageProber, &cli.site, &site_config);
            output::print_probe_output(&manifest);
        }
        Command::Check => {
            let site_config = site_config(&cli)?;
            let loader = loader_for(&cli.site, &site_config);
            let outcome = loader.load_logged();
            let unresolved = probe::unresolved(&cli.site, &outcome.manifest);
            output::print_check_output(&outcome, loader.endpoint(), &unresolved);
        }
        Command::Build => {
            let site_config = site_config(&cli)?;
            println!("==> Building {} → {}", cli.site.display(), cli.output.display());
            let loader = loader_for(&cli.site, &site_config);
            let summary = generate::generate(&cli.site, &cli.output, &site_config, loader)?;
            output::print_build_output(&summary);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `config.toml`, apply the `--manifest` override and size the pool.
fn site_config(cli: &Cli) -> Result<SiteConfig, config::ConfigError> {
    let mut site_config = config::load_config(&cli.site)?;
    if let Some(endpoint) = &cli.manifest {
        site_config.manifest.endpoint = endpoint.clone();
    }
    init_thread_pool(&site_config.processing);
    Ok(site_config)
}

/// `RUST_LOG` wins; otherwise warnings, or debug with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "folio_gallery=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn loader_for(site: &Path, config: &SiteConfig) -> ManifestLoader {
    ManifestLoader::for_endpoint(&config.manifest.endpoint, &config.manifest.cache_bust_param, site)
}

/// Where `scan` writes the manifest. Remote endpoints cannot be written to.
fn local_manifest_path(site: &Path, config: &SiteConfig) -> Result<PathBuf, String> {
    let endpoint = &config.manifest.endpoint;
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return Err(format!(
            "manifest endpoint {endpoint} is remote; pass --manifest <path> to scan into a file"
        ));
    }
    let path = endpoint.split(['?', '#']).next().unwrap_or(endpoint);
    Ok(site.join(path.trim_start_matches('/')))
}
