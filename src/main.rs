mod app;
mod ledger;
mod util;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::{LedgerApp, ViewSettings};
use crate::ledger::{DataSource, LoadRequest, Lens};

const DATA_DIR: &str = "data/processed";
const ENTITIES_FILE: &str = "vendors_master.json";
const TOTALS_FILE: &str = "system_composition.json";

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Entity records: an http(s) URL or a local file.
    #[arg(long)]
    entities: Option<String>,

    /// Per-year composition totals: an http(s) URL or a local file.
    #[arg(long)]
    totals: Option<String>,

    /// Deployment prefix used to build the default data locations.
    #[arg(long)]
    base: Option<String>,

    #[arg(long, default_value_t = 2018)]
    year: i32,

    #[arg(long, value_parser = parse_lens)]
    lens: Option<Lens>,

    /// Start in receipts mode (labels and click-to-inspect).
    #[arg(long)]
    receipts: bool,

    #[arg(long, default_value_t = 500)]
    max_entities: usize,

    #[arg(long, default_value_t = 10)]
    fetch_timeout_secs: u64,
}

fn parse_lens(value: &str) -> Result<Lens, String> {
    Lens::parse(value)
        .ok_or_else(|| format!("unknown lens `{value}` (expected staffing, consulting or healthcare)"))
}

/// `<base>/data/processed/<file>`, with the base's trailing slashes and the
/// path's leading slash folded into one separator.
fn data_path(base: Option<&str>, file: &str) -> String {
    let path = format!("{DATA_DIR}/{}", file.trim_start_matches('/'));
    match base.map(|base| base.trim_end_matches('/')) {
        Some(base) if !base.is_empty() => format!("{base}/{path}"),
        _ => path,
    }
}

impl Args {
    fn view_settings(&self) -> ViewSettings {
        let base = self.base.as_deref();
        let source = |explicit: &Option<String>, file: &str| {
            DataSource::parse(
                &explicit
                    .clone()
                    .unwrap_or_else(|| data_path(base, file)),
            )
        };

        ViewSettings {
            load: LoadRequest {
                entities: source(&self.entities, ENTITIES_FILE),
                totals: source(&self.totals, TOTALS_FILE),
                timeout: Duration::from_secs(self.fetch_timeout_secs.max(1)),
            },
            year: self.year,
            lens: self.lens,
            receipts: self.receipts,
            max_entities: self.max_entities,
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = args.view_settings();
    tracing::info!(
        entities = %settings.load.entities,
        totals = %settings.load.totals,
        year = settings.year,
        "starting ledger view"
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Ledger",
        options,
        Box::new(move |cc| Ok(Box::new(LedgerApp::new(cc, settings)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_data_paths_are_relative() {
        assert_eq!(data_path(None, ENTITIES_FILE), "data/processed/vendors_master.json");
        assert_eq!(data_path(Some(""), TOTALS_FILE), "data/processed/system_composition.json");
    }

    #[test]
    fn base_prefix_is_joined_with_one_slash() {
        assert_eq!(
            data_path(Some("https://example.org/ledger/"), "/vendors_master.json"),
            "https://example.org/ledger/data/processed/vendors_master.json"
        );
        assert_eq!(
            data_path(Some("/srv/site"), TOTALS_FILE),
            "/srv/site/data/processed/system_composition.json"
        );
    }

    #[test]
    fn arguments_build_sources_and_settings() {
        let args = Args::parse_from([
            "ledger-bubbles",
            "--base",
            "https://example.org",
            "--totals",
            "./totals.json",
            "--year",
            "2021",
            "--lens",
            "consulting",
            "--receipts",
        ]);
        let settings = args.view_settings();

        assert_eq!(
            settings.load.entities,
            DataSource::Http("https://example.org/data/processed/vendors_master.json".to_string())
        );
        assert_eq!(settings.load.totals, DataSource::File("./totals.json".into()));
        assert_eq!(settings.year, 2021);
        assert_eq!(settings.lens, Some(Lens::Consulting));
        assert!(settings.receipts);
        assert_eq!(settings.max_entities, 500);
        assert_eq!(settings.load.timeout, Duration::from_secs(10));
    }

    #[test]
    fn unknown_lens_is_rejected() {
        assert!(Args::try_parse_from(["ledger-bubbles", "--lens", "catering"]).is_err());
    }
}
