use serde::Deserialize;
use std::{error::Error, fs, path::Path, path::PathBuf};

use crate::generator::{Carrier, Gender};
use crate::vcf::{BatchOptions, NamingMode, NumberFormat};

// --- Configuration Structs ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    pub mode: Option<String>,
    pub count: Option<usize>,
    pub gender: Option<String>,
    pub carrier: Option<String>,
    pub prefix: Option<String>,
    pub unique: Option<bool>,
    pub quiet: Option<bool>,
    pub preview_count: Option<usize>,
    pub file_count: Option<usize>,
    pub contacts_per_file: Option<usize>,
    pub output_dir: Option<String>,
    pub filename_prefix: Option<String>,
    pub naming_mode: Option<String>,
    pub start_number: Option<usize>,
    pub number_format: Option<String>,
    pub analytics: Option<RawAnalytics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnalytics {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub website_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Names,
    Phones,
    Vcf,
    Preview,
    Stats,
}

impl Mode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "names" => Some(Mode::Names),
            "phones" => Some(Mode::Phones),
            "vcf" => Some(Mode::Vcf),
            "preview" => Some(Mode::Preview),
            "stats" => Some(Mode::Stats),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub website_id: String,
}

#[derive(Debug, Clone)]
pub struct GenConfig {
    pub mode: Mode,
    pub count: usize,
    pub gender: Gender,
    pub carrier: Option<Carrier>,
    pub prefix: Option<String>,
    pub unique: bool,
    pub quiet: bool,
    pub preview_count: usize,
    pub batch: BatchOptions,
    pub analytics: AnalyticsConfig,
}

// --- Loading and validation ---

/// Loads and validates the TOML config. A missing file is not an error:
/// the tool then runs entirely on built-in defaults.
pub fn load_config(path: &str) -> Result<GenConfig, Box<dyn Error>> {
    let raw: RawConfig = if Path::new(path).exists() {
        toml::from_str(&fs::read_to_string(path)?)?
    } else {
        RawConfig::default()
    };
    validate(raw)
}

pub fn validate(raw: RawConfig) -> Result<GenConfig, Box<dyn Error>> {
    let mode = match raw.mode.as_deref() {
        Some(m) => Mode::parse(m).ok_or_else(|| format!("Config error: unknown mode '{}'", m))?,
        None => Mode::Names,
    };

    let gender = match raw.gender.as_deref() {
        Some(g) => {
            Gender::parse(g).ok_or_else(|| format!("Config error: unknown gender '{}'", g))?
        }
        None => Gender::All,
    };

    // "all" and absence both mean no carrier restriction
    let carrier = match raw.carrier.as_deref() {
        Some("all") | None => None,
        Some(c) => Some(
            Carrier::parse(c).ok_or_else(|| format!("Config error: unknown carrier '{}'", c))?,
        ),
    };

    let naming_mode = match raw.naming_mode.as_deref() {
        Some(m) => NamingMode::parse(m)
            .ok_or_else(|| format!("Config error: unknown naming_mode '{}'", m))?,
        None => NamingMode::Timestamp,
    };

    let number_format = match raw.number_format.as_deref() {
        Some(f) => NumberFormat::parse(f)
            .ok_or_else(|| format!("Config error: unknown number_format '{}'", f))?,
        None => NumberFormat::Padded3,
    };

    let contacts_per_file = raw.contacts_per_file.unwrap_or(100);
    if mode == Mode::Vcf && contacts_per_file < 1 {
        return Err("Config error: contacts_per_file must be at least 1".into());
    }

    let defaults = BatchOptions::default();
    let batch = BatchOptions {
        file_count: raw.file_count.unwrap_or(1),
        contacts_per_file,
        output_dir: raw.output_dir.map(PathBuf::from).unwrap_or(defaults.output_dir),
        filename_prefix: raw.filename_prefix.unwrap_or(defaults.filename_prefix),
        gender,
        carrier,
        unique_phones: raw.unique.unwrap_or(true),
        naming_mode,
        start_number: raw.start_number.unwrap_or(1),
        number_format,
    };

    let raw_analytics = raw.analytics.unwrap_or_default();
    let analytics = AnalyticsConfig {
        enabled: raw_analytics.enabled.unwrap_or(false),
        endpoint: raw_analytics
            .endpoint
            .unwrap_or_else(|| "https://umami.lvdpub.com/api/send".to_string()),
        website_id: raw_analytics.website_id.unwrap_or_default(),
    };

    Ok(GenConfig {
        mode,
        count: raw.count.unwrap_or(10),
        gender,
        carrier,
        prefix: raw.prefix,
        unique: raw.unique.unwrap_or(true),
        quiet: raw.quiet.unwrap_or(false),
        preview_count: raw.preview_count.unwrap_or(3),
        batch,
        analytics,
    })
}
