use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use rand::RngCore;
use serde::Serialize;

use crate::generator::{name, phone, Carrier, Gender};
use crate::logger::Logger;

/// Filename strategy for a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingMode {
    /// One `YYYYMMDD_HHMMSS` stamp per batch plus a 3-digit running index.
    Timestamp,
    /// Sequential numbers starting at `start_number`.
    CustomNumber,
}

impl NamingMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "timestamp" => Some(NamingMode::Timestamp),
            "custom_number" => Some(NamingMode::CustomNumber),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// Zero-padded to 3 digits.
    Padded3,
    Plain,
}

impl NumberFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "padded" => Some(NumberFormat::Padded3),
            "plain" => Some(NumberFormat::Plain),
            _ => None,
        }
    }

    fn render(&self, number: usize) -> String {
        match self {
            NumberFormat::Padded3 => format!("{:03}", number),
            NumberFormat::Plain => number.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub file_count: usize,
    pub contacts_per_file: usize,
    pub output_dir: PathBuf,
    pub filename_prefix: String,
    pub gender: Gender,
    pub carrier: Option<Carrier>,
    pub unique_phones: bool,
    pub naming_mode: NamingMode,
    pub start_number: usize,
    pub number_format: NumberFormat,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            file_count: 1,
            contacts_per_file: 100,
            output_dir: PathBuf::from("vcf_output"),
            filename_prefix: "通讯录".to_string(),
            gender: Gender::All,
            carrier: None,
            unique_phones: true,
            naming_mode: NamingMode::Timestamp,
            start_number: 1,
            number_format: NumberFormat::Padded3,
        }
    }
}

/// Outcome record of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub success: bool,
    pub files_created: usize,
    pub files_failed: usize,
    pub created_files: Vec<PathBuf>,
    pub failed_files: Vec<PathBuf>,
    pub output_directory: PathBuf,
    pub total_contacts: usize,
    pub error: Option<String>,
}

impl BatchResult {
    fn dir_error(output_dir: &Path, message: String) -> Self {
        BatchResult {
            success: false,
            files_created: 0,
            files_failed: 0,
            created_files: Vec::new(),
            failed_files: Vec::new(),
            output_directory: output_dir.to_path_buf(),
            total_contacts: 0,
            error: Some(message),
        }
    }
}

/// Renders one contact as a vCard 3.0 block. Pure: identical inputs give
/// byte-identical output.
///
/// The `N:` field takes the first character as the family name, so the
/// compound surnames in the name table (司马, 欧阳, ...) come out split
/// after their first character.
pub fn create_contact_vcf_entry(name: &str, phone: &str) -> String {
    let formatted_phone = if phone.len() == 11 && phone.is_ascii() {
        format!("{} {} {}", &phone[..3], &phone[3..7], &phone[7..])
    } else {
        phone.to_string()
    };

    let mut chars = name.chars();
    let family: String = chars.next().into_iter().collect();
    let given: String = chars.collect();

    format!(
        "BEGIN:VCARD\nVERSION:3.0\nFN:{}\nN:{};{};;;\nTEL;CELL:{}\nTEL;CELL;TYPE=VOICE:{}\nEND:VCARD\n",
        name, family, given, phone, formatted_phone
    )
}

/// Draws `count` names and `count` phone numbers from independent random
/// streams and zips them positionally. When unique-phone generation
/// under-produces, the pairing truncates to the shorter list.
pub fn generate_contacts<T: RngCore>(
    rng: &mut T,
    count: usize,
    gender: Gender,
    carrier: Option<Carrier>,
    unique_phones: bool,
) -> Vec<(String, String)> {
    if count == 0 {
        return Vec::new();
    }

    let names = name::generate_names(rng, count, gender);
    let phones = phone::generate_phone_numbers(rng, count, None, carrier, unique_phones)
        .unwrap_or_default();

    names.into_iter().zip(phones).collect()
}

fn create_vcf_file(contacts: &[(String, String)], path: &Path) -> std::io::Result<()> {
    let mut content = String::new();
    for (name, phone) in contacts {
        content.push_str(&create_contact_vcf_entry(name, phone));
        content.push('\n');
    }
    fs::write(path, content)
}

/// Emits `file_count` VCF files into `output_dir`, reporting an integer
/// percentage after each file. Per-file write failures are recorded and
/// the batch continues; only a failed directory creation aborts up front.
pub fn generate_vcf_files<T: RngCore, F: FnMut(u32)>(
    rng: &mut T,
    options: &BatchOptions,
    logger: &Logger,
    mut progress: F,
) -> BatchResult {
    if let Err(e) = fs::create_dir_all(&options.output_dir) {
        return BatchResult::dir_error(
            &options.output_dir,
            format!("Failed to create output directory: {}", e),
        );
    }

    // One stamp for the whole batch, so every file of a run sorts together.
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

    let mut created_files = Vec::new();
    let mut failed_files = Vec::new();

    for i in 0..options.file_count {
        let contacts = generate_contacts(
            rng,
            options.contacts_per_file,
            options.gender,
            options.carrier,
            options.unique_phones,
        );

        let filename = match options.naming_mode {
            NamingMode::CustomNumber => {
                let number = options.start_number + i;
                format!(
                    "{}_{}.vcf",
                    options.filename_prefix,
                    options.number_format.render(number)
                )
            }
            NamingMode::Timestamp => {
                format!("{}_{}_{:03}.vcf", options.filename_prefix, timestamp, i + 1)
            }
        };
        let filepath = options.output_dir.join(filename);

        match create_vcf_file(&contacts, &filepath) {
            Ok(()) => created_files.push(filepath),
            Err(e) => {
                logger.warning(&format!(
                    "Failed to write VCF file {}: {}",
                    filepath.display(),
                    e
                ));
                failed_files.push(filepath);
            }
        }

        let percent = ((i + 1) as f64 / options.file_count as f64 * 100.0).round() as u32;
        progress(percent);
    }

    let files_created = created_files.len();
    let files_failed = failed_files.len();
    BatchResult {
        success: files_failed == 0,
        files_created,
        files_failed,
        // Counts contacts in successfully written files only.
        total_contacts: files_created * options.contacts_per_file,
        created_files,
        failed_files,
        output_directory: options.output_dir.clone(),
        error: None,
    }
}

/// Renders a few contacts as VCF text without touching the filesystem.
pub fn preview_vcf_content<T: RngCore>(
    rng: &mut T,
    count: usize,
    gender: Gender,
    carrier: Option<Carrier>,
) -> String {
    let contacts = generate_contacts(rng, count, gender, carrier, true);
    let mut preview = String::new();
    for (name, phone) in &contacts {
        preview.push_str(&create_contact_vcf_entry(name, phone));
        preview.push('\n');
    }
    preview
}

/// Rough size forecast for a batch, at ~150 bytes per contact.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationEstimate {
    pub file_count: usize,
    pub contacts_per_file: usize,
    pub total_contacts: usize,
    pub estimated_file_size: String,
    pub estimated_total_size: String,
}

pub fn generation_info(file_count: usize, contacts_per_file: usize) -> GenerationEstimate {
    const BYTES_PER_CONTACT: usize = 150;
    let size_per_file = contacts_per_file * BYTES_PER_CONTACT;
    let total_size = file_count * size_per_file;

    GenerationEstimate {
        file_count,
        contacts_per_file,
        total_contacts: file_count * contacts_per_file,
        estimated_file_size: format!("{:.1} KB", size_per_file as f64 / 1024.0),
        estimated_total_size: if total_size < 1024 * 1024 {
            format!("{:.1} KB", total_size as f64 / 1024.0)
        } else {
            format!("{:.1} MB", total_size as f64 / (1024.0 * 1024.0))
        },
    }
}
