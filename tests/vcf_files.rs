use std::fs;
use std::path::PathBuf;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use infogen::generator::Gender;
use infogen::logger::Logger;
use infogen::vcf::{self, BatchOptions, NamingMode, NumberFormat};

fn test_rng() -> SmallRng {
    SmallRng::seed_from_u64(42)
}

fn batch_options(output_dir: PathBuf) -> BatchOptions {
    BatchOptions {
        file_count: 3,
        contacts_per_file: 10,
        output_dir,
        filename_prefix: "contacts".to_string(),
        gender: Gender::All,
        carrier: None,
        unique_phones: true,
        naming_mode: NamingMode::CustomNumber,
        start_number: 5,
        number_format: NumberFormat::Padded3,
    }
}

#[test]
fn custom_number_batch_emits_sequentially_named_files() {
    let dir = tempfile::tempdir().unwrap();
    let options = batch_options(dir.path().join("out"));
    let logger = Logger::new(true);
    let mut rng = test_rng();

    let mut percents = Vec::new();
    let result = vcf::generate_vcf_files(&mut rng, &options, &logger, |p| percents.push(p));

    assert!(result.success);
    assert_eq!(result.files_created, 3);
    assert_eq!(result.files_failed, 0);
    assert_eq!(result.total_contacts, 30);
    assert!(result.error.is_none());
    assert_eq!(percents, vec![33, 67, 100]);

    for n in 5..=7 {
        let path = options.output_dir.join(format!("contacts_{:03}.vcf", n));
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("BEGIN:VCARD").count(), 10);
        assert_eq!(content.matches("END:VCARD").count(), 10);
        // one blank separator line after every entry
        assert_eq!(content.matches("END:VCARD\n\n").count(), 10);
    }
}

#[test]
fn timestamp_mode_shares_one_stamp_across_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = batch_options(dir.path().join("stamped"));
    options.naming_mode = NamingMode::Timestamp;
    options.file_count = 2;
    let logger = Logger::new(true);
    let mut rng = test_rng();

    let result = vcf::generate_vcf_files(&mut rng, &options, &logger, |_| {});
    assert!(result.success);
    assert_eq!(result.files_created, 2);

    let mut stamps = Vec::new();
    for (i, path) in result.created_files.iter().enumerate() {
        let filename = path.file_name().unwrap().to_str().unwrap();
        // contacts_YYYYMMDD_HHMMSS_00i.vcf
        let stamp = filename
            .strip_prefix("contacts_")
            .unwrap()
            .strip_suffix(&format!("_{:03}.vcf", i + 1))
            .unwrap();
        assert_eq!(stamp.len(), 15);
        assert!(stamp[..8].bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(&stamp[8..9], "_");
        assert!(stamp[9..].bytes().all(|b| b.is_ascii_digit()));
        stamps.push(stamp.to_string());
    }
    assert_eq!(stamps[0], stamps[1]);
}

#[test]
fn zero_file_count_succeeds_without_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = batch_options(dir.path().join("empty"));
    options.file_count = 0;
    let logger = Logger::new(true);
    let mut rng = test_rng();

    let mut percents = Vec::new();
    let result = vcf::generate_vcf_files(&mut rng, &options, &logger, |p| percents.push(p));

    assert!(result.success);
    assert_eq!(result.files_created, 0);
    assert_eq!(result.total_contacts, 0);
    assert!(result.error.is_none());
    assert!(percents.is_empty());
}

#[test]
fn unwritable_output_dir_reports_failure_without_files() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "x").unwrap();

    // a regular file where the output directory should go
    let options = batch_options(blocker);
    let logger = Logger::new(true);
    let mut rng = test_rng();

    let result = vcf::generate_vcf_files(&mut rng, &options, &logger, |_| {});

    assert!(!result.success);
    assert_eq!(result.files_created, 0);
    assert_eq!(result.files_failed, 0);
    assert!(result.error.is_some());
}

#[test]
fn per_file_write_failures_are_recorded_and_do_not_abort() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = batch_options(dir.path().join("partial"));
    // prefix routes filenames into a subdirectory that is never created
    options.filename_prefix = "missing/contacts".to_string();
    options.file_count = 2;
    let logger = Logger::new(true);
    let mut rng = test_rng();

    let mut percents = Vec::new();
    let result = vcf::generate_vcf_files(&mut rng, &options, &logger, |p| percents.push(p));

    assert!(!result.success);
    assert_eq!(result.files_created, 0);
    assert_eq!(result.files_failed, 2);
    assert_eq!(result.failed_files.len(), 2);
    assert_eq!(result.total_contacts, 0);
    // the batch still ran to completion
    assert_eq!(percents, vec![50, 100]);
}
