use std::error::Error;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use rand::rngs::{SmallRng, ThreadRng};
use rand::{Rng, SeedableRng};

use crate::analytics::Analytics;
use crate::config::{self, GenConfig, Mode};
use crate::generator::{name, phone};
use crate::logger::Logger;
use crate::vcf;
use crate::worker::{self, WorkerEvent};
use crate::{log_info, log_warning};

pub struct App {
    pub config: GenConfig,
    pub logger: Logger,
    analytics: Analytics,
    rng: SmallRng,
}

impl App {
    pub fn new(config_path: &str, mode_override: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let mut config = config::load_config(config_path)?;
        if let Some(m) = mode_override {
            config.mode =
                Mode::parse(m).ok_or_else(|| format!("Unknown mode '{}' on command line", m))?;
        }

        let logger = Logger::new(config.quiet);
        let analytics = Analytics::new(&config.analytics);
        let rng = SmallRng::seed_from_u64(ThreadRng::default().random());

        Ok(App {
            config,
            logger,
            analytics,
            rng,
        })
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn Error>> {
        match self.config.mode {
            Mode::Names => {
                self.run_names();
                self.analytics.track("names_generated").await;
            }
            Mode::Phones => {
                self.run_phones()?;
                self.analytics.track("phones_generated").await;
            }
            Mode::Preview => {
                self.run_preview();
                self.analytics.track("vcf_preview").await;
            }
            Mode::Stats => {
                self.run_stats()?;
            }
            Mode::Vcf => {
                self.run_vcf().await?;
                self.analytics.track("vcf_batch").await;
            }
        }
        Ok(())
    }

    fn run_names(&mut self) {
        let names = name::generate_names(&mut self.rng, self.config.count, self.config.gender);
        self.logger.info(&format!(
            "Generated {} names (gender: {})",
            names.len(),
            self.config.gender.as_str()
        ));
        for name in names {
            println!("{}", name);
        }
    }

    fn run_phones(&mut self) -> Result<(), Box<dyn Error>> {
        let phones = phone::generate_phone_numbers(
            &mut self.rng,
            self.config.count,
            self.config.prefix.as_deref(),
            self.config.carrier,
            self.config.unique,
        )?;
        if phones.len() < self.config.count {
            log_warning!(
                self.logger,
                "Uniqueness retry budget exhausted: {} of {} numbers generated",
                phones.len(),
                self.config.count
            );
        }
        for phone_number in phones {
            println!("{} -> {}", phone_number, phone::get_carrier_name(&phone_number));
        }
        Ok(())
    }

    fn run_preview(&mut self) {
        let preview = vcf::preview_vcf_content(
            &mut self.rng,
            self.config.preview_count,
            self.config.gender,
            self.config.carrier,
        );
        println!("{}", preview);
    }

    fn run_stats(&self) -> Result<(), Box<dyn Error>> {
        let stats = serde_json::json!({
            "names": name::statistics(),
            "phones": phone::statistics(),
        });
        println!("{}", serde_json::to_string_pretty(&stats)?);
        Ok(())
    }

    async fn run_vcf(&mut self) -> Result<(), Box<dyn Error>> {
        let running = Arc::new(AtomicBool::new(true));
        let r = running.clone();
        ctrlc::set_handler(move || {
            r.store(false, Ordering::SeqCst);
            println!("\nCtrl-C received, abandoning batch...");
        })?;

        let batch = &self.config.batch;
        let estimate = vcf::generation_info(batch.file_count, batch.contacts_per_file);
        self.logger.info(&format!(
            "Generating {} files x {} contacts into {} (about {})",
            batch.file_count,
            batch.contacts_per_file,
            batch.output_dir.display(),
            estimate.estimated_total_size
        ));

        let rx = worker::spawn_batch(batch.clone(), self.logger.clone());

        loop {
            if !running.load(Ordering::SeqCst) {
                self.logger.warning("Batch abandoned before completion.");
                return Ok(());
            }

            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(WorkerEvent::Progress(percent)) => {
                    log_info!(self.logger, "Progress: {}%", percent);
                }
                Ok(WorkerEvent::Finished(result)) => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                    if result.success {
                        self.logger.info(&format!(
                            "Batch complete: {} files, {} contacts",
                            result.files_created, result.total_contacts
                        ));
                    } else {
                        self.logger.error(&format!(
                            "Batch finished with failures: {} created, {} failed{}",
                            result.files_created,
                            result.files_failed,
                            result
                                .error
                                .as_deref()
                                .map(|e| format!(" ({})", e))
                                .unwrap_or_default()
                        ));
                    }
                    return Ok(());
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.logger.error("Batch worker exited without a result.");
                    return Ok(());
                }
            }
        }
    }
}
