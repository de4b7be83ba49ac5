use crossbeam_channel::{bounded, Receiver};
use rand::rngs::{SmallRng, ThreadRng};
use rand::{Rng, SeedableRng};

use crate::logger::Logger;
use crate::vcf::{self, BatchOptions, BatchResult};

#[derive(Debug)]
pub enum WorkerEvent {
    /// Percentage after each written file, 0-100.
    Progress(u32),
    Finished(BatchResult),
}

/// Runs a batch on a blocking worker and streams progress plus the final
/// result over a channel. The generator itself cannot be cancelled; a
/// caller that drops the receiver simply abandons the run.
pub fn spawn_batch(options: BatchOptions, logger: Logger) -> Receiver<WorkerEvent> {
    let (tx, rx) = bounded(64);

    tokio::task::spawn_blocking(move || {
        let mut rng = SmallRng::seed_from_u64(ThreadRng::default().random());

        let progress_tx = tx.clone();
        let result = vcf::generate_vcf_files(&mut rng, &options, &logger, move |percent| {
            // A closed channel means the caller abandoned the run
            let _ = progress_tx.send(WorkerEvent::Progress(percent));
        });

        let _ = tx.send(WorkerEvent::Finished(result));
    });

    rx
}
