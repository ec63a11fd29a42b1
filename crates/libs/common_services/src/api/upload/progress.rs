//! Batch upload progress aggregation.
//!
//! Each file in a batch reports byte-level progress independently; the
//! aggregate is a single 0–100 percentage over the precomputed byte total of
//! the whole batch. A file's completion tops its counter up to its full size
//! so missed progress events can never leave the aggregate stuck below 100.

use std::sync::Mutex;

pub type ProgressCallback = Box<dyn Fn(u8) + Send + Sync>;

pub struct BatchProgress {
    state: Mutex<ProgressState>,
    callback: ProgressCallback,
}

struct ProgressState {
    totals: Vec<u64>,
    loaded: Vec<u64>,
    batch_total: u64,
    last_emitted: Option<u8>,
}

impl BatchProgress {
    #[must_use]
    pub fn new(file_sizes: &[u64], callback: ProgressCallback) -> Self {
        Self {
            state: Mutex::new(ProgressState {
                totals: file_sizes.to_vec(),
                loaded: vec![0; file_sizes.len()],
                batch_total: file_sizes.iter().sum(),
                last_emitted: None,
            }),
            callback,
        }
    }

    /// Record that `bytes_loaded` of file `index` have been transferred so
    /// far. Counts never run backwards and never exceed the file's size.
    pub fn on_progress(&self, index: usize, bytes_loaded: u64) {
        self.update(index, bytes_loaded);
    }

    /// Mark file `index` as fully transferred, correcting any shortfall left
    /// by missed progress events.
    pub fn on_complete(&self, index: usize) {
        let total = {
            let state = self.state.lock().expect("progress lock poisoned");
            match state.totals.get(index) {
                Some(total) => *total,
                None => return,
            }
        };
        self.update(index, total);
    }

    fn update(&self, index: usize, bytes_loaded: u64) {
        let emit = {
            let mut state = self.state.lock().expect("progress lock poisoned");
            let Some(&total) = state.totals.get(index) else {
                return;
            };
            let capped = bytes_loaded.min(total).max(state.loaded[index]);
            state.loaded[index] = capped;
            let percent = state.percent();
            if state.last_emitted == Some(percent) {
                None
            } else {
                state.last_emitted = Some(percent);
                Some(percent)
            }
        };
        if let Some(percent) = emit {
            (self.callback)(percent);
        }
    }
}

impl ProgressState {
    fn percent(&self) -> u8 {
        if self.batch_total == 0 {
            return 100;
        }
        let loaded: u64 = self.loaded.iter().sum();
        let percent = loaded * 100 / self.batch_total;
        percent.clamp(0, 100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU8, Ordering};

    fn collecting() -> (Arc<Mutex<Vec<u8>>>, ProgressCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback =
            Box::new(move |p| sink.lock().expect("sink").push(p));
        (seen, callback)
    }

    #[test]
    fn aggregates_across_files() {
        let (seen, callback) = collecting();
        let progress = BatchProgress::new(&[1000, 1000], callback);

        progress.on_progress(0, 500);
        progress.on_progress(1, 500);
        progress.on_progress(0, 1000);
        progress.on_progress(1, 1000);

        assert_eq!(*seen.lock().expect("seen"), vec![25, 50, 75, 100]);
    }

    #[test]
    fn completion_corrects_missed_events() {
        let (seen, callback) = collecting();
        let progress = BatchProgress::new(&[1000, 2000, 3000], callback);

        // File 1 never reports any byte-level progress, file 2 stalls at half.
        progress.on_progress(0, 1000);
        progress.on_progress(2, 1500);
        progress.on_complete(0);
        progress.on_complete(1);
        progress.on_complete(2);

        let reports = seen.lock().expect("seen").clone();
        assert_eq!(reports.last(), Some(&100));
    }

    #[test]
    fn percentages_never_decrease() {
        let last = Arc::new(AtomicU8::new(0));
        let observer = Arc::clone(&last);
        let callback: ProgressCallback = Box::new(move |p| {
            assert!(p >= observer.load(Ordering::SeqCst));
            observer.store(p, Ordering::SeqCst);
        });
        let progress = BatchProgress::new(&[100, 100, 100], callback);

        // Stale, duplicated, and overshooting reports all get absorbed.
        progress.on_progress(0, 60);
        progress.on_progress(0, 40);
        progress.on_progress(1, 250);
        progress.on_progress(2, 10);
        progress.on_complete(0);
        progress.on_complete(2);
        progress.on_complete(1);

        assert_eq!(last.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn empty_batch_reports_complete() {
        let (seen, callback) = collecting();
        let progress = BatchProgress::new(&[], callback);
        progress.on_progress(0, 10);
        // Out-of-range indexes are ignored entirely.
        assert!(seen.lock().expect("seen").is_empty());
    }

    #[test]
    fn overshoot_is_clamped_to_file_size() {
        let (seen, callback) = collecting();
        let progress = BatchProgress::new(&[100], callback);
        progress.on_progress(0, 1_000_000);
        assert_eq!(*seen.lock().expect("seen"), vec![100]);
    }
}
