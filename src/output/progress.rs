use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar for the log download phase.
pub struct DownloadProgress {
    pb: ProgressBar,
}

impl DownloadProgress {
    pub fn start(total: usize) -> Self {
        let pb = ProgressBar::new(total as u64);
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        pb.set_message("Downloading logs...");

        Self { pb }
    }

    pub fn tick(&self, step_name: &str) {
        self.pb.inc(1);
        self.pb.set_message(step_name.to_string());
    }

    pub fn finish(self, written: usize) {
        self.pb
            .finish_with_message(format!("✓ Downloaded {written} logs"));
    }
}
