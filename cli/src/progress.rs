use crate::ui;
use std::time::{Duration, Instant};

/// A simple progress tracker for CLI operations
pub struct ProgressTracker {
    operation_name: String,
    start_time: Instant,
    steps: Vec<String>,
    current_step: usize,
    verbose: bool,
}

impl ProgressTracker {
    /// Create a new progress tracker with the given operation name
    pub fn new(operation_name: &str) -> Self {
        ui::section_header(operation_name);
        Self {
            operation_name: operation_name.to_string(),
            start_time: Instant::now(),
            steps: Vec::new(),
            current_step: 0,
            verbose: false,
        }
    }

    /// Add steps to the tracker
    pub fn with_steps<S: Into<String>>(mut self, steps: impl IntoIterator<Item = S>) -> Self {
        self.steps = steps.into_iter().map(Into::into).collect();
        self
    }

    /// List the planned steps up front
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        if verbose {
            for (index, step) in self.steps.iter().enumerate() {
                ui::step_message(index + 1, step);
            }
        }
        self
    }

    /// Start the next step
    pub fn start_step(&self) -> &str {
        match self.steps.get(self.current_step) {
            Some(step) => {
                ui::status_message(step);
                step.as_str()
            }
            None => "",
        }
    }

    /// Complete the current step
    pub fn complete_step(&mut self) {
        if let Some(step) = self.steps.get(self.current_step) {
            ui::success_message(step);
            self.current_step += 1;
        }
    }

    /// Skip the current step
    pub fn skip_step(&mut self, reason: &str) {
        if let Some(step) = self.steps.get(self.current_step) {
            ui::warning_message(&format!("Skipped: {step} ({reason})"));
            self.current_step += 1;
        }
    }

    /// Complete the operation
    pub fn complete(&self) {
        let elapsed = self.start_time.elapsed();
        ui::success_message(&format!(
            "{} completed in {}",
            self.operation_name,
            Self::format_duration(elapsed)
        ));
    }

    /// Format a duration in a human-readable way
    fn format_duration(duration: Duration) -> String {
        let millis = duration.as_millis();
        let seconds = duration.as_secs();
        if seconds == 0 {
            format!("{millis} ms")
        } else if seconds < 60 {
            format!("{seconds} seconds")
        } else {
            format!(
                "{} minutes {seconds_remainder} seconds",
                seconds / 60,
                seconds_remainder = seconds % 60
            )
        }
    }
}
