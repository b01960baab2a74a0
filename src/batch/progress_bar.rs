//! Per-file progress reporting for the batch runner (`progress` feature).
//!
//! * [`FileTimer`] – wall-clock time of the last file plus an exponential moving average
//!   (`ema ← α·dt + (1–α)·ema`, the first sample seeds the average).
//! * [`fmt_dur`] – compact rendering: `"253µs"`, `"42ms"`, `"3.14s"`.
//! * [`BatchProgress`] – `indicatif` bar over the matched input files.
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | ETA {eta_precise} | {msg}";

pub(crate) struct FileTimer {
    last: Instant,
    ema_ns: f64,
    alpha: f64,
    files: u64,
}

impl FileTimer {
    pub(crate) fn new(alpha: f64) -> Self {
        FileTimer {
            last: Instant::now(),
            ema_ns: 0.0,
            alpha,
            files: 0,
        }
    }

    /// Close the current file and return its duration.
    pub(crate) fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        self.files += 1;

        let dt_ns = dt.as_nanos() as f64;
        self.ema_ns = if self.files == 1 {
            dt_ns
        } else {
            self.alpha * dt_ns + (1.0 - self.alpha) * self.ema_ns
        };
        dt
    }

    pub(crate) fn avg(&self) -> Duration {
        if self.files == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.ema_ns as u64)
        }
    }
}

pub(crate) fn fmt_dur(d: Duration) -> String {
    let us = d.as_micros();
    if us < 1_000 {
        format!("{us}µs")
    } else if d.as_millis() < 1_000 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.2}s", d.as_secs_f32())
    }
}

pub(crate) struct BatchProgress {
    bar: ProgressBar,
    timer: FileTimer,
}

impl BatchProgress {
    pub(crate) fn new(files: usize) -> Self {
        let bar = ProgressBar::new(files.max(1) as u64);
        bar.set_style(
            ProgressStyle::with_template(TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.enable_steady_tick(Duration::from_millis(200));
        BatchProgress {
            bar,
            timer: FileTimer::new(0.2),
        }
    }

    /// Record one finished file named `name`.
    pub(crate) fn file_done(&mut self, name: &str) {
        let last = self.timer.tick();
        self.bar.set_message(format!(
            "{name} in {}, avg: {}",
            fmt_dur(last),
            fmt_dur(self.timer.avg())
        ));
        self.bar.inc(1);
    }

    pub(crate) fn finish(self) {
        self.bar.finish_and_clear();
    }
}
