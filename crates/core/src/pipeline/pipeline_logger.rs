use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for capture-loop events.
///
/// Called from the capture thread, so implementations must be cheap: record
/// and return, never block on I/O beyond the `log` facade.
pub trait PipelineLogger: Send {
    /// Report that a frame arrived and whether it was sampled.
    fn frame(&mut self, sampled: bool);

    /// Record how long a named stage took for one sampled frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. face count, detector failure).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn frame(&mut self, _sampled: bool) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running aggregate of one timing stage or metric.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregate {
    pub count: u64,
    pub total: f64,
    pub max: f64,
}

impl Aggregate {
    fn record(&mut self, value: f64) {
        self.max = if self.count == 0 {
            value
        } else {
            self.max.max(value)
        };
        self.count += 1;
        self.total += value;
    }

    pub fn avg(&self) -> f64 {
        self.total / self.count.max(1) as f64
    }
}

/// Tracks per-stage timing and metrics and reports a summary when the
/// capture session ends.
///
/// Keeps constant-size aggregates, so it can sit on an unbounded live feed.
/// Frame progress is logged every `throttle_frames` sampled frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: HashMap<String, Aggregate>,
    metrics: HashMap<String, Aggregate>,
    start_time: Instant,
    frames_seen: usize,
    frames_sampled: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            frames_seen: 0,
            frames_sampled: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if no frame arrived.
    pub fn summary_string(&self) -> Option<String> {
        if self.frames_seen == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = Vec::new();

        lines.push(format!(
            "Capture summary ({} frames, {} sampled, {:.1}s total):",
            self.frames_seen,
            self.frames_sampled,
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.iter().collect();
        stages.sort_by(|a, b| a.0.cmp(b.0));
        for (stage, agg) in stages {
            lines.push(format!(
                "  {stage:12}: avg {:6.1}ms  max {:6.1}ms  total {:7.0}ms",
                agg.avg(),
                agg.max,
                agg.total
            ));
        }

        let mut metrics: Vec<_> = self.metrics.iter().collect();
        metrics.sort_by(|a, b| a.0.cmp(b.0));
        for (name, agg) in metrics {
            lines.push(format!("  {name}: avg {:.1}  total {:.0}", agg.avg(), agg.total));
        }

        if elapsed_ms > 0.0 {
            let fps = self.frames_seen as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<Aggregate> {
        self.timings.get(stage).copied()
    }

    pub fn metrics_for(&self, name: &str) -> Option<Aggregate> {
        self.metrics.get(name).copied()
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn frame(&mut self, sampled: bool) {
        self.frames_seen += 1;
        if sampled {
            self.frames_sampled += 1;
            if self.frames_sampled % self.throttle_frames == 0 {
                log::info!(
                    "Sampled {}/{} frames",
                    self.frames_sampled,
                    self.frames_seen
                );
            }
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        match self.timings.get_mut(stage) {
            Some(agg) => agg.record(duration_ms),
            None => {
                let mut agg = Aggregate::default();
                agg.record(duration_ms);
                self.timings.insert(stage.to_string(), agg);
            }
        }
    }

    fn metric(&mut self, name: &str, value: f64) {
        match self.metrics.get_mut(name) {
            Some(agg) => agg.record(value),
            None => {
                let mut agg = Aggregate::default();
                agg.record(value);
                self.metrics.insert(name.to_string(), agg);
            }
        }
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
