//! Performance monitor: rolling buffer of frame samples with CSV export.
//!
//! One monitor instance is constructed at the composition root and handed by
//! mutable reference to whatever records or exports samples. There is no
//! ambient/global monitor.

use std::collections::VecDeque;
use std::io::Write;
use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::PERF_SAMPLE_CAPACITY;
use crate::error::ExportError;

/// One recorded frame sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfSample {
    /// Wall-clock time the sample was recorded.
    pub timestamp: DateTime<Utc>,
    /// Time spent in the render pass, in milliseconds.
    pub render_time_ms: f64,
    /// Number of shapes on the canvas at sample time.
    pub object_count: usize,
    /// Frames per second derived from inter-sample spacing.
    pub fps: f64,
    /// Total heap size in MB, when a collaborator can observe it.
    pub total_heap_mb: Option<f64>,
    /// Used heap size in MB, when a collaborator can observe it.
    pub used_heap_mb: Option<f64>,
}

/// Rolling sample buffer of render time / FPS / object count.
#[derive(Debug)]
pub struct PerfMonitor {
    samples: VecDeque<PerfSample>,
    capacity: usize,
    recording: bool,
    last_frame_at: Option<Instant>,
}

impl PerfMonitor {
    /// Creates a monitor with the default rolling capacity, not yet recording.
    pub fn new() -> Self {
        Self::with_capacity(PERF_SAMPLE_CAPACITY)
    }

    /// Creates a monitor bounded to `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            recording: false,
            last_frame_at: None,
        }
    }

    /// Begins accepting samples.
    pub fn start(&mut self) {
        tracing::debug!("performance monitor started");
        self.recording = true;
        self.last_frame_at = None;
    }

    /// Stops accepting samples; the buffer is kept for export.
    pub fn stop(&mut self) {
        tracing::debug!(samples = self.samples.len(), "performance monitor stopped");
        self.recording = false;
    }

    /// Discards all recorded samples.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.last_frame_at = None;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = &PerfSample> {
        self.samples.iter()
    }

    /// Records one frame. FPS derives from the spacing to the previous
    /// recorded frame; the first frame after `start` reports 0.0.
    ///
    /// A no-op unless the monitor is recording.
    pub fn record_frame(&mut self, render_time_ms: f64, object_count: usize) {
        if !self.recording {
            return;
        }
        let now = Instant::now();
        let fps = match self.last_frame_at {
            Some(prev) => {
                let dt = now.duration_since(prev).as_secs_f64();
                if dt > 0.0 {
                    1.0 / dt
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        self.last_frame_at = Some(now);
        self.push_sample(PerfSample {
            timestamp: Utc::now(),
            render_time_ms,
            object_count,
            fps,
            total_heap_mb: None,
            used_heap_mb: None,
        });
    }

    /// Appends a fully-formed sample (external collaborators may carry heap
    /// figures the engine cannot observe). Oldest samples roll off when the
    /// buffer is full.
    pub fn push_sample(&mut self, sample: PerfSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Mean render time over the buffer, or `None` when empty.
    pub fn average_render_time_ms(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().map(|s| s.render_time_ms).sum::<f64>() / self.samples.len() as f64)
    }

    /// Writes all samples as CSV, one row per sample.
    ///
    /// Header and column order are fixed; optional heap fields render as the
    /// literal string `N/A`.
    pub fn export_csv<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        writeln!(
            writer,
            "Timestamp, Render Time (ms), Object Count, FPS, Total Heap Size (MB), Used Heap Size (MB)"
        )?;
        for sample in &self.samples {
            writeln!(
                writer,
                "{}, {:.3}, {}, {:.2}, {}, {}",
                sample.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                sample.render_time_ms,
                sample.object_count,
                sample.fps,
                format_optional(sample.total_heap_mb),
                format_optional(sample.used_heap_mb),
            )?;
        }
        Ok(())
    }
}

impl Default for PerfMonitor {
    fn default() -> Self {
        Self::new()
    }
}

fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_at(ts: DateTime<Utc>) -> PerfSample {
        PerfSample {
            timestamp: ts,
            render_time_ms: 4.25,
            object_count: 12,
            fps: 60.0,
            total_heap_mb: None,
            used_heap_mb: None,
        }
    }

    #[test]
    fn record_is_gated_on_start() {
        let mut monitor = PerfMonitor::new();
        monitor.record_frame(1.0, 3);
        assert!(monitor.is_empty());

        monitor.start();
        monitor.record_frame(1.0, 3);
        assert_eq!(monitor.len(), 1);

        monitor.stop();
        monitor.record_frame(1.0, 3);
        assert_eq!(monitor.len(), 1);
    }

    #[test]
    fn first_frame_reports_zero_fps() {
        let mut monitor = PerfMonitor::new();
        monitor.start();
        monitor.record_frame(2.0, 1);
        let first = monitor.samples().next().expect("one sample");
        assert_eq!(first.fps, 0.0);
    }

    #[test]
    fn buffer_is_bounded() {
        let mut monitor = PerfMonitor::with_capacity(3);
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        for i in 0..5 {
            let mut s = sample_at(ts);
            s.object_count = i;
            monitor.push_sample(s);
        }
        assert_eq!(monitor.len(), 3);
        let counts: Vec<usize> = monitor.samples().map(|s| s.object_count).collect();
        assert_eq!(counts, vec![2, 3, 4]);
    }

    #[test]
    fn csv_export_header_and_na_fields() {
        let mut monitor = PerfMonitor::with_capacity(8);
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        monitor.push_sample(sample_at(ts));
        let mut s = sample_at(ts);
        s.total_heap_mb = Some(128.0);
        s.used_heap_mb = Some(64.5);
        monitor.push_sample(s);

        let mut out = Vec::new();
        monitor.export_csv(&mut out).expect("export should succeed");
        let text = String::from_utf8(out).expect("csv is utf-8");
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("Timestamp, Render Time (ms), Object Count, FPS, Total Heap Size (MB), Used Heap Size (MB)")
        );
        let row = lines.next().expect("first data row");
        assert!(row.starts_with("2024-05-01T12:00:00.000Z"));
        assert!(row.ends_with("N/A, N/A"));
        let row = lines.next().expect("second data row");
        assert!(row.ends_with("128.00, 64.50"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_export_writes_through_a_file() {
        let mut monitor = PerfMonitor::new();
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        monitor.push_sample(sample_at(ts));

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("perf.csv");
        let file = std::fs::File::create(&path).expect("file created");
        monitor.export_csv(file).expect("export succeeds");

        let text = std::fs::read_to_string(&path).expect("file readable");
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn samples_roundtrip_through_json() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let sample = sample_at(ts);
        let json = serde_json::to_string(&sample).expect("serializes");
        let back: PerfSample = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, sample);
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut monitor = PerfMonitor::new();
        monitor.start();
        monitor.record_frame(1.0, 1);
        monitor.clear();
        assert!(monitor.is_empty());
        assert!(monitor.is_recording());
    }
}
