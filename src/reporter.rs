//! Human-readable task summaries
//!
//! Pure formatting of a [`CompressionOutcome`] for the host's notification
//! layer. Rendering, localization and placement stay with the host; this
//! module only produces the text and a [`Severity`] tag.

use crate::types::{CompressionOutcome, Severity};

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Render a byte count with binary units (factor 1024) and one decimal.
///
/// Zero renders as the sentinel `"0 Bytes"`; values past the TB range stay in
/// TB.
///
/// ```
/// use zstd_pipeline::reporter::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 Bytes");
/// assert_eq!(format_bytes(1536), "1.5 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// `((original - compressed) / original) * 100`, or `0.0` for empty input.
///
/// Negative when the artifact is larger than the source.
pub fn reduction_percent(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    (original_size as f64 - compressed_size as f64) / original_size as f64 * 100.0
}

/// Summary line for an outcome
pub fn format(outcome: &CompressionOutcome) -> String {
    match outcome {
        CompressionOutcome::Success {
            original_size,
            compressed_size,
        } => {
            let reduction = if *original_size == 0 {
                "0.0".to_string()
            } else {
                format!("{:.2}", reduction_percent(*original_size, *compressed_size))
            };
            format!(
                "Compressed {} to {} ({}% reduction)",
                format_bytes(*original_size),
                format_bytes(*compressed_size),
                reduction
            )
        }
        CompressionOutcome::Failure { kind, detail } => {
            format!("Compression failed ({}): {}", kind, detail)
        }
        CompressionOutcome::Cancelled => {
            "Compression cancelled; no file was written".to_string()
        }
    }
}

/// Severity the host should display an outcome with
pub fn severity(outcome: &CompressionOutcome) -> Severity {
    match outcome {
        CompressionOutcome::Success { .. } => Severity::Info,
        CompressionOutcome::Cancelled => Severity::Warning,
        CompressionOutcome::Failure { .. } => Severity::Error,
    }
}

/// Reporting collaborator receiving formatted outcomes
pub trait ReportSink: Send + Sync {
    /// Deliver one message
    fn report(&self, severity: Severity, message: &str);
}

/// [`ReportSink`] that logs through `tracing` at the matching level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReportSink;

impl ReportSink for TracingReportSink {
    fn report(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!(report = %message, "Compression report"),
            Severity::Warning => tracing::warn!(report = %message, "Compression report"),
            Severity::Error => tracing::error!(report = %message, "Compression report"),
        }
    }
}
