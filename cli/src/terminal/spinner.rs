use colored::*;
use indicatif::ProgressStyle;
use sweepr_core::scanner::Progress;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::colors;

pub const TIP: &str = "Press Ctrl-C to finish early";

pub fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ])
}

/// Turns `span` into the scan spinner.
pub fn attach(span: &Span) {
    span.pb_set_style(&style());
    span.pb_set_message(&format!("{}", TIP.italic().white()));
}

pub fn report_progress(span: &Span, progress: Progress) {
    let message: String = format!(
        "Scanned {}/{} hosts, {} so far...",
        progress.hosts_completed,
        progress.hosts_total,
        format!("{} open ports", progress.open_ports).green().bold()
    )
    .color(colors::TEXT_DEFAULT)
    .to_string();

    span.pb_set_message(&message);
}
