//! Console rendering for the scan command.
//!
//! Everything here goes out through [`PRINT_TARGET`], so it shares the
//! tracing writer with log events and never tears the progress spinner.

use std::net::Ipv4Addr;

use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;

/// Tracing target for lines that must reach the console unformatted.
pub const PRINT_TARGET: &str = "sweepr::print";

const PORT_COLUMN: usize = 7;

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn blank() {
    print("");
}

const BANNER: &str = r#"
           _____      _____  ___ _ __  _ __
          / __\ \ /\ / / _ \/ _ \ '_ \| '__|
          \__ \\ V  V /  __/  __/ |_) | |
          |___/ \_/\_/ \___|\___| .__/|_|
                                |_|
"#;

pub fn banner(no_banner: bool, q_level: u8) {
    if no_banner || q_level > 0 {
        return;
    }

    let title: String = format!("⟦ SWEEPR v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let pad: usize = TOTAL_WIDTH.saturating_sub(UnicodeWidthStr::width(title.as_str())) / 2;
    let sep: ColoredString = "═".repeat(pad).bright_black();

    print(&format!("{sep}{}{sep}", title.bright_green().bold()));
    print(&BANNER.bright_green().to_string());
}

/// `──⟦ TITLE ⟧──` spanning the full width.
pub fn section(title: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let label: String = format!("⟦ {} ⟧", title.to_uppercase());
    let fill: usize = TOTAL_WIDTH.saturating_sub(UnicodeWidthStr::width(label.as_str()));
    let left: String = "─".repeat(fill / 2);
    let right: String = "─".repeat(fill - fill / 2);

    print(&format!(
        "{}{}{}",
        left.bright_black(),
        label.bright_green(),
        right.bright_black()
    ));
}

/// Lines styled like a warning event, for announcements that are not
/// warnings.
pub fn notice(msg: &str) {
    print(&notice_line(msg));
}

fn notice_line(msg: &str) -> String {
    format!("{} {}", "[*]".yellow().bold(), msg)
}

/// Key/value table with dot leaders, keys padded to the longest one.
pub fn settings(rows: &[(&str, String)]) {
    let key_width: usize = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    for (key, value) in rows {
        let leader: String = ".".repeat(key_width + 1 - key.len());
        print(&format!(
            "{} {}{}{} {}",
            ">".color(colors::SEPARATOR),
            key.color(colors::PRIMARY),
            leader.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value.color(colors::TEXT_DEFAULT)
        ));
    }
}

/// One host and its open ports as a single-level tree.
pub fn host_tree(idx: usize, host: Ipv4Addr, ports: &[(String, ColoredString)]) {
    print(&format!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        host.to_string().color(colors::IPV4_ADDR)
    ));

    for (i, (port, service)) in ports.iter().enumerate() {
        let branch: &str = if i + 1 == ports.len() { "└─" } else { "├─" };
        print(&format!(
            " {} {}{}{} {}",
            branch.bright_black(),
            port.color(colors::TEXT_DEFAULT),
            ".".repeat(PORT_COLUMN.saturating_sub(port.len())).color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            service
        ));
    }
}

/// Centred summary line between two full-width rules.
pub fn summary(msg: &str) {
    let rule: String = "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string();
    let pad: String = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);

    print(&rule);
    print(&format!("{pad}{msg}"));
    print(&rule);
}

const NO_OPEN_PORTS: &str = r#"
                ___     ___  ___ ___ _  _
               / _ \   / _ \| _ \ __| \| |
              | (_) | | (_) |  _/ _|| .` |
               \___/   \___/|_| |___|_|\_|
"#;

pub fn no_open_ports() {
    print(&NO_OPEN_PORTS.red().bold().to_string());
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
