use std::time::Duration;

use owo_colors::OwoColorize;
use postgrade_core::{BlogDocument, StructureAnalysis};

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "postgrade".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Grade the structure of a blog post\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a labelled detail line under a step
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Summary of what extraction found
pub fn print_document_details(document: &BlogDocument) {
    print_detail("Title", &document.metadata.title);
    print_detail("Platform", document.platform.as_str());
    print_detail(
        "Length",
        &format!(
            "{} words, {} headings, {} images, {} links",
            document.content.word_count,
            document.content.headings.len(),
            document.content.images.len(),
            document.content.links.len()
        ),
    );
}

/// Score line colored by band: green from 80, yellow from 50, red below
pub fn print_score(analysis: &StructureAnalysis) {
    let score = format!("{}/100", analysis.score);
    let failing = analysis.recommendations.len();

    match analysis.score {
        80.. => eprintln!("  {} {}", "Score:".dimmed(), score.bright_green()),
        50..=79 => eprintln!("  {} {}", "Score:".dimmed(), score.bright_yellow()),
        _ => eprintln!("  {} {}", "Score:".dimmed(), score.bright_red()),
    }
    if failing > 0 {
        eprintln!("  {} {}", "Failing checks:".dimmed(), failing.to_string().bright_white());
    }
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 50.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 500.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print timing summary
pub fn print_timing_summary(total: Duration, timings: &[(&str, Duration)]) {
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Timing Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for (label, duration) in timings {
        print_timing(label, *duration);
    }

    eprintln!(
        "  {} {:>8.2}ms\n",
        "Total:".bold().dimmed(),
        total.as_secs_f64() * 1000.0
    );
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
