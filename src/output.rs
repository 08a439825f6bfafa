//! CLI output formatting.
//!
//! Plain, line-oriented summaries for `build` and `check`. Formatting is
//! split from printing so tests can assert on lines without capturing
//! stdout.

use crate::build::{BuildReport, CheckReport};
use std::path::Path;

/// Lines summarizing a finished build, one per page plus a total.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.pages.len() + 1);
    for page in &report.pages {
        lines.push(format!(
            "Generated {}: {} ({} {}, {} {})",
            page.url,
            page.title,
            page.images,
            plural(page.images, "picture", "pictures"),
            page.asides,
            plural(page.asides, "aside", "asides"),
        ));
    }
    lines.push(format!(
        "Generated index.html ({} photos in photo list)",
        report.photo_count
    ));
    lines
}

pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{line}");
    }
}

pub fn print_check_report(report: &CheckReport, photo_list: &Path) {
    println!(
        "{}: {} photos, all basenames unique",
        photo_list.display(),
        report.photo_count
    );
    for source in &report.page_sources {
        println!("  page: {}", source.display());
    }
    println!("{} pages + index.md present", report.page_sources.len());
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
