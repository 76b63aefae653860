use colored::Colorize;
use std::fmt;

use crate::rewrite::RewriteReport;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
}

fn build_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "INFO",
        MessageKind::Success => "SUCCESS",
        MessageKind::Warning => "WARNING",
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let formatted = format!("{}: {}", build_label(kind), message);
    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Info => formatted,
    }
}

/// Status lines go to stderr; stdout carries rewritten markup.
pub fn print(kind: MessageKind, message: impl fmt::Display) {
    eprintln!("{}", apply_style(kind, message));
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn summary(report: &RewriteReport) {
    success(format!(
        "Rewrote {} of {} price element(s)",
        report.rewritten, report.matched
    ));
    if !report.invalid.is_empty() {
        warning(format!(
            "{} element(s) had no numeric price",
            report.invalid.len()
        ));
    }
}
