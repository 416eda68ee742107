//! Styled message output.
//!
//! All helpers take an explicit writer and a colour flag so that callers
//! decide whether the target is a terminal.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::ui::theme::{color_for, ThemeEntry, ThemeMap};

/// Paints `text` with the theme colour for `entry` when `enable_colors` is set.
pub fn paint(text: &str, entry: ThemeEntry, theme: &ThemeMap, enable_colors: bool) -> String {
    match (enable_colors, color_for(theme, entry)) {
        (true, Some(color)) => text.color(color).to_string(),
        _ => text.to_string(),
    }
}

fn print_prefixed<W: Write>(
    writer: &mut W,
    prefix: &str,
    message: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    writeln!(
        writer,
        "{}",
        paint(&format!("{prefix}{message}"), entry, theme, enable_colors)
    )
}

pub fn print_info_message<W: Write>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    print_prefixed(writer, "", message, ThemeEntry::Info, theme, enable_colors)
}

pub fn print_success_message<W: Write>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    print_prefixed(writer, "", message, ThemeEntry::Success, theme, enable_colors)
}

pub fn print_warn_message<W: Write>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    print_prefixed(writer, "Warning: ", message, ThemeEntry::Warn, theme, enable_colors)
}

pub fn print_error_message<W: Write>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    print_prefixed(writer, "Error: ", message, ThemeEntry::Error, theme, enable_colors)
}
