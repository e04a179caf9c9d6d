// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the chunklens CLI.
//!
//! OneDark on dark terminals, One Light on light ones. The theme comes from
//! `CHUNKLENS_THEME` when set, then the `COLORFGBG` hint some terminals
//! export, then macOS appearance, and finally dark.
//!
//! Colors are off when `NO_COLOR` is set or stdout isn't a TTY, so piping
//! the output gives plain text with the same layout.

use std::sync::OnceLock;

use chunklens::{Bucket, QualityGrade, RankTier, Severity};

/// Inner width of every box, between the two vertical borders.
pub const BOX_WIDTH: usize = 80;

// ═══════════════════════════════════════════════════════════════════════════
// THEME
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

fn theme_from_env() -> Option<Theme> {
    match std::env::var("CHUNKLENS_THEME").ok()?.to_lowercase().as_str() {
        "light" | "l" => Some(Theme::Light),
        "dark" | "d" => Some(Theme::Dark),
        _ => None,
    }
}

/// `COLORFGBG` is `"fg;bg"`; background 7 and up (except 8) is light.
fn theme_from_colorfgbg() -> Option<Theme> {
    let value = std::env::var("COLORFGBG").ok()?;
    let bg: u8 = value.rsplit(';').next()?.parse().ok()?;
    (bg >= 7 && bg != 8).then_some(Theme::Light)
}

#[cfg(target_os = "macos")]
fn theme_from_system() -> Option<Theme> {
    let output = std::process::Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .ok()?;
    let dark = String::from_utf8_lossy(&output.stdout).contains("Dark");
    (!dark && output.status.success()).then_some(Theme::Light)
}

#[cfg(not(target_os = "macos"))]
fn theme_from_system() -> Option<Theme> {
    None
}

pub fn theme() -> Theme {
    *THEME.get_or_init(|| {
        theme_from_env()
            .or_else(theme_from_colorfgbg)
            .or_else(theme_from_system)
            .unwrap_or(Theme::Dark)
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// PALETTES (true color)
// ═══════════════════════════════════════════════════════════════════════════
//
// OneDark: https://github.com/joshdick/onedark.vim
// One Light: https://github.com/sonph/onehalf

fn fg(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

fn bg(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[48;2;{};{};{}m", r, g, b)
}

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const UNDERLINE: &str = "\x1b[4m";

type Rgb = (u8, u8, u8);

mod onedark {
    use super::Rgb;
    pub const RED: Rgb = (224, 108, 117); // #e06c75
    pub const GREEN: Rgb = (152, 195, 121); // #98c379
    pub const YELLOW: Rgb = (229, 192, 123); // #e5c07b
    pub const ORANGE: Rgb = (209, 154, 102); // #d19a66
    pub const BLUE: Rgb = (97, 175, 239); // #61afef
    pub const MAGENTA: Rgb = (198, 120, 221); // #c678dd
    pub const CYAN: Rgb = (86, 182, 194); // #56b6c2
    pub const GRAY: Rgb = (92, 99, 112); // #5c6370
    pub const OVERLAY: Rgb = (62, 68, 81); // #3e4451
}

mod onelight {
    use super::Rgb;
    pub const RED: Rgb = (228, 86, 73); // #e45649
    pub const GREEN: Rgb = (80, 161, 79); // #50a14f
    pub const YELLOW: Rgb = (193, 132, 1); // #c18401
    pub const ORANGE: Rgb = (152, 104, 1); // #986801
    pub const BLUE: Rgb = (64, 120, 242); // #4078f2
    pub const MAGENTA: Rgb = (166, 38, 164); // #a626a4
    pub const CYAN: Rgb = (1, 132, 188); // #0184bc
    pub const GRAY: Rgb = (160, 161, 167); // #a0a1a7
    pub const OVERLAY: Rgb = (229, 229, 230); // #e5e5e6
}

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let (r, g, b) = match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            };
            fg(r, g, b)
        }
    };
}

theme_color!(RED);
theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(ORANGE);
theme_color!(BLUE);
theme_color!(MAGENTA);
theme_color!(CYAN);
theme_color!(GRAY);

/// Background used to mark overlap regions.
#[allow(non_snake_case)]
pub fn OVERLAY_BG() -> String {
    let (r, g, b) = match theme() {
        Theme::Dark => onedark::OVERLAY,
        Theme::Light => onelight::OVERLAY,
    };
    bg(r, g, b)
}

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Wrap `text` in `styles` when colors are on.
pub fn styled(styles: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", styles.concat(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Theme color plus optional modifiers.
pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.concat(), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Length in terminal columns, skipping ANSI escapes.
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        match (in_escape, c) {
            (_, '\x1b') => in_escape = true,
            (true, 'm') => in_escape = false,
            (true, _) => {}
            (false, _) => len += 1,
        }
    }
    len
}

pub fn pad_left(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_len(s));
    format!("{}{}", " ".repeat(pad), s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_len(s));
    format!("{}{}", s, " ".repeat(pad))
}

/// Cut to `max` characters with a trailing ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// │ content          │
pub fn row(content: &str) {
    let border = themed(GRAY, &[], "│");
    println!("{}{}{}", border, pad_right(content, BOX_WIDTH), border);
}

fn labelled_rule(left: &str, right: &str, label: &str) {
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let fill = "─".repeat(BOX_WIDTH.saturating_sub(visible_len(&label_part)));
    println!(
        "{}{}{}",
        themed(GRAY, &[], left),
        label_part,
        themed(GRAY, &[], &format!("{}{}", fill, right))
    );
}

/// ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    labelled_rule("┌", "┐", label);
}

/// ├─ LABEL ──────────┤
pub fn section_mid(label: &str) {
    labelled_rule("├", "┤", label);
}

/// └──────────────────┘
pub fn section_bot() {
    println!("{}", themed(GRAY, &[], &format!("└{}┘", "─".repeat(BOX_WIDTH))));
}

/// ╔══════╗ / ║ TITLE ║ / ╚══════╝
pub fn title(text: &str) {
    let rule = "═".repeat(BOX_WIDTH);
    let colored = themed(CYAN, &[BOLD], text);
    let total_pad = BOX_WIDTH.saturating_sub(visible_len(&colored));
    let left = total_pad / 2;
    let edge = themed(BLUE, &[], "║");
    println!("{}", themed(BLUE, &[], &format!("╔{}╗", rule)));
    println!(
        "{}{}{}{}{}",
        edge,
        " ".repeat(left),
        colored,
        " ".repeat(total_pad - left),
        edge
    );
    println!("{}", themed(BLUE, &[], &format!("╚{}╝", rule)));
}

/// Print `text` wrapped to the box, one `row` per line.
///
/// `pieces` are (visible text, style prefix) pairs. Styles survive line
/// breaks: each wrapped line reopens the style of the piece it continues.
pub fn wrapped_rows(pieces: &[(String, String)]) {
    let width = BOX_WIDTH - 2;
    let colors = use_colors();
    let mut line = String::new();
    let mut used = 0;

    let flush = |line: &mut String, used: &mut usize| {
        row(&format!(" {}", line));
        line.clear();
        *used = 0;
    };

    for (text, style) in pieces {
        let open = |line: &mut String| {
            if colors && !style.is_empty() {
                line.push_str(style);
            }
        };
        open(&mut line);
        for c in text.chars() {
            if c == '\n' || used == width {
                if colors && !style.is_empty() {
                    line.push_str(RESET);
                }
                flush(&mut line, &mut used);
                open(&mut line);
                if c == '\n' {
                    continue;
                }
            }
            line.push(if c == '\t' { ' ' } else { c });
            used += 1;
        }
        if colors && !style.is_empty() {
            line.push_str(RESET);
        }
    }
    if used > 0 {
        flush(&mut line, &mut used);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Color for a similarity bucket, strong green to red.
pub fn bucket_color(bucket: Bucket) -> String {
    match bucket {
        Bucket::VeryHigh => GREEN(),
        Bucket::High => CYAN(),
        Bucket::Moderate => YELLOW(),
        Bucket::Low => ORANGE(),
        Bucket::VeryLow => RED(),
    }
}

/// Two-column heatmap cell: a shaded block, or a digit without colors.
pub fn heat_cell(bucket: Option<Bucket>, diagonal: bool) -> String {
    let Some(bucket) = bucket else {
        return themed(GRAY, &[], " ·");
    };
    if !use_colors() {
        let digit = match bucket {
            Bucket::VeryHigh => '4',
            Bucket::High => '3',
            Bucket::Moderate => '2',
            Bucket::Low => '1',
            Bucket::VeryLow => '0',
        };
        return format!(" {}", if diagonal { '\\' } else { digit });
    }
    let block = if diagonal { "◆◆" } else { "██" };
    format!("{}{}{}", bucket_color(bucket), block, RESET)
}

pub fn severity_badge(severity: Severity, label: &str) -> String {
    match severity {
        Severity::High => themed(RED, &[BOLD], &format!("[{}]", label)),
        Severity::Medium => themed(YELLOW, &[BOLD], &format!("[{}]", label)),
    }
}

pub fn tier_color(tier: RankTier) -> String {
    match tier {
        RankTier::First => GREEN(),
        RankTier::Second => BLUE(),
        RankTier::Third => MAGENTA(),
        RankTier::TopFive => ORANGE(),
        RankTier::Other => GRAY(),
    }
}

pub fn tier_badge(tier: RankTier, label: &str) -> String {
    let color = tier_color(tier);
    styled(&[BOLD, color.as_str()], label)
}

pub fn grade_label(grade: QualityGrade) -> String {
    let color: fn() -> String = match grade {
        QualityGrade::Excellent => GREEN,
        QualityGrade::Good => BLUE,
        QualityGrade::Fair => YELLOW,
        QualityGrade::Poor => RED,
    };
    themed(color, &[BOLD], grade.label())
}

/// Score to three decimals, colored by bucket.
pub fn score_value(score: f64) -> String {
    let text = format!("{:.3}", score);
    if !use_colors() {
        return text;
    }
    format!("{}{}{}", bucket_color(Bucket::of(score)), text, RESET)
}
