//! Leaderboard Renderer
//!
//! Pure functions from a snapshot to bar rows. The browser view turns rows
//! into styled elements; the terminal watcher turns them into text.

use crate::snapshot::{Score, TotalsSnapshot};
use crate::teams::Team;
use crate::window::TimeWindow;

/// One rendered team bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarRow {
    pub team: &'static Team,
    pub score: Score,
    /// Filled width, 0..=100
    pub percent: u8,
    /// Locale-formatted score shown inside the bar
    pub score_label: String,
    /// Hover text, "name: formatted score"
    pub tooltip: String,
}

/// `round(100 * score / max(1, max))`, rounding half up and capped at 100
pub fn percent_of(score: Score, max: Score) -> u8 {
    let denom = u128::from(max.max(1));
    let scaled = (200 * u128::from(score) + denom) / (2 * denom);
    scaled.min(100) as u8
}

/// Format an integer with en-US digit grouping, e.g. `1,234,567`
pub fn format_score(score: Score) -> String {
    let digits = score.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Rows for every registry team, in registry order
pub fn bar_rows(snapshot: &TotalsSnapshot) -> Vec<BarRow> {
    let max = snapshot.max_score();

    snapshot
        .standings()
        .map(|(team, score)| {
            let score_label = format_score(score);
            BarRow {
                team,
                score,
                percent: percent_of(score, max),
                tooltip: format!("{}: {}", team.name, score_label),
                score_label,
            }
        })
        .collect()
}

/// A text bar `width` cells wide with `percent`% of them filled
pub fn text_bar(percent: u8, width: usize) -> String {
    let percent = usize::from(percent.min(100));
    let filled = (2 * width * percent + 100) / 200;
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(width - filled));
    bar
}

/// Full terminal frame: header line followed by one line per team
pub fn render_text(snapshot: &TotalsSnapshot, window: TimeWindow, live: bool, width: usize) -> String {
    let mut out = format!(
        "📊 Live Leaderboard · {} · updates {}\n",
        window.label(),
        if live { "on" } else { "off" }
    );

    for row in bar_rows(snapshot) {
        out.push_str(&format!(
            "{} {:<6} {} {}\n",
            row.team.icon,
            row.team.name,
            text_bar(row.percent, width),
            row.score_label
        ));
    }

    out
}
