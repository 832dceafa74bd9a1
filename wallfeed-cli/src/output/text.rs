//! Text output formatting with colors.

use std::time::Duration;
use wallfeed_core::{Collection, ProviderError, Wallpaper};
use wallfeed_store::CacheEntry;

use super::{ProviderRow, StatsRow};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Wallpapers
    // ========================================================================

    /// Header line for a list: query key, size and freshness.
    pub fn format_list_header(&self, entry: &CacheEntry, from_cache: bool) -> String {
        let freshness = if from_cache {
            format!("cached {}", format_age(entry.age()))
        } else {
            "fresh".to_string()
        };
        format!(
            "{} {} {}",
            self.bold(&entry.key),
            self.dim(&format!("· {} wallpapers ·", entry.items.len())),
            self.dim(&freshness)
        )
    }

    /// One wallpaper per line.
    pub fn format_wallpaper_line(&self, wallpaper: &Wallpaper) -> String {
        let mut line = format!(
            "{:<28} {:>9}  {}",
            wallpaper.id,
            wallpaper.resolution(),
            wallpaper.title.as_deref().unwrap_or("untitled")
        );
        if let Some(author) = &wallpaper.author {
            line.push_str(&self.dim(&format!(" by {}", author.name)));
        }
        if wallpaper.is_premium {
            line.push(' ');
            line.push_str(&self.yellow("[premium]"));
        }
        if wallpaper.is_live {
            line.push(' ');
            line.push_str(&self.cyan("[live]"));
        }
        line
    }

    /// Full description of one wallpaper.
    pub fn format_wallpaper_detail(&self, wallpaper: &Wallpaper) -> String {
        let mut lines = vec![
            self.bold(wallpaper.title.as_deref().unwrap_or(&wallpaper.id)),
            format!("Id:         {}", wallpaper.id),
            format!("Provider:   {}", wallpaper.provider.display_name()),
            format!("Resolution: {}", wallpaper.resolution()),
            format!("Image:      {}", self.cyan(&wallpaper.url)),
        ];
        if let Some(description) = &wallpaper.description {
            lines.push(format!("About:      {description}"));
        }
        if let Some(author) = &wallpaper.author {
            let profile = author
                .profile_url
                .as_deref()
                .map(|u| format!(" ({u})"))
                .unwrap_or_default();
            lines.push(format!("Author:     {}{profile}", author.name));
        }
        if let Some(page) = &wallpaper.attribution.source_page {
            lines.push(format!("Source:     {page}"));
        }
        if let Some(license) = &wallpaper.attribution.license {
            lines.push(format!("License:    {license}"));
        }
        if !wallpaper.tags.is_empty() {
            lines.push(format!("Tags:       {}", wallpaper.tags.join(", ")));
        }
        if let Some(created) = wallpaper.created_at {
            lines.push(format!("Created:    {}", created.format("%Y-%m-%d")));
        }
        if wallpaper.is_premium {
            lines.push(self.yellow("Premium"));
        }
        lines.join("\n")
    }

    /// One collection per line.
    pub fn format_collection_line(&self, collection: &Collection) -> String {
        let total = collection
            .total
            .map(|n| self.dim(&format!(" ({n})")))
            .unwrap_or_default();
        format!("{:<32} {}{total}", collection.id, collection.title)
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Error line, with a hint for rate limiting.
    pub fn format_error(&self, error: &ProviderError) -> String {
        let hint = if error.is_rate_limited() {
            " (rate limited, try again later)"
        } else {
            ""
        };
        self.red(&format!("{error}{hint}"))
    }

    // ========================================================================
    // Providers and Stats
    // ========================================================================

    /// Header for the providers table.
    pub fn format_providers_header(&self) -> String {
        self.bold(&format!(
            "{:<11} {:<8} {:<6} {:<22} {}",
            "Provider", "Enabled", "Quota", "Key", "Status"
        ))
    }

    /// One row of the providers table.
    pub fn format_provider_line(&self, row: &ProviderRow) -> String {
        let key = match (row.has_key, row.key_required) {
            (true, _) => format!("{} ✓", row.key_var),
            (false, true) => format!("{} ✗", row.key_var),
            (false, false) => format!("{} -", row.key_var),
        };
        let status = if row.usable() {
            self.green("ready")
        } else if row.enabled {
            self.red("missing key")
        } else {
            self.dim("disabled")
        };
        let quota = row.quota.map_or_else(|| "-".to_string(), |q| q.to_string());
        format!(
            "{:<11} {:<8} {:<6} {:<22} {status}",
            row.provider.display_name(),
            if row.enabled { "yes" } else { "no" },
            quota,
            key
        )
    }

    /// One provider's counters for this run.
    pub fn format_stats_line(&self, row: &StatsRow) -> String {
        let quota = row.quota.map_or_else(|| "-".to_string(), |q| q.to_string());
        let mut line = format!(
            "{:<11} calls {:>3}/{:<5} ok {:>3}  failed {:>3}  reserved {:>3}",
            row.provider.display_name(),
            row.counters.calls,
            quota,
            row.counters.successes,
            row.counters.errors,
            row.reserved
        );
        if let Some(err) = &row.counters.last_error {
            line.push_str(&self.dim(&format!("  last error: {}", err.message)));
        }
        line
    }

    // ========================================================================
    // Colors
    // ========================================================================

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Coarse human age: "just now", "5m ago", "3h ago", "2d ago".
pub fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    match secs {
        0..60 => "just now".to_string(),
        60..3600 => format!("{}m ago", secs / 60),
        3600..86_400 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

// ============================================================================
// Tests
// ============================================================================
