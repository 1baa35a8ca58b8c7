//! Output formatting for the CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use kasir_core::money::Money;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row. Columns listed in `right` are right-aligned.
    pub fn table_row(&self, cols: &[&str], widths: &[usize], right: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(i, (col, width))| {
                let col = clip(col, *width);
                if right.contains(&i) {
                    format!("{:>width$}", col, width = width)
                } else {
                    format!("{:width$}", col, width = width)
                }
            })
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print a separator matching a table's widths.
    pub fn table_rule(&self, widths: &[usize]) {
        if self.json {
            return;
        }
        let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        println!("  {}", style("-".repeat(total)).dim());
    }

    /// Print plain text as-is (receipts).
    pub fn raw(&self, text: &str) {
        if self.json {
            return;
        }
        print!("{}", text);
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Stock level coloured by urgency.
pub fn stock_badge(stock: i64) -> String {
    let text = stock.to_string();
    match stock {
        s if s <= 0 => style(text).red().to_string(),
        s if s <= 5 => style(text).yellow().to_string(),
        _ => style(text).green().to_string(),
    }
}

/// Rupiah amount for table cells.
pub fn money(amount: &Money) -> String {
    amount.display()
}

/// Truncate to `width` characters, marking the cut.
fn clip(text: &str, width: usize) -> String {
    if console::measure_text_width(text) <= width || width < 2 {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip() {
        assert_eq!(clip("Kopi", 10), "Kopi");
        assert_eq!(clip("Kopi Susu Gula Aren", 10), "Kopi Susu…");
    }

    #[test]
    fn test_money_cell() {
        assert_eq!(money(&Money::idr(1250000)), "Rp1.250.000");
    }
}
