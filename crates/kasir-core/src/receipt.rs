//! Invoices and plain-text receipts.

use crate::de;
use crate::ids::TransactionRef;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Narrowest receipt that still fits label and amount on one line.
pub const MIN_RECEIPT_WIDTH: usize = 16;

/// Character width of a 58 mm thermal roll.
pub const DEFAULT_RECEIPT_WIDTH: usize = 32;

/// A completed sale as returned by `GET /api/invoices/{no}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub no_transaction: TransactionRef,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    #[serde(default, deserialize_with = "de::idr")]
    pub total_payment: Money,
    #[serde(default, deserialize_with = "de::idr")]
    pub cash: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub name: String,
    #[serde(default, deserialize_with = "de::int")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "de::idr")]
    pub item_price: Money,
    #[serde(default, deserialize_with = "de::idr")]
    pub total_price: Money,
}

impl Invoice {
    /// Cash handed back. `None` if the stored amounts underflow or mix currencies.
    pub fn change(&self) -> Option<Money> {
        self.cash.try_subtract(&self.total_payment)
    }

    pub fn receipt(&self) -> Receipt<'_> {
        Receipt { invoice: self }
    }
}

/// Text layout of an [`Invoice`].
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'a> {
    invoice: &'a Invoice,
}

impl<'a> Receipt<'a> {
    pub fn new(invoice: &'a Invoice) -> Self {
        Self { invoice }
    }

    /// Render the receipt with lines of at most `width` characters.
    ///
    /// Widths below [`MIN_RECEIPT_WIDTH`] are raised to it.
    pub fn render(&self, store_name: &str, width: usize) -> String {
        let width = width.max(MIN_RECEIPT_WIDTH);
        let rule = "=".repeat(width);
        let inv = self.invoice;
        let mut out = String::new();

        push_line(&mut out, &rule);
        push_line(&mut out, &center(&truncate(store_name.trim(), width), width));
        push_line(&mut out, &rule);
        push_line(&mut out, &truncate(&format!("No Transaksi: {}", inv.no_transaction), width));
        push_line(&mut out, &truncate(&format!("Tanggal: {}", inv.date), width));
        push_line(&mut out, &truncate(&format!("Waktu: {}", inv.time), width));
        push_line(&mut out, &rule);

        for item in &inv.items {
            push_line(&mut out, &truncate(&item.name, width));
            push_line(
                &mut out,
                &truncate(
                    &format!("{} x {}", item.quantity, item.item_price.display_amount()),
                    width,
                ),
            );
            push_line(
                &mut out,
                &columns("  Total:", &item.total_price.display_amount(), width),
            );
        }

        push_line(&mut out, &rule);
        push_line(&mut out, &columns("Total:", &inv.total_payment.display(), width));
        push_line(&mut out, &columns("Tunai:", &inv.cash.display(), width));
        let change = inv
            .change()
            .map(|m| m.display())
            .unwrap_or_else(|| "-".to_string());
        push_line(&mut out, &columns("Kembali:", &change, width));
        push_line(&mut out, &rule);
        push_line(&mut out, &center("Terima Kasih", width));
        out
    }

    /// Rendered receipt as bytes for a printer transport.
    pub fn to_bytes(&self, store_name: &str, width: usize) -> Vec<u8> {
        self.render(store_name, width).into_bytes()
    }
}

/// Split `bytes` into writes of at most `size` bytes. A size of zero is treated as one.
pub fn chunks(bytes: &[u8], size: usize) -> impl Iterator<Item = &[u8]> {
    bytes.chunks(size.max(1))
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

/// Label on the left, value flush right.
fn columns(label: &str, value: &str, width: usize) -> String {
    let used = label.chars().count() + value.chars().count();
    if used + 1 > width {
        return truncate(&format!("{} {}", label, value), width);
    }
    format!("{}{}{}", label, " ".repeat(width - used), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice() -> Invoice {
        serde_json::from_value(serde_json::json!({
            "no_transaction": "TRX-20261014-001",
            "date": "2026-10-14",
            "time": "10:15:00",
            "items": [
                {"name": "Kopi Susu", "quantity": 2, "item_price": "10000.00", "total_price": 20000}
            ],
            "total_payment": "20000.00",
            "cash": 25000
        }))
        .unwrap()
    }

    #[test]
    fn test_invoice_lenient_numbers() {
        let inv = invoice();
        assert_eq!(inv.items[0].item_price, Money::idr(10000));
        assert_eq!(inv.total_payment, Money::idr(20000));
        assert_eq!(inv.change(), Some(Money::idr(5000)));
    }

    #[test]
    fn test_render_layout() {
        let text = invoice().receipt().render("Toko Nay", 32);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(32));
        assert_eq!(lines[1].trim(), "Toko Nay");
        assert_eq!(lines[3], "No Transaksi: TRX-20261014-001");
        assert!(lines.contains(&"Kopi Susu"));
        assert!(lines.contains(&"2 x 10.000"));
        assert_eq!(lines.last().map(|l| l.trim()), Some("Terima Kasih"));

        let kembali = lines.iter().find(|l| l.starts_with("Kembali:")).unwrap();
        assert!(kembali.ends_with("Rp5.000"));
        assert_eq!(kembali.chars().count(), 32);
    }

    #[test]
    fn test_render_respects_width() {
        let mut inv = invoice();
        inv.items[0].name = "A very long product name that will not fit".to_string();
        let text = inv.receipt().render("Store", 4);
        assert!(text.lines().all(|l| l.chars().count() <= MIN_RECEIPT_WIDTH));
    }

    #[test]
    fn test_render_has_no_control_codes() {
        let bytes = invoice().receipt().to_bytes("Store", DEFAULT_RECEIPT_WIDTH);
        assert!(bytes.iter().all(|b| *b == b'\n' || (0x20..0x7f).contains(b)));
    }

    #[test]
    fn test_chunks() {
        let data = vec![0u8; 1200];
        let sizes: Vec<usize> = chunks(&data, 512).map(|c| c.len()).collect();
        assert_eq!(sizes, vec![512, 512, 176]);
        assert_eq!(chunks(&data[..3], 0).count(), 3);
        assert_eq!(chunks(&[], 512).count(), 0);
    }
}
