//! Sales and purchase report schemas.
//!
//! The report endpoints return a different row shape per period and do not
//! agree on field names. The types here take every spelling the backend
//! uses and default whatever is missing.

use crate::de;
use crate::money::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregation window of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[default]
    Daily,
    Monthly,
    Yearly,
}

impl ReportPeriod {
    pub const ALL: [ReportPeriod; 3] = [ReportPeriod::Daily, ReportPeriod::Monthly, ReportPeriod::Yearly];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Daily => "daily",
            ReportPeriod::Monthly => "monthly",
            ReportPeriod::Yearly => "yearly",
        }
    }

    /// `{period}/{YYYY-MM-DD}`, the tail of every report URL.
    pub fn path_segment(&self, date: NaiveDate) -> String {
        format!("{}/{}", self.as_str(), date.format("%Y-%m-%d"))
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(ReportPeriod::Daily),
            "monthly" | "month" => Ok(ReportPeriod::Monthly),
            "yearly" | "year" => Ok(ReportPeriod::Yearly),
            other => Err(format!("unknown report period '{}'", other)),
        }
    }
}

/// Sales totals and rows for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SalesReport {
    #[serde(default, deserialize_with = "de::int")]
    pub total_transactions: i64,
    #[serde(default, deserialize_with = "de::idr")]
    pub total_income: Money,
    #[serde(default, deserialize_with = "de::idr")]
    pub total_revenue: Money,
    #[serde(default, deserialize_with = "de::idr")]
    pub total_profit: Money,
    #[serde(default)]
    pub transactions: Vec<SalesEntry>,
}

/// One row of a sales report.
///
/// Daily rows are single transactions. Monthly rows are days and yearly
/// rows are months, both carrying a transaction count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SalesEntry {
    #[serde(default)]
    pub no_transaction: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de::int")]
    pub month_num: i64,
    #[serde(default)]
    pub items: Vec<SalesItem>,
    #[serde(
        default,
        alias = "transaction_amount",
        alias = "total_transaction_permonth",
        deserialize_with = "de::int"
    )]
    pub transaction_count: i64,
    #[serde(default, deserialize_with = "de::idr")]
    pub revenue: Money,
    #[serde(default, deserialize_with = "de::idr")]
    pub income: Money,
    #[serde(default, deserialize_with = "de::idr")]
    pub profit: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SalesItem {
    pub name: String,
    #[serde(default, deserialize_with = "de::int")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "de::idr")]
    pub price: Money,
}

/// A point of the income/profit chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub income: Money,
    pub profit: Money,
}

impl SalesReport {
    /// Report with no rows and zero totals.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Recorded transaction count, falling back to the number of rows.
    pub fn transaction_count(&self) -> i64 {
        if self.total_transactions > 0 {
            self.total_transactions
        } else {
            self.transactions.len() as i64
        }
    }

    /// Income and profit per row, labelled by date.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.transactions
            .iter()
            .map(|entry| ChartPoint {
                label: entry.label(),
                income: entry.income,
                profit: entry.profit,
            })
            .collect()
    }
}

impl SalesEntry {
    /// Date if present, otherwise the transaction number or time.
    pub fn label(&self) -> String {
        self.date
            .as_deref()
            .or(self.no_transaction.as_deref())
            .or(self.time.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

/// Daily, monthly and yearly sales for one reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct SalesOverview {
    pub daily: SalesReport,
    pub monthly: SalesReport,
    pub yearly: SalesReport,
}

impl SalesOverview {
    pub fn report(&self, period: ReportPeriod) -> &SalesReport {
        match period {
            ReportPeriod::Daily => &self.daily,
            ReportPeriod::Monthly => &self.monthly,
            ReportPeriod::Yearly => &self.yearly,
        }
    }

    /// Chart for a period, drawn from the next coarser report: the daily
    /// chart plots the days of the month, the monthly and yearly charts the
    /// months of the year.
    pub fn chart(&self, period: ReportPeriod) -> Vec<ChartPoint> {
        match period {
            ReportPeriod::Daily => self.monthly.chart_points(),
            ReportPeriod::Monthly | ReportPeriod::Yearly => self.yearly.chart_points(),
        }
    }
}

/// Purchase (stock expenditure) totals and rows for one period.
///
/// The backend reports the count as `total_transaction` or `total_purchases`
/// and the spend as `total_expenditure` or `total_expendeture` depending on
/// the period; use [`PurchaseReport::transaction_count`] and
/// [`PurchaseReport::expenditure`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PurchaseReport {
    #[serde(default, deserialize_with = "de::int")]
    pub total_transaction: i64,
    #[serde(default, deserialize_with = "de::int")]
    pub total_purchases: i64,
    #[serde(default, deserialize_with = "de::idr")]
    pub total_expenditure: Money,
    #[serde(default, rename = "total_expendeture", deserialize_with = "de::idr")]
    pub total_expenditure_yearly: Money,
    /// Individual purchases (daily report).
    #[serde(default)]
    pub items_purchasing: Vec<PurchaseEntry>,
    /// Per-day totals (monthly report).
    #[serde(default)]
    pub daily_data: Vec<PurchaseDay>,
    /// Per-month totals (yearly report).
    #[serde(default)]
    pub monthly_purchases: Vec<PurchaseMonth>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PurchaseEntry {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub no_transaction: String,
    #[serde(default, deserialize_with = "de::idr")]
    pub purchases: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PurchaseDay {
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "de::int")]
    pub total_transaction: i64,
    #[serde(default, deserialize_with = "de::idr")]
    pub expenditure: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PurchaseMonth {
    #[serde(default)]
    pub month_name: String,
    #[serde(default, deserialize_with = "de::int")]
    pub year: i64,
    #[serde(default, deserialize_with = "de::int")]
    pub total_transaction: i64,
    #[serde(
        default,
        alias = "total_expendeture",
        rename = "total_expenditure",
        deserialize_with = "de::idr"
    )]
    pub total_expenditure: Money,
}

impl PurchaseReport {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn transaction_count(&self) -> i64 {
        self.total_transaction.max(self.total_purchases)
    }

    pub fn expenditure(&self) -> Money {
        if self.total_expenditure.is_zero() {
            self.total_expenditure_yearly
        } else {
            self.total_expenditure
        }
    }

    pub fn row_count(&self) -> usize {
        self.items_purchasing.len() + self.daily_data.len() + self.monthly_purchases.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_period_path_segment() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(ReportPeriod::Monthly.path_segment(date), "monthly/2026-03-07");
        assert_eq!("Yearly".parse::<ReportPeriod>(), Ok(ReportPeriod::Yearly));
        assert!("weekly".parse::<ReportPeriod>().is_err());
    }

    #[test]
    fn test_daily_sales_report() {
        let report: SalesReport = serde_json::from_value(json!({
            "total_transactions": 2,
            "total_revenue": "45000.00",
            "total_profit": "9000",
            "transactions": [{
                "no_transaction": "TRX-1",
                "time": "09:12",
                "items": [{"name": "Teh", "quantity": "3", "price": "5000.00"}],
                "revenue": 15000,
                "profit": 3000
            }]
        }))
        .unwrap();

        assert_eq!(report.total_revenue, Money::idr(45000));
        assert_eq!(report.total_income, Money::idr(0));
        assert_eq!(report.transactions[0].items[0].quantity, 3);
        assert_eq!(report.transactions[0].label(), "TRX-1");
    }

    #[test]
    fn test_monthly_and_yearly_counts() {
        let monthly: SalesEntry = serde_json::from_value(json!({
            "date": "2026-10-01", "transaction_amount": 4, "income": "120000", "profit": 20000
        }))
        .unwrap();
        let yearly: SalesEntry = serde_json::from_value(json!({
            "month_num": 10, "date": "Oktober", "total_transaction_permonth": "31", "income": 1, "profit": null
        }))
        .unwrap();

        assert_eq!(monthly.transaction_count, 4);
        assert_eq!(yearly.transaction_count, 31);
        assert_eq!(yearly.month_num, 10);
        assert!(yearly.profit.is_zero());
    }

    #[test]
    fn test_malformed_amount_is_rejected() {
        let result: Result<SalesEntry, _> = serde_json::from_value(json!({"income": "lots"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_chart_points() {
        let report = SalesReport {
            transactions: vec![
                SalesEntry {
                    date: Some("2026-10-01".into()),
                    income: Money::idr(100),
                    profit: Money::idr(10),
                    ..Default::default()
                },
                SalesEntry {
                    date: Some("2026-10-02".into()),
                    income: Money::idr(200),
                    profit: Money::idr(20),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let points = report.chart_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].label, "2026-10-02");
        assert_eq!(points[1].income, Money::idr(200));

        let overview = SalesOverview {
            monthly: report.clone(),
            ..Default::default()
        };
        assert_eq!(overview.chart(ReportPeriod::Daily), points);
        assert!(overview.chart(ReportPeriod::Yearly).is_empty());
    }

    #[test]
    fn test_empty_report() {
        let empty = SalesReport::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.transaction_count(), 0);
        assert!(empty.chart_points().is_empty());
    }

    #[test]
    fn test_purchase_report_spellings() {
        let monthly: PurchaseReport = serde_json::from_value(json!({
            "total_purchases": 3,
            "total_expenditure": "300000.00",
            "daily_data": [{"date": "2026-10-02", "total_transaction": 3, "expenditure": "300000"}]
        }))
        .unwrap();
        assert_eq!(monthly.transaction_count(), 3);
        assert_eq!(monthly.expenditure(), Money::idr(300000));

        let yearly: PurchaseReport = serde_json::from_value(json!({
            "total_transaction": 12,
            "total_expendeture": 900000,
            "monthly_purchases": [{"month_name": "Oktober", "year": 2026, "total_transaction": 12, "total_expendeture": "900000"}]
        }))
        .unwrap();
        assert_eq!(yearly.expenditure(), Money::idr(900000));
        assert_eq!(yearly.monthly_purchases[0].total_expenditure, Money::idr(900000));
        assert_eq!(yearly.row_count(), 1);
    }
}
