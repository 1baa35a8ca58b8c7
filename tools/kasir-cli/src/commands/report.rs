//! Report commands.

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use kasir_core::money::Money;
use kasir_core::report::{ChartPoint, PurchaseReport, ReportPeriod, SalesReport};

use super::{today, ReportArgs, ReportCommand};
use crate::context::Context;
use crate::output::money;

const BAR_WIDTH: usize = 30;

/// Run the report command.
pub async fn run(args: ReportArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ReportCommand::Sales { period, date } => sales(period, date.unwrap_or_else(today), ctx).await,
        ReportCommand::Purchases { period, date } => {
            purchases(period, date.unwrap_or_else(today), ctx).await
        }
    }
}

async fn sales(period: ReportPeriod, date: NaiveDate, ctx: &Context) -> Result<()> {
    let client = ctx.authed_client()?;
    let spinner = ctx.output.spinner("Fetching sales reports...");
    let overview = client.sales_overview(date).await;
    spinner.finish_and_clear();

    let report = overview.report(period);
    let chart = overview.chart(period);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "period": period,
            "date": date,
            "report": report,
            "chart": chart,
        }));
        return Ok(());
    }

    ctx.output.header(&format!("Sales, {} ({})", period, date));
    ctx.output.kv("transactions", &report.transaction_count().to_string());
    ctx.output.kv("income", &money(&report.total_income));
    ctx.output.kv("revenue", &money(&report.total_revenue));
    ctx.output.kv("profit", &money(&report.total_profit));
    ctx.output.info("");

    if report.is_empty() {
        ctx.output.info("No sales in this period.");
    } else {
        print_sales_rows(period, report, ctx);
    }

    if !chart.is_empty() {
        ctx.output.header("Income");
        for line in chart_lines(&chart, BAR_WIDTH) {
            ctx.output.list_item(&line);
        }
    }
    Ok(())
}

fn print_sales_rows(period: ReportPeriod, report: &SalesReport, ctx: &Context) {
    match period {
        ReportPeriod::Daily => {
            let widths = [20, 8, 14, 14];
            ctx.output
                .table_row(&["TRANSACTION", "TIME", "REVENUE", "PROFIT"], &widths, &[2, 3]);
            ctx.output.table_rule(&widths);
            for entry in &report.transactions {
                let revenue = money(&entry.revenue);
                let profit = money(&entry.profit);
                ctx.output.table_row(
                    &[
                        entry.no_transaction.as_deref().unwrap_or("-"),
                        entry.time.as_deref().unwrap_or("-"),
                        &revenue,
                        &profit,
                    ],
                    &widths,
                    &[2, 3],
                );
                for item in &entry.items {
                    ctx.output.list_item(&format!(
                        "{} x {} @ {}",
                        item.quantity,
                        item.name,
                        money(&item.price)
                    ));
                }
            }
        }
        ReportPeriod::Monthly | ReportPeriod::Yearly => {
            let widths = [14, 12, 14, 14];
            ctx.output
                .table_row(&["DATE", "SALES", "INCOME", "PROFIT"], &widths, &[1, 2, 3]);
            ctx.output.table_rule(&widths);
            for entry in &report.transactions {
                let count = entry.transaction_count.to_string();
                let income = money(&entry.income);
                let profit = money(&entry.profit);
                ctx.output.table_row(
                    &[&entry.label(), &count, &income, &profit],
                    &widths,
                    &[1, 2, 3],
                );
            }
        }
    }
}

async fn purchases(period: ReportPeriod, date: NaiveDate, ctx: &Context) -> Result<()> {
    let client = ctx.authed_client()?;
    let spinner = ctx.output.spinner("Fetching purchase report...");
    let result = client.purchase_report(period, date).await;
    spinner.finish_and_clear();
    let report = result.context("Failed to fetch purchase report")?;

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    ctx.output.header(&format!("Purchases, {} ({})", period, date));
    ctx.output.kv("transactions", &report.transaction_count().to_string());
    ctx.output.kv("expenditure", &money(&report.expenditure()));
    ctx.output.info("");

    if report.row_count() == 0 {
        ctx.output.info("No purchases in this period.");
        return Ok(());
    }
    print_purchase_rows(&report, ctx);
    Ok(())
}

fn print_purchase_rows(report: &PurchaseReport, ctx: &Context) {
    let widths = [20, 12, 16];
    if !report.items_purchasing.is_empty() {
        ctx.output.table_row(&["TRANSACTION", "TIME", "AMOUNT"], &widths, &[2]);
        ctx.output.table_rule(&widths);
        for row in &report.items_purchasing {
            let amount = money(&row.purchases);
            ctx.output
                .table_row(&[&row.no_transaction, &row.time, &amount], &widths, &[2]);
        }
    }
    if !report.daily_data.is_empty() {
        ctx.output.table_row(&["DATE", "PURCHASES", "AMOUNT"], &widths, &[1, 2]);
        ctx.output.table_rule(&widths);
        for row in &report.daily_data {
            let count = row.total_transaction.to_string();
            let amount = money(&row.expenditure);
            ctx.output
                .table_row(&[&row.date, &count, &amount], &widths, &[1, 2]);
        }
    }
    if !report.monthly_purchases.is_empty() {
        ctx.output.table_row(&["MONTH", "PURCHASES", "AMOUNT"], &widths, &[1, 2]);
        ctx.output.table_rule(&widths);
        for row in &report.monthly_purchases {
            let month = format!("{} {}", row.month_name, row.year);
            let count = row.total_transaction.to_string();
            let amount = money(&row.total_expenditure);
            ctx.output
                .table_row(&[&month, &count, &amount], &widths, &[1, 2]);
        }
    }
}

/// Horizontal bars scaled to the largest income.
fn chart_lines(points: &[ChartPoint], width: usize) -> Vec<String> {
    let max = points
        .iter()
        .map(|p| p.income.amount_minor)
        .max()
        .unwrap_or(0)
        .max(1);
    points
        .iter()
        .map(|p| {
            let len = bar_len(p.income, max, width);
            format!(
                "{:<12} {:<width$} {} (profit {})",
                p.label,
                "#".repeat(len),
                money(&p.income),
                money(&p.profit),
                width = width
            )
        })
        .collect()
}

fn bar_len(value: Money, max: i64, width: usize) -> usize {
    if value.amount_minor <= 0 {
        return 0;
    }
    let scaled = (value.amount_minor as i128 * width as i128) / max as i128;
    (scaled as usize).clamp(1, width)
}
