//! Transactions, invoices and reports.

use crate::client::ApiClient;
use crate::error::Result;
use chrono::NaiveDate;
use futures::future::join3;
use kasir_core::checkout::{RestockPayload, TransactionPayload};
use kasir_core::ids::TransactionRef;
use kasir_core::receipt::Invoice;
use kasir_core::report::{PurchaseReport, ReportPeriod, SalesOverview, SalesReport};
use reqwest::Method;
use serde::Deserialize;
use tracing::warn;

#[derive(Deserialize)]
struct TransactionCreated {
    no_transaction: TransactionRef,
}

impl ApiClient {
    /// `POST /api/transaction`. Returns the reference the server assigned.
    pub async fn submit_transaction(&self, payload: &TransactionPayload) -> Result<TransactionRef> {
        let req = self
            .request(Method::POST, "/api/transaction", true)?
            .json(&payload.to_request());
        let created: TransactionCreated = self.send(req).await?.data()?;
        Ok(created.no_transaction)
    }

    /// `POST /api/products/purchase/existing`.
    pub async fn submit_restock(&self, payload: &RestockPayload) -> Result<String> {
        let req = self
            .request(Method::POST, "/api/products/purchase/existing", true)?
            .json(payload);
        self.send(req).await?.ack()
    }

    /// `GET /api/invoices/{no}`.
    pub async fn invoice(&self, no_transaction: &TransactionRef) -> Result<Invoice> {
        let path = format!("/api/invoices/{}", no_transaction);
        let req = self.request(Method::GET, &path, true)?;
        self.send(req).await?.data()
    }

    /// `GET /api/sales/{period}/{date}`.
    pub async fn sales_report(&self, period: ReportPeriod, date: NaiveDate) -> Result<SalesReport> {
        let path = format!("/api/sales/{}", period.path_segment(date));
        let req = self.request(Method::GET, &path, true)?;
        self.send(req).await?.data()
    }

    /// Daily, monthly and yearly sales fetched concurrently.
    ///
    /// A period whose request fails is reported empty rather than failing
    /// the whole overview.
    pub async fn sales_overview(&self, date: NaiveDate) -> SalesOverview {
        let (daily, monthly, yearly) = join3(
            self.sales_report_or_empty(ReportPeriod::Daily, date),
            self.sales_report_or_empty(ReportPeriod::Monthly, date),
            self.sales_report_or_empty(ReportPeriod::Yearly, date),
        )
        .await;
        SalesOverview {
            daily,
            monthly,
            yearly,
        }
    }

    async fn sales_report_or_empty(&self, period: ReportPeriod, date: NaiveDate) -> SalesReport {
        match self.sales_report(period, date).await {
            Ok(report) => report,
            Err(e) => {
                warn!(%period, error = %e, "sales report unavailable, showing empty");
                SalesReport::empty()
            }
        }
    }

    /// `GET /api/purchases/{period}/{date}`.
    pub async fn purchase_report(&self, period: ReportPeriod, date: NaiveDate) -> Result<PurchaseReport> {
        let path = format!("/api/purchases/{}", period.path_segment(date));
        let req = self.request(Method::GET, &path, true)?;
        self.send(req).await?.data()
    }
}
