//! API client tests against a mock server.
//!
//! Run with: `cargo test -p kasir-client --test api_tests`

use chrono::NaiveDate;
use kasir_client::{checkout, ApiClient, CheckoutError, ClientConfig, ClientError, Session, User};
use kasir_core::cart::SaleCart;
use kasir_core::catalog::CategoryInput;
use kasir_core::ids::{CategoryId, ProductId, TransactionRef};
use kasir_core::money::Money;
use kasir_core::report::ReportPeriod;
use mockito::{Matcher, Server};
use serde_json::json;

// ============================================================================
// Test Helpers
// ============================================================================

fn anonymous_client(server: &Server) -> ApiClient {
    ApiClient::new(ClientConfig::new(server.url())).expect("client")
}

fn test_client(server: &Server) -> ApiClient {
    let user: User = serde_json::from_value(json!({"name": "Nay", "email": "nay@example.com"})).unwrap();
    anonymous_client(server).with_session(Session::new("test-token", user))
}

fn products_body() -> String {
    json!({
        "status": true,
        "message": "ok",
        "data": [
            {"id": 1, "uuid": "p-kopi", "name": "Kopi", "barcode": "111", "selling_price": "10000.00", "purchase_price": "7000.00", "stock": 5},
            {"id": 2, "uuid": "p-teh", "name": "Teh", "barcode": null, "selling_price": "5000.00", "purchase_price": "3000.00", "stock": "12"}
        ]
    })
    .to_string()
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_login_stores_session() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/login")
        .match_body(Matcher::Json(json!({"email": "nay@example.com", "password": "pw"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"status": true, "message": "Login berhasil", "data": {"token": "abc", "user": {"id": 1, "name": "Nay", "email": "nay@example.com"}}})
                .to_string(),
        )
        .create_async()
        .await;

    let mut client = anonymous_client(&server);
    let session = client.login("nay@example.com", "pw").await.unwrap();

    mock.assert_async().await;
    assert_eq!(session.token(), "abc");
    assert_eq!(client.session().map(|s| s.user.name.as_str()), Some("Nay"));
}

#[tokio::test]
async fn test_login_failure_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/login")
        .with_status(200)
        .with_body(json!({"status": false, "message": "Email atau password salah"}).to_string())
        .create_async()
        .await;

    let mut client = anonymous_client(&server);
    match client.login("x@example.com", "bad").await {
        Err(ClientError::Api { message, .. }) => assert_eq!(message, "Email atau password salah"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_session_even_when_rejected() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/logout")
        .match_header("authorization", "Bearer test-token")
        .with_status(401)
        .with_body(json!({"message": "Unauthenticated."}).to_string())
        .create_async()
        .await;

    let mut client = test_client(&server);
    client.logout().await.unwrap();

    mock.assert_async().await;
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_check_auth() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/check-auth")
        .with_status(401)
        .with_body("{}")
        .create_async()
        .await;

    assert!(!test_client(&server).check_auth().await.unwrap());
}

#[tokio::test]
async fn test_calls_without_session_are_unauthenticated() {
    let server = Server::new_async().await;
    let client = anonymous_client(&server);
    assert!(matches!(client.list_products().await, Err(ClientError::Unauthenticated)));
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_list_products() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/products")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(products_body())
        .create_async()
        .await;

    let products = test_client(&server).list_products().await.unwrap();

    mock.assert_async().await;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].selling_price, Money::idr(10000));
    assert_eq!(products[1].stock, 12);
    assert_eq!(products[1].barcode, None);
}

#[tokio::test]
async fn test_find_product_by_barcode() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/products")
        .with_status(200)
        .with_body(products_body())
        .create_async()
        .await;

    let found = test_client(&server).find_product("111").await.unwrap();
    assert_eq!(found.map(|p| p.uuid), Some(ProductId::new("p-kopi")));
}

#[tokio::test]
async fn test_malformed_product_listing() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/products")
        .with_status(200)
        .with_body(json!({"status": true, "data": [{"id": 1, "uuid": "p", "name": "X", "selling_price": "mahal"}]}).to_string())
        .create_async()
        .await;

    let result = test_client(&server).list_products().await;
    assert!(matches!(result, Err(ClientError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_product_image_bytes() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/products/images/p-kopi")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body([0x89u8, b'P', b'N', b'G'])
        .create_async()
        .await;

    let bytes = test_client(&server)
        .product_image(&ProductId::new("p-kopi"))
        .await
        .unwrap();
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_category_crud() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/api/category")
        .match_body(Matcher::Json(json!({"name": "Minuman"})))
        .with_status(201)
        .with_body(json!({"status": true, "message": "Kategori ditambahkan"}).to_string())
        .create_async()
        .await;
    let rename = server
        .mock("PUT", "/api/category/cat-1")
        .match_body(Matcher::Json(json!({"name": "Makanan"})))
        .with_status(200)
        .with_body(json!({"status": true, "message": "Kategori diperbarui"}).to_string())
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/category/cat-1")
        .with_status(200)
        .with_body(json!({"status": true, "message": "Kategori dihapus"}).to_string())
        .create_async()
        .await;

    let client = test_client(&server);
    let id = CategoryId::new("cat-1");
    assert_eq!(
        client.create_category(&CategoryInput::new("Minuman")).await.unwrap(),
        "Kategori ditambahkan"
    );
    client.update_category(&id, &CategoryInput::new("Makanan")).await.unwrap();
    client.delete_category(&id).await.unwrap();

    create.assert_async().await;
    rename.assert_async().await;
    delete.assert_async().await;
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_submits_and_clears_cart() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/products")
        .with_status(200)
        .with_body(products_body())
        .create_async()
        .await;
    let submit = server
        .mock("POST", "/api/transaction")
        .match_body(Matcher::Json(json!({
            "transaction": {"cash": 25000, "items": [{"id_product": 1, "quantity": 2}]}
        })))
        .with_status(201)
        .with_body(json!({"status": true, "message": "Transaksi berhasil", "data": {"no_transaction": "TRX-0001"}}).to_string())
        .create_async()
        .await;

    let client = test_client(&server);
    let products = client.list_products().await.unwrap();
    let mut cart = SaleCart::new();
    cart.add(&products[0].snapshot());
    cart.add(&products[0].snapshot());

    let result = checkout(&client, &mut cart, "25000").await.unwrap();

    submit.assert_async().await;
    assert_eq!(result.change, Money::idr(5000));
    assert_eq!(result.transaction, TransactionRef::new("TRX-0001"));
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_checkout_server_rejection_keeps_cart() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/products")
        .with_status(200)
        .with_body(products_body())
        .create_async()
        .await;
    server
        .mock("POST", "/api/transaction")
        .with_status(422)
        .with_body(json!({"status": false, "message": "Stok Kopi tidak mencukupi"}).to_string())
        .create_async()
        .await;

    let client = test_client(&server);
    let products = client.list_products().await.unwrap();
    let mut cart = SaleCart::new();
    cart.add(&products[0].snapshot());

    match checkout(&client, &mut cart, "10000").await {
        Err(CheckoutError::SubmissionFailed { message, .. }) => {
            assert_eq!(message, "Stok Kopi tidak mencukupi")
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(cart.len(), 1);
}

#[tokio::test]
async fn test_invoice() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/invoices/TRX-0001")
        .with_status(200)
        .with_body(
            json!({"status": true, "data": {
                "no_transaction": "TRX-0001", "date": "14-10-2026", "time": "10:00",
                "items": [{"name": "Kopi", "quantity": 2, "item_price": 10000, "total_price": 20000}],
                "total_payment": 20000, "cash": 25000
            }})
            .to_string(),
        )
        .create_async()
        .await;

    let invoice = test_client(&server)
        .invoice(&TransactionRef::new("TRX-0001"))
        .await
        .unwrap();
    assert_eq!(invoice.change(), Some(Money::idr(5000)));
    assert!(invoice.receipt().render("Toko", 32).contains("Kembali:"));
}

// ============================================================================
// Reports
// ============================================================================

#[tokio::test]
async fn test_sales_overview_falls_back_per_period() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/sales/daily/2026-10-14")
        .with_status(200)
        .with_body(json!({"status": true, "data": {"total_transactions": 3, "total_revenue": "30000", "transactions": []}}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/api/sales/monthly/2026-10-14")
        .with_status(500)
        .with_body(json!({"message": "Server Error"}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/api/sales/yearly/2026-10-14")
        .with_status(200)
        .with_body(json!({"status": true, "data": {"total_income": 90000, "transactions": [
            {"month_num": 10, "date": "Oktober", "total_transaction_permonth": 3, "income": 90000, "profit": 15000}
        ]}}).to_string())
        .create_async()
        .await;

    let date = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
    let overview = test_client(&server).sales_overview(date).await;

    assert_eq!(overview.daily.total_transactions, 3);
    assert!(overview.monthly.is_empty());
    assert_eq!(overview.yearly.transactions[0].transaction_count, 3);
    assert_eq!(overview.chart(ReportPeriod::Monthly)[0].profit, Money::idr(15000));
}

#[tokio::test]
async fn test_purchase_report() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/purchases/daily/2026-10-14")
        .with_status(200)
        .with_body(json!({"status": true, "data": {
            "total_transaction": 1, "total_expenditure": "70000",
            "items_purchasing": [{"time": "08:00", "no_transaction": "PUR-1", "purchases": "70000"}]
        }}).to_string())
        .create_async()
        .await;

    let date = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
    let report = test_client(&server)
        .purchase_report(ReportPeriod::Daily, date)
        .await
        .unwrap();
    assert_eq!(report.transaction_count(), 1);
    assert_eq!(report.items_purchasing[0].purchases, Money::idr(70000));
}
