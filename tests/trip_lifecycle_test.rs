mod common;

use axum::http::{Method, StatusCode};
use common::{decimal, id_of, response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn requests_without_user_scope_are_rejected() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/trips", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert_eq!(body["error"], json!("Unauthorized"));
    assert!(body["message"].as_str().unwrap_or_default().contains("x-user-id"));
}

#[tokio::test]
async fn trip_balance_tracks_charges_and_accounts() {
    let app = TestApp::new().await;
    let fleet = app.seed_fleet().await;

    let trip = app
        .create_trip(&fleet, "T-100", fleet.own_truck, "25000", "2024-01-05T08:00:00Z")
        .await;
    let trip_id = id_of(&trip);
    assert_eq!(decimal(&trip["balance"]["balance"]), dec!(25000));

    app.create(
        &format!("/api/v1/trips/{}/charges", trip_id),
        json!({ "expense_type": "loading charges", "amount": "500", "party_bill": true }),
    )
    .await;
    let deduction = app
        .create(
            &format!("/api/v1/trips/{}/charges", trip_id),
            json!({ "expense_type": "TDS", "amount": "250", "party_bill": false }),
        )
        .await;
    assert_eq!(deduction["expense_type"], json!("TDS"));

    app.create(
        &format!("/api/v1/trips/{}/accounts", trip_id),
        json!({ "amount": "10000", "account_type": "Advances", "payment_type": "Cash" }),
    )
    .await;

    let balance = app
        .call_json(
            Method::GET,
            &format!("/api/v1/trips/{}/balance", trip_id),
            None,
            StatusCode::OK,
        )
        .await;
    // (25000 + 500) - (10000 + 250)
    assert_eq!(decimal(&balance["data"]["balance"]), dec!(15250));
    assert_eq!(decimal(&balance["data"]["charge_to_bill"]), dec!(500));
    assert_eq!(decimal(&balance["data"]["charge_not_to_bill"]), dec!(250));
    assert_eq!(decimal(&balance["data"]["account_balance"]), dec!(10000));

    let detail = app
        .call_json(Method::GET, &format!("/api/v1/trips/{}", trip_id), None, StatusCode::OK)
        .await;
    assert_eq!(detail["data"]["charges"].as_array().map(Vec::len), Some(2));
    assert_eq!(detail["data"]["accounts"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn unknown_charge_type_is_rejected() {
    let app = TestApp::new().await;
    let fleet = app.seed_fleet().await;
    let trip = app
        .create_trip(&fleet, "T-101", fleet.own_truck, "1000", "2024-01-05T08:00:00Z")
        .await;

    let response = app
        .call(
            Method::POST,
            &format!("/api/v1/trips/{}/charges", id_of(&trip)),
            Some(json!({ "expense_type": "Toll Bribes", "amount": "10", "party_bill": true })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn out_of_range_amounts_are_rejected_before_reaching_the_ledger() {
    let app = TestApp::new().await;
    let fleet = app.seed_fleet().await;
    let near_max = "79228162514264337593543950335";

    let response = app
        .call(
            Method::POST,
            "/api/v1/trips",
            Some(json!({
                "trip_id": "T-900",
                "truck_id": fleet.own_truck,
                "driver_id": fleet.driver,
                "party_id": fleet.party,
                "route_from": "Hosur",
                "route_to": "Vellore",
                "amount": near_max,
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let trip = app
        .create_trip(&fleet, "T-901", fleet.own_truck, "1000000000000", "2024-01-05T08:00:00Z")
        .await;
    let trip_id = id_of(&trip);

    let response = app
        .call(
            Method::POST,
            &format!("/api/v1/trips/{}/charges", trip_id),
            Some(json!({ "expense_type": "Loading Charges", "amount": near_max, "party_bill": true })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .call(
            Method::POST,
            &format!("/api/v1/trips/{}/accounts", trip_id),
            Some(json!({ "amount": format!("-{}", near_max), "account_type": "Payments", "payment_type": "Cash" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .call(
            Method::POST,
            "/api/v1/expenses",
            Some(json!({
                "category": "Office",
                "expense_type": "Rent",
                "amount": near_max,
                "payment_mode": "Cash",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let balance = app
        .call_json(
            Method::GET,
            &format!("/api/v1/trips/{}/balance", trip_id),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(decimal(&balance["data"]["balance"]), dec!(1000000000000));
}

#[tokio::test]
async fn status_walks_forward_and_back_and_settled_trips_are_frozen() {
    let app = TestApp::new().await;
    let fleet = app.seed_fleet().await;
    let trip = app
        .create_trip(&fleet, "T-200", fleet.own_truck, "18000", "2024-02-01T06:00:00Z")
        .await;
    let trip_id = id_of(&trip);
    assert_eq!(trip["status"], json!(0));

    let driver_uri = format!("/api/v1/drivers/{}", fleet.driver);
    let driver = app.call_json(Method::GET, &driver_uri, None, StatusCode::OK).await;
    assert_eq!(driver["data"]["status"], json!("On Trip"));

    let advance_uri = format!("/api/v1/trips/{}/advance", trip_id);
    let completed = app.call_json(Method::POST, &advance_uri, None, StatusCode::OK).await;
    assert_eq!(completed["data"]["status"], json!(1));
    assert!(!completed["data"]["completed_date"].is_null());

    let driver = app.call_json(Method::GET, &driver_uri, None, StatusCode::OK).await;
    assert_eq!(driver["data"]["status"], json!("Available"));

    for expected in [2, 3, 4] {
        let moved = app.call_json(Method::POST, &advance_uri, None, StatusCode::OK).await;
        assert_eq!(moved["data"]["status"], json!(expected));
    }

    let response = app.call(Method::POST, &advance_uri, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .call(
            Method::POST,
            &format!("/api/v1/trips/{}/charges", trip_id),
            Some(json!({ "expense_type": "Union Charges", "amount": "100", "party_bill": true })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let undo_uri = format!("/api/v1/trips/{}/undo", trip_id);
    let reopened = app.call_json(Method::POST, &undo_uri, None, StatusCode::OK).await;
    assert_eq!(reopened["data"]["status"], json!(3));
    assert!(reopened["data"]["settlement_date"].is_null());

    app.create(
        &format!("/api/v1/trips/{}/charges", trip_id),
        json!({ "expense_type": "Union Charges", "amount": "100", "party_bill": true }),
    )
    .await;
}

#[tokio::test]
async fn duplicate_trip_ids_conflict() {
    let app = TestApp::new().await;
    let fleet = app.seed_fleet().await;
    app.create_trip(&fleet, "T-300", fleet.own_truck, "1000", "2024-03-01T00:00:00Z")
        .await;

    let response = app
        .call(
            Method::POST,
            "/api/v1/trips",
            Some(json!({
                "trip_id": "T-300",
                "truck_id": fleet.own_truck,
                "driver_id": fleet.driver,
                "party_id": fleet.party,
                "route_from": "Salem",
                "route_to": "Madurai",
                "amount": "2000",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn market_trip_profit_subtracts_hire_cost() {
    let app = TestApp::new().await;
    let fleet = app.seed_fleet().await;
    let trip = app
        .create_trip(&fleet, "T-400", fleet.market_truck, "30000", "2024-01-10T00:00:00Z")
        .await;
    assert_eq!(trip["supplier_id"], json!(fleet.supplier));

    let profit = app
        .call_json(
            Method::GET,
            &format!("/api/v1/trips/{}/profit", id_of(&trip)),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(profit["data"]["ownership"], json!("Market"));
    assert_eq!(decimal(&profit["data"]["profit"]), dec!(15000));
}

#[tokio::test]
async fn invoice_and_party_statement_roll_up_balances() {
    let app = TestApp::new().await;
    let fleet = app.seed_fleet().await;
    let first = app
        .create_trip(&fleet, "T-500", fleet.own_truck, "10000", "2024-04-01T00:00:00Z")
        .await;
    let second = app
        .create_trip(&fleet, "T-501", fleet.own_truck, "12000", "2024-04-02T00:00:00Z")
        .await;
    app.create(
        &format!("/api/v1/trips/{}/accounts", id_of(&second)),
        json!({ "amount": "2000", "account_type": "Payments", "payment_type": "Online Transfer" }),
    )
    .await;

    let invoice = app
        .call_json(
            Method::POST,
            "/api/v1/trips/invoice",
            Some(json!({ "trip_ids": [id_of(&first), id_of(&second)] })),
            StatusCode::OK,
        )
        .await;
    assert_eq!(invoice["data"]["lines"].as_array().map(Vec::len), Some(2));
    assert_eq!(decimal(&invoice["data"]["total_freight"]), dec!(22000));
    assert_eq!(decimal(&invoice["data"]["total_received"]), dec!(2000));
    assert_eq!(decimal(&invoice["data"]["total_balance"]), dec!(20000));

    let statement = app
        .call_json(
            Method::GET,
            &format!("/api/v1/parties/{}/balance", fleet.party),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(statement["data"]["trip_count"], json!(2));
    assert_eq!(decimal(&statement["data"]["total_balance"]), dec!(20000));

    let other_party = app
        .create("/api/v1/parties", json!({ "name": "Zenith Steel" }))
        .await;
    let third = app
        .create(
            "/api/v1/trips",
            json!({
                "trip_id": "T-502",
                "truck_id": fleet.own_truck,
                "driver_id": fleet.driver,
                "party_id": other_party["id"],
                "route_from": "Trichy",
                "route_to": "Erode",
                "amount": "5000",
            }),
        )
        .await;

    let response = app
        .call(
            Method::POST,
            "/api/v1/trips/invoice",
            Some(json!({ "trip_ids": [id_of(&first), id_of(&third)] })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trips_are_scoped_to_their_owner() {
    let app = TestApp::new().await;
    let fleet = app.seed_fleet().await;
    let trip = app
        .create_trip(&fleet, "T-600", fleet.own_truck, "9000", "2024-05-01T00:00:00Z")
        .await;

    let stranger = Uuid::new_v4();
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/trips/{}", id_of(&trip)),
            None,
            Some(stranger),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let listed = app
        .request(Method::GET, "/api/v1/trips", None, Some(stranger))
        .await;
    let body = response_json(listed).await;
    assert_eq!(body["data"]["total"], json!(0));
}

#[tokio::test]
async fn deleting_a_trip_removes_it_and_frees_the_truck() {
    let app = TestApp::new().await;
    let fleet = app.seed_fleet().await;
    let trip = app
        .create_trip(&fleet, "T-700", fleet.own_truck, "4000", "2024-06-01T00:00:00Z")
        .await;
    let trip_uri = format!("/api/v1/trips/{}", id_of(&trip));
    app.create(
        &format!("{}/charges", trip_uri),
        json!({ "expense_type": "Weight Charges", "amount": "80", "party_bill": true }),
    )
    .await;

    let truck_uri = format!("/api/v1/trucks/{}", fleet.own_truck);
    let response = app.call(Method::DELETE, &truck_uri, None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.call(Method::DELETE, &trip_uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.call(Method::GET, &trip_uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.call(Method::DELETE, &truck_uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
