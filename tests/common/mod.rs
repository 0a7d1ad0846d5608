#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use fleetbook_api::{
    config::AppConfig,
    db::{self, DbConfig},
    handlers::{scope::USER_ID_HEADER, AppServices},
    logging, AppState,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up the full router backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub user: Uuid,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // Every pooled connection to `sqlite::memory:` is its own database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_with_config(&DbConfig::from(&cfg))
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let services = AppServices::new(db_arc.clone(), &logging::discard_logger());
        let state = AppState {
            db: db_arc,
            config: cfg,
            services,
        };

        Self {
            router: fleetbook_api::app_router(state.clone()),
            state,
            user: Uuid::new_v4(),
        }
    }

    /// Send a request, optionally scoped to a user.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        user: Option<Uuid>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.to_string());
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Request scoped to the default test user.
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> axum::response::Response {
        self.request(method, uri, body, Some(self.user)).await
    }

    /// Request scoped to the default user, asserting the status and returning the JSON body.
    pub async fn call_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        expected: StatusCode,
    ) -> Value {
        let response = self.call(method.clone(), uri, body).await;
        let status = response.status();
        let json = response_json(response).await;
        assert_eq!(status, expected, "{} {} returned {}", method, uri, json);
        json
    }

    pub async fn create(&self, uri: &str, body: Value) -> Value {
        self.call_json(Method::POST, uri, Some(body), StatusCode::CREATED)
            .await["data"]
            .clone()
    }

    pub async fn seed_fleet(&self) -> SeededFleet {
        let supplier = self
            .create("/api/v1/suppliers", json!({ "name": "Highway Hirers" }))
            .await;
        let own_truck = self
            .create(
                "/api/v1/trucks",
                json!({ "truck_no": "TN01AB1111", "ownership": "Self" }),
            )
            .await;
        let market_truck = self
            .create(
                "/api/v1/trucks",
                json!({
                    "truck_no": "TN02CD2222",
                    "ownership": "Market",
                    "supplier_id": supplier["id"],
                }),
            )
            .await;
        let driver = self
            .create(
                "/api/v1/drivers",
                json!({ "name": "Murugan", "contact_number": "9840012345" }),
            )
            .await;
        let party = self
            .create("/api/v1/parties", json!({ "name": "Acme Cements" }))
            .await;

        SeededFleet {
            supplier: id_of(&supplier),
            own_truck: id_of(&own_truck),
            market_truck: id_of(&market_truck),
            driver: id_of(&driver),
            party: id_of(&party),
        }
    }

    pub async fn create_trip(&self, fleet: &SeededFleet, trip_id: &str, truck: Uuid, amount: &str, start: &str) -> Value {
        let market = truck == fleet.market_truck;
        self.create(
            "/api/v1/trips",
            json!({
                "trip_id": trip_id,
                "truck_id": truck,
                "driver_id": fleet.driver,
                "party_id": fleet.party,
                "route_from": "Chennai",
                "route_to": "Coimbatore",
                "amount": amount,
                "truck_hire_cost": if market { Some("15000") } else { None },
                "start_date": start,
            }),
        )
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SeededFleet {
    pub supplier: Uuid,
    pub own_truck: Uuid,
    pub market_truck: Uuid,
    pub driver: Uuid,
    pub party: Uuid,
}

pub fn id_of(value: &Value) -> Uuid {
    value["id"]
        .as_str()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .unwrap_or_else(|| panic!("missing id in {}", value))
}

/// Decimals serialize as strings; accept plain numbers too.
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(raw) => Decimal::from_str(raw).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("expected a decimal, got {}", other),
    }
}

pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = read_body(response).await;
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    }
}

pub async fn response_text(response: axum::response::Response) -> String {
    String::from_utf8(read_body(response).await).expect("utf-8 body")
}

async fn read_body(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body")
        .to_vec()
}
