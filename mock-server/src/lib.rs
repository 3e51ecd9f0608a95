use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub customer_id: u64,
    pub total_cents: u64,
}

#[derive(Deserialize)]
pub struct CreateCustomer {
    pub name: String,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateOrder {
    pub total_cents: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
    pub since_id: Option<u64>,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    customers: BTreeMap<u64, Customer>,
    orders: BTreeMap<u64, Order>,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/customers", get(list_customers).post(create_customer))
        .route(
            "/api/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route(
            "/api/customers/{id}/orders",
            get(list_orders).post(create_order),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_customers(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Customer>> {
    let store = db.read().await;
    let since = params.since_id.unwrap_or(0);
    let customers = store
        .customers
        .values()
        .filter(|c| c.id > since)
        .take(params.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Json(customers)
}

async fn create_customer(
    State(db): State<Db>,
    Json(input): Json<CreateCustomer>,
) -> (StatusCode, Json<Customer>) {
    let mut store = db.write().await;
    let customer = Customer {
        id: store.next_id(),
        name: input.name,
        email: input.email,
    };
    store.customers.insert(customer.id, customer.clone());
    (StatusCode::CREATED, Json(customer))
}

async fn get_customer(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Customer>, StatusCode> {
    let store = db.read().await;
    store.customers.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_customer(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateCustomer>,
) -> Result<Json<Customer>, StatusCode> {
    let mut store = db.write().await;
    let customer = store.customers.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        customer.name = name;
    }
    if let Some(email) = input.email {
        customer.email = Some(email);
    }
    Ok(Json(customer.clone()))
}

async fn delete_customer(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.customers.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    store.orders.retain(|_, order| order.customer_id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_orders(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<Order>>, StatusCode> {
    let store = db.read().await;
    if !store.customers.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let orders = store
        .orders
        .values()
        .filter(|o| o.customer_id == id)
        .cloned()
        .collect();
    Ok(Json(orders))
}

async fn create_order(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<CreateOrder>,
) -> Result<(StatusCode, Json<Order>), StatusCode> {
    let mut store = db.write().await;
    if !store.customers.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let order = Order {
        id: store.next_id(),
        customer_id: id,
        total_cents: input.total_cents,
    };
    store.orders.insert(order.id, order.clone());
    Ok((StatusCode::CREATED, Json(order)))
}
