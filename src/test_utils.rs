//! In-memory stand-ins for the Postgres repositories and the Redis cache,
//! plus a fully wired application for HTTP-level tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;

use crate::AppState;
use crate::cache::keys::{BLACKLIST_MARKER, blacklist_key, otp_key};
use crate::cache::{CacheResult, SessionCache};
use crate::config::Config;
use crate::database::models::{
    Category, CategoryInput, Employee, EmployeeInput, NewUser, Order, OrderDetail,
    OrderDetailInput, OrderInput, OrderWithDetails, Product, ProductInput, UserEntity,
};
use crate::database::{CrudRepository, DbError, DbResult, Page, ProductSearch, UserRepository};
use crate::router::build_router;
use crate::services::AuthService;
use crate::utils::TokenIssuer;

pub const TEST_BCRYPT_COST: u32 = 4;

fn page_of<T: Clone>(rows: &[T], page: Page) -> Vec<T> {
    rows.iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<UserEntity>>,
}

impl InMemoryUserRepository {
    pub fn remove(&self, user_id: i32) {
        self.users.lock().unwrap().retain(|u| u.user_id != user_id);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_identifier(&self, identifier: &str) -> DbResult<Option<UserEntity>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.username == identifier || u.email == identifier)
            .cloned())
    }

    async fn find_by_id(&self, user_id: i32) -> DbResult<Option<UserEntity>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserEntity>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn username_exists(&self, username: &str) -> DbResult<bool> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> DbResult<bool> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|u| u.email == email))
    }

    async fn create(&self, user: NewUser) -> DbResult<UserEntity> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(DbError::UniqueViolation {
                constraint: Some("users_username_key".into()),
            });
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(DbError::UniqueViolation {
                constraint: Some("users_email_key".into()),
            });
        }

        let now = Utc::now();
        let entity = UserEntity {
            user_id: users.iter().map(|u| u.user_id).max().unwrap_or(0) + 1,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: true,
            employee_id: user.employee_id,
            created_at: now,
            updated_at: now,
        };
        users.push(entity.clone());
        Ok(entity)
    }

    async fn update_password(&self, user_id: i32, password_hash: &str) -> DbResult<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or(DbError::NotFound)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }
}

/// Expiring key-value map keyed exactly like the Redis implementation.
#[derive(Default)]
pub struct InMemorySessionCache {
    entries: Mutex<HashMap<String, (String, Instant, Duration)>>,
}

impl InMemorySessionCache {
    fn live(&self, key: &str) -> Option<(String, Duration)> {
        let mut entries = self.entries.lock().unwrap();
        let (value, stored_at, ttl) = entries.get(key)?.clone();
        if stored_at.elapsed() < ttl {
            return Some((value, ttl));
        }
        entries.remove(key);
        None
    }

    fn put(&self, key: String, value: &str, ttl: Duration) {
        self.entries
            .lock()
            .unwrap()
            .insert(key, (value.to_string(), Instant::now(), ttl));
    }

    /// TTL the token was blacklisted with, if it is still blacklisted.
    pub fn ttl_of(&self, token: &str) -> Option<Duration> {
        self.live(&blacklist_key(token)).map(|(_, ttl)| ttl)
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn blacklist_token(&self, token: &str, ttl: Duration) -> CacheResult<()> {
        if !ttl.is_zero() {
            self.put(blacklist_key(token), BLACKLIST_MARKER, ttl);
        }
        Ok(())
    }

    async fn is_blacklisted(&self, token: &str) -> CacheResult<bool> {
        Ok(self.live(&blacklist_key(token)).is_some())
    }

    async fn store_otp(&self, email: &str, otp: &str, ttl: Duration) -> CacheResult<()> {
        self.put(otp_key(email), otp, ttl);
        Ok(())
    }

    async fn get_otp(&self, email: &str) -> CacheResult<Option<String>> {
        Ok(self.live(&otp_key(email)).map(|(value, _)| value))
    }

    async fn remove_otp(&self, email: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(&otp_key(email));
        Ok(())
    }
}

/// A single-table row the generic in-memory repository can store.
pub trait Row: Clone + Send + Sync + 'static {
    type Input: Send + Sync;

    fn id(&self) -> i32;

    fn build(id: i32, input: &Self::Input) -> Self;
}

impl Row for Category {
    type Input = CategoryInput;

    fn id(&self) -> i32 {
        self.category_id
    }

    fn build(id: i32, input: &CategoryInput) -> Self {
        Category {
            category_id: id,
            category_name: input.category_name.clone(),
            description: input.description.clone(),
        }
    }
}

impl Row for Employee {
    type Input = EmployeeInput;

    fn id(&self) -> i32 {
        self.employee_id
    }

    fn build(id: i32, input: &EmployeeInput) -> Self {
        let input = input.clone();
        Employee {
            employee_id: id,
            last_name: input.last_name,
            first_name: input.first_name,
            title: input.title,
            title_of_courtesy: input.title_of_courtesy,
            birth_date: input.birth_date,
            hire_date: input.hire_date,
            address: input.address,
            city: input.city,
            region: input.region,
            postal_code: input.postal_code,
            country: input.country,
            home_phone: input.home_phone,
            extension: input.extension,
            notes: input.notes,
            reports_to: input.reports_to,
            photo_path: input.photo_path,
        }
    }
}

impl Row for Product {
    type Input = ProductInput;

    fn id(&self) -> i32 {
        self.product_id
    }

    fn build(id: i32, input: &ProductInput) -> Self {
        Product {
            product_id: id,
            product_name: input.product_name.clone(),
            supplier_id: input.supplier_id,
            category_id: input.category_id,
            quantity_per_unit: input.quantity_per_unit.clone(),
            unit_price: input.unit_price,
            units_in_stock: input.units_in_stock,
            units_on_order: input.units_on_order,
            reorder_level: input.reorder_level,
            discontinued: input.discontinued,
        }
    }
}

pub struct InMemoryRepository<R> {
    rows: Mutex<Vec<R>>,
}

impl<R> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<R: Row> CrudRepository for InMemoryRepository<R> {
    type Entity = R;
    type Detail = R;
    type Input = R::Input;

    async fn list(&self, page: Page) -> DbResult<(Vec<R>, i64)> {
        let rows = self.rows.lock().unwrap();
        Ok((page_of(&rows, page), rows.len() as i64))
    }

    async fn get(&self, id: i32) -> DbResult<R> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn create(&self, input: &R::Input) -> DbResult<R> {
        let mut rows = self.rows.lock().unwrap();
        let row = R::build(rows.iter().map(Row::id).max().unwrap_or(0) + 1, input);
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i32, input: &R::Input) -> DbResult<R> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(DbError::NotFound)?;
        *slot = R::build(id, input);
        Ok(slot.clone())
    }

    async fn delete(&self, id: i32) -> DbResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        if rows.len() == before {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ProductSearch for InMemoryRepository<Product> {
    async fn search_by_name(&self, name: &str, page: Page) -> DbResult<(Vec<Product>, i64)> {
        let needle = name.to_lowercase();
        let rows = self.rows.lock().unwrap();
        let matches: Vec<Product> = rows
            .iter()
            .filter(|p| p.product_name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok((page_of(&matches, page), matches.len() as i64))
    }
}

fn order_from(input: &OrderInput, order_id: i32) -> Order {
    Order {
        order_id,
        customer_id: input.customer_id.clone(),
        employee_id: input.employee_id,
        order_date: input.order_date,
        required_date: input.required_date,
        shipped_date: input.shipped_date,
        ship_via: input.ship_via,
        freight: input.freight,
        ship_name: input.ship_name.clone(),
        ship_address: input.ship_address.clone(),
        ship_city: input.ship_city.clone(),
        ship_region: input.ship_region.clone(),
        ship_postal_code: input.ship_postal_code.clone(),
        ship_country: input.ship_country.clone(),
    }
}

fn detail_from(item: &OrderDetailInput, order_id: i32) -> OrderDetail {
    OrderDetail {
        order_id,
        product_id: item.product_id,
        unit_price: item.unit_price,
        quantity: item.quantity,
        discount: item.discount,
    }
}

/// Orders with all-or-nothing writes. A repeated product id in one order
/// fails like the composite primary key would.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    state: Mutex<(Vec<Order>, Vec<OrderDetail>)>,
}

impl InMemoryOrderRepository {
    fn details_for(input: &OrderInput, order_id: i32) -> DbResult<Vec<OrderDetail>> {
        let mut details: Vec<OrderDetail> = Vec::with_capacity(input.order_details.len());
        for item in &input.order_details {
            if details.iter().any(|d| d.product_id == item.product_id) {
                return Err(DbError::UniqueViolation {
                    constraint: Some("order_details_pkey".into()),
                });
            }
            details.push(detail_from(item, order_id));
        }
        Ok(details)
    }

    pub fn detail_count(&self) -> usize {
        self.state.lock().unwrap().1.len()
    }
}

#[async_trait]
impl CrudRepository for InMemoryOrderRepository {
    type Entity = Order;
    type Detail = OrderWithDetails;
    type Input = OrderInput;

    async fn list(&self, page: Page) -> DbResult<(Vec<Order>, i64)> {
        let state = self.state.lock().unwrap();
        Ok((page_of(&state.0, page), state.0.len() as i64))
    }

    async fn get(&self, id: i32) -> DbResult<OrderWithDetails> {
        let state = self.state.lock().unwrap();
        let order = state
            .0
            .iter()
            .find(|o| o.order_id == id)
            .cloned()
            .ok_or(DbError::NotFound)?;
        let details = state
            .1
            .iter()
            .filter(|d| d.order_id == id)
            .cloned()
            .collect();
        Ok(OrderWithDetails { order, details })
    }

    async fn create(&self, input: &OrderInput) -> DbResult<OrderWithDetails> {
        let mut state = self.state.lock().unwrap();
        let order_id = state.0.iter().map(|o| o.order_id).max().unwrap_or(0) + 1;
        let details = Self::details_for(input, order_id)?;

        let order = order_from(input, order_id);
        state.0.push(order.clone());
        state.1.extend(details.iter().cloned());
        Ok(OrderWithDetails { order, details })
    }

    async fn update(&self, id: i32, input: &OrderInput) -> DbResult<OrderWithDetails> {
        let mut state = self.state.lock().unwrap();
        if !state.0.iter().any(|o| o.order_id == id) {
            return Err(DbError::NotFound);
        }
        let details = Self::details_for(input, id)?;

        let order = order_from(input, id);
        for slot in state.0.iter_mut().filter(|o| o.order_id == id) {
            *slot = order.clone();
        }
        state.1.retain(|d| d.order_id != id);
        state.1.extend(details.iter().cloned());
        Ok(OrderWithDetails { order, details })
    }

    async fn delete(&self, id: i32) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.0.len();
        state.0.retain(|o| o.order_id != id);
        if state.0.len() == before {
            return Err(DbError::NotFound);
        }
        state.1.retain(|d| d.order_id != id);
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        redis_url: "redis://unused".into(),
        jwt_secret: "test-secret".into(),
        access_token_ttl_secs: 15 * 60,
        refresh_token_ttl_secs: 24 * 3600,
        otp_ttl_secs: 5 * 60,
        bcrypt_cost: TEST_BCRYPT_COST,
        server_host: "127.0.0.1".into(),
        server_port: 0,
        api_base_path: "/api".into(),
        db_max_connections: 1,
        run_migrations: false,
    }
}

/// Router wired with in-memory stores. The handles let tests inspect or
/// tamper with state behind the HTTP surface.
pub struct TestApp {
    pub server: TestServer,
    pub users: Arc<InMemoryUserRepository>,
    pub cache: Arc<InMemorySessionCache>,
    pub orders: Arc<InMemoryOrderRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = test_config();
        let users = Arc::new(InMemoryUserRepository::default());
        let cache = Arc::new(InMemorySessionCache::default());
        let orders = Arc::new(InMemoryOrderRepository::default());
        let products = Arc::new(InMemoryRepository::<Product>::default());

        let auth = AuthService::new(
            users.clone(),
            cache.clone(),
            Arc::new(TokenIssuer::from_config(&config)),
            config.bcrypt_cost,
            config.otp_ttl(),
        );

        let state = AppState {
            config,
            auth: Arc::new(auth),
            employees: Arc::new(InMemoryRepository::<Employee>::default()),
            categories: Arc::new(InMemoryRepository::<Category>::default()),
            products: products.clone(),
            product_search: products,
            orders: orders.clone(),
        };

        let server = TestServer::new(build_router(state)).expect("test server");

        Self {
            server,
            users,
            cache,
            orders,
        }
    }

    /// Registers `alice` and returns her access token.
    pub async fn login_alice(&self) -> String {
        self.server
            .post("/api/register")
            .json(&serde_json::json!({
                "username": "alice",
                "email": "alice@x.com",
                "password": "secret1"
            }))
            .await;

        let response = self
            .server
            .post("/api/login")
            .json(&serde_json::json!({ "username": "alice", "password": "secret1" }))
            .await;
        let body: serde_json::Value = response.json();
        body["data"]["token"]
            .as_str()
            .expect("login token")
            .to_string()
    }
}
