//! In-memory billing service.
//!
//! Implements the `BillingService` port without a network: accounts, the
//! course list, balances and transactions live in memory. Access tokens are
//! real HS256-signed tokens, so anything that decodes token claims works
//! against it unchanged.
//!
//! Supports:
//! - Seeded users and courses matching the platform fixtures
//! - A controllable clock for token and rent expiry
//! - Refresh token rotation
//! - Error injection per operation
//! - Call tracking
//!
//! # Example
//!
//! ```ignore
//! let billing = InMemoryBillingService::seeded().with_token_ttl_secs(60);
//! let pair = billing.authenticate(&Credentials::new(USER_EMAIL, USER_PASSWORD)).await?;
//!
//! billing.advance_secs(120);
//! assert_eq!(billing.call_count("authenticate"), 1);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::billing::{
    AccessToken, BillingCourse, BillingError, CourseDraft, CourseType, Credentials, Identity,
    PaymentReceipt, RefreshToken, TokenPair, Transaction, TransactionFilter, TransactionType,
    ROLE_SUPER_ADMIN, ROLE_USER,
};
use crate::domain::foundation::Timestamp;
use crate::ports::BillingService;

/// Seeded regular user.
pub const USER_EMAIL: &str = "user@example.com";
pub const USER_PASSWORD: &str = "user_password";

/// Seeded administrator.
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin_password";

/// Rent length.
pub const RENT_DAYS: i64 = 7;

const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
const SIGNING_SECRET: &[u8] = b"study-on-in-memory-billing";

/// Claims of the tokens this service mints.
#[derive(Debug, Serialize, Deserialize)]
struct IssuedClaims {
    username: String,
    roles: Vec<String>,
    iat: i64,
    exp: i64,
}

struct Account {
    password: String,
    roles: Vec<String>,
    balance: f64,
}

struct OwnedTransaction {
    username: String,
    transaction: Transaction,
}

#[derive(Default)]
struct BillingState {
    accounts: HashMap<String, Account>,
    courses: Vec<BillingCourse>,
    transactions: Vec<OwnedTransaction>,
    /// Live refresh token -> username.
    refresh_tokens: HashMap<String, String>,
    next_transaction_id: i64,
    token_ttl_secs: i64,
    /// Fixed time; `None` follows the wall clock.
    frozen_now: Option<Timestamp>,
    /// Errors returned by a named operation until cleared.
    method_errors: HashMap<String, BillingError>,
    call_log: Vec<&'static str>,
}

/// Billing service held entirely in memory.
#[derive(Clone)]
pub struct InMemoryBillingService {
    inner: Arc<Mutex<BillingState>>,
}

impl Default for InMemoryBillingService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBillingService {
    /// Empty service: no users, no courses.
    pub fn new() -> Self {
        let state = BillingState {
            next_transaction_id: 1,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            ..BillingState::default()
        };
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Service with the fixture users and the three fixture courses.
    ///
    /// The regular user starts with a deposit of 1000; the admin with 0.
    pub fn seeded() -> Self {
        let service = Self::new();
        service.seed();
        service
    }

    /// Seeded service with the clock frozen at `now`, seeding included.
    pub fn seeded_at(now: Timestamp) -> Self {
        let service = Self::new().with_now(now);
        service.seed();
        service
    }

    fn seed(&self) {
        self.add_user(USER_EMAIL, USER_PASSWORD, vec![ROLE_USER.to_string()], 0.0);
        self.add_user(
            ADMIN_EMAIL,
            ADMIN_PASSWORD,
            vec![ROLE_USER.to_string(), ROLE_SUPER_ADMIN.to_string()],
            0.0,
        );
        self.deposit(USER_EMAIL, 1000.0);
        self.insert_course(BillingCourse::free("interactive-sql-trainer"));
        self.insert_course(BillingCourse::new(
            "python-programming",
            CourseType::Rent,
            Some(10.0),
        ));
        self.insert_course(BillingCourse::new(
            "building-information-modeling",
            CourseType::Buy,
            Some(20.0),
        ));
    }

    fn state(&self) -> MutexGuard<'_, BillingState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Lifetime of newly minted access tokens.
    pub fn with_token_ttl_secs(self, secs: i64) -> Self {
        self.state().token_ttl_secs = secs;
        self
    }

    /// Freeze the clock at `now`.
    pub fn with_now(self, now: Timestamp) -> Self {
        self.state().frozen_now = Some(now);
        self
    }

    /// Move the clock forward, freezing it if it was following the wall clock.
    pub fn advance_secs(&self, secs: i64) {
        let mut state = self.state();
        let now = state.frozen_now.unwrap_or_else(Timestamp::now);
        state.frozen_now = Some(now.plus_secs(secs));
    }

    /// Current time as seen by this service.
    pub fn now(&self) -> Timestamp {
        self.state().frozen_now.unwrap_or_else(Timestamp::now)
    }

    pub fn add_user(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
        roles: Vec<String>,
        balance: f64,
    ) {
        self.state().accounts.insert(
            username.into(),
            Account {
                password: password.into(),
                roles,
                balance,
            },
        );
    }

    /// Credit a user's balance and record the deposit.
    pub fn deposit(&self, username: &str, amount: f64) {
        let mut state = self.state();
        let now = state.frozen_now.unwrap_or_else(Timestamp::now);
        let Some(account) = state.accounts.get_mut(username) else {
            return;
        };
        account.balance += amount;
        state.record(
            username,
            TransactionType::Deposit,
            amount,
            None,
            None,
            now,
        );
    }

    /// Insert or replace a course by code.
    pub fn insert_course(&self, course: BillingCourse) {
        let mut state = self.state();
        match state.courses.iter_mut().find(|c| c.code == course.code) {
            Some(existing) => *existing = course,
            None => state.courses.push(course),
        }
    }

    /// Make `method` fail with `error` until cleared.
    pub fn fail_method(&self, method: &str, error: BillingError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    pub fn clear_failures(&self) {
        self.state().method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Inspection
    // ════════════════════════════════════════════════════════════════════════════

    /// Number of calls made to the named operation.
    pub fn call_count(&self, method: &str) -> usize {
        self.state().call_log.iter().filter(|m| **m == method).count()
    }

    /// Operation names in call order.
    pub fn call_log(&self) -> Vec<&'static str> {
        self.state().call_log.clone()
    }

    pub fn balance_of(&self, username: &str) -> Option<f64> {
        self.state().accounts.get(username).map(|a| a.balance)
    }

    /// Every transaction of a user, unfiltered.
    pub fn transactions_of(&self, username: &str) -> Vec<Transaction> {
        self.state()
            .transactions
            .iter()
            .filter(|t| t.username == username)
            .map(|t| t.transaction.clone())
            .collect()
    }

    /// Whether billing would still accept this refresh token.
    pub fn is_refresh_token_live(&self, refresh_token: &RefreshToken) -> bool {
        self.state()
            .refresh_tokens
            .contains_key(refresh_token.expose())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internals
    // ════════════════════════════════════════════════════════════════════════════

    /// Logs the call and returns the injected error, if any.
    fn enter(&self, method: &'static str) -> Result<MutexGuard<'_, BillingState>, BillingError> {
        let mut state = self.state();
        state.call_log.push(method);
        if let Some(error) = state.method_errors.get(method).cloned() {
            return Err(error);
        }
        Ok(state)
    }
}

impl BillingState {
    fn now(&self) -> Timestamp {
        self.frozen_now.unwrap_or_else(Timestamp::now)
    }

    fn record(
        &mut self,
        username: &str,
        transaction_type: TransactionType,
        amount: f64,
        course_code: Option<String>,
        expires_at: Option<Timestamp>,
        created_at: Timestamp,
    ) -> Transaction {
        let transaction = Transaction {
            id: self.next_transaction_id,
            created_at,
            transaction_type,
            amount,
            course_code,
            expires_at,
        };
        self.next_transaction_id += 1;
        self.transactions.push(OwnedTransaction {
            username: username.to_string(),
            transaction: transaction.clone(),
        });
        transaction
    }

    fn issue_tokens(&mut self, username: &str) -> Result<TokenPair, BillingError> {
        let roles = self
            .accounts
            .get(username)
            .map(|a| a.roles.clone())
            .unwrap_or_default();
        let now = self.now().as_unix_secs();
        let claims = IssuedClaims {
            username: username.to_string(),
            roles,
            iat: now,
            exp: now + self.token_ttl_secs,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SIGNING_SECRET),
        )
        .map_err(|e| BillingError::unavailable(format!("jwt encode: {e}")))?;

        let refresh_token = Uuid::new_v4().to_string();
        self.refresh_tokens
            .insert(refresh_token.clone(), username.to_string());

        Ok(TokenPair::new(
            AccessToken::new(token),
            RefreshToken::new(refresh_token),
        ))
    }

    /// Username of a valid, unexpired access token.
    fn authorize(&self, access_token: &AccessToken) -> Result<String, BillingError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data = decode::<IssuedClaims>(
            access_token.as_str(),
            &DecodingKey::from_secret(SIGNING_SECRET),
            &validation,
        )
        .map_err(|_| BillingError::InvalidToken)?;

        if data.claims.exp <= self.now().as_unix_secs() {
            return Err(BillingError::InvalidToken);
        }
        if !self.accounts.contains_key(&data.claims.username) {
            return Err(BillingError::InvalidToken);
        }
        Ok(data.claims.username)
    }

    fn has_active_payment(&self, username: &str, code: &str, now: Timestamp) -> bool {
        self.transactions
            .iter()
            .any(|t| t.username == username && t.transaction.grants_access_to(code, now))
    }
}

#[async_trait]
impl BillingService for InMemoryBillingService {
    async fn authenticate(&self, credentials: &Credentials) -> Result<TokenPair, BillingError> {
        let mut state = self.enter("authenticate")?;
        let known = state
            .accounts
            .get(credentials.username())
            .is_some_and(|a| a.password == credentials.expose_password());
        if !known {
            return Err(BillingError::InvalidCredentials);
        }
        state.issue_tokens(credentials.username())
    }

    async fn register(&self, credentials: &Credentials) -> Result<TokenPair, BillingError> {
        let mut state = self.enter("register")?;
        if state.accounts.contains_key(credentials.username()) {
            return Err(BillingError::UserAlreadyExists);
        }
        state.accounts.insert(
            credentials.username().to_string(),
            Account {
                password: credentials.expose_password().to_string(),
                roles: vec![ROLE_USER.to_string()],
                balance: 0.0,
            },
        );
        tracing::debug!(username = %credentials.username(), "In-memory billing registered user");
        state.issue_tokens(credentials.username())
    }

    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair, BillingError> {
        let mut state = self.enter("refresh")?;
        let username = state
            .refresh_tokens
            .remove(refresh_token.expose())
            .ok_or_else(|| BillingError::unavailable("billing responded with status 401"))?;
        state.issue_tokens(&username)
    }

    async fn current_identity(&self, access_token: &AccessToken) -> Result<Identity, BillingError> {
        let state = self.enter("current_identity")?;
        let username = state.authorize(access_token)?;
        let account = state
            .accounts
            .get(&username)
            .ok_or(BillingError::InvalidToken)?;
        Ok(Identity::new(username, account.roles.clone(), account.balance))
    }

    async fn list_courses(&self) -> Result<Vec<BillingCourse>, BillingError> {
        let state = self.enter("list_courses")?;
        Ok(state.courses.clone())
    }

    async fn get_course(&self, code: &str) -> Result<BillingCourse, BillingError> {
        let state = self.enter("get_course")?;
        state
            .courses
            .iter()
            .find(|c| c.code == code)
            .cloned()
            .ok_or(BillingError::NotFound)
    }

    async fn pay_course(
        &self,
        access_token: &AccessToken,
        code: &str,
    ) -> Result<PaymentReceipt, BillingError> {
        let mut state = self.enter("pay_course")?;
        let username = state.authorize(access_token)?;
        let course = state
            .courses
            .iter()
            .find(|c| c.code == code)
            .cloned()
            .ok_or(BillingError::NotFound)?;
        let now = state.now();

        if course.course_type.is_free() || state.has_active_payment(&username, code, now) {
            return Err(BillingError::AlreadyPaid);
        }

        let price = course.price();
        let account = state
            .accounts
            .get_mut(&username)
            .ok_or(BillingError::InvalidToken)?;
        if account.balance < price {
            return Err(BillingError::InsufficientFunds);
        }
        account.balance -= price;

        let expires_at = (course.course_type == CourseType::Rent).then(|| now.plus_days(RENT_DAYS));
        state.record(
            &username,
            TransactionType::Payment,
            price,
            Some(course.code.clone()),
            expires_at,
            now,
        );

        Ok(PaymentReceipt {
            success: true,
            course_type: Some(course.course_type.as_str().to_string()),
            expires_at,
        })
    }

    async fn list_transactions(
        &self,
        access_token: &AccessToken,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, BillingError> {
        let state = self.enter("list_transactions")?;
        let username = state.authorize(access_token)?;
        let now = state.now();
        Ok(state
            .transactions
            .iter()
            .filter(|t| t.username == username && filter.matches(&t.transaction, now))
            .map(|t| t.transaction.clone())
            .collect())
    }

    async fn save_course(
        &self,
        access_token: &AccessToken,
        draft: &CourseDraft,
        existing_code: Option<&str>,
    ) -> Result<bool, BillingError> {
        let mut state = self.enter("save_course")?;
        let username = state.authorize(access_token)?;
        let is_admin = state
            .accounts
            .get(&username)
            .is_some_and(|a| a.roles.iter().any(|r| r == ROLE_SUPER_ADMIN));
        if !is_admin {
            return Err(BillingError::Forbidden);
        }
        draft
            .validate()
            .map_err(|e| BillingError::unavailable(format!("billing rejected course: {e}")))?;

        let code_taken = |courses: &[BillingCourse]| courses.iter().any(|c| c.code == draft.code);
        let course = draft.to_billing_course();

        match existing_code {
            Some(existing) => {
                let index = state
                    .courses
                    .iter()
                    .position(|c| c.code == existing)
                    .ok_or(BillingError::NotFound)?;
                if draft.code != existing && code_taken(state.courses.as_slice()) {
                    return Err(BillingError::AlreadyExists);
                }
                state.courses[index] = course;
            }
            None => {
                if code_taken(state.courses.as_slice()) {
                    return Err(BillingError::AlreadyExists);
                }
                state.courses.push(course);
            }
        }
        Ok(true)
    }
}
