//! Marketplace REST bindings.
//!
//! [`MarketplaceApi`] speaks the backend's `/api/products`, `/api/bookings`,
//! `/api/auth` and `/api/users` endpoints and exposes them through the
//! commerce traits, so the CLI and the checkout flow never see HTTP details.

use crate::wire::{
    self, BookingCreateBody, BookingCreatedRecord, BookingRecord, LoginBody, LoginRecord,
    ProductRecord, SignupBody, UserRecord,
};
use crate::{FetchClient, FetchError};
use async_trait::async_trait;
use campus_commerce::account::{
    AccountGateway, Credentials, LoginSession, NewAccount, UserProfile,
};
use campus_commerce::catalog::Product;
use campus_commerce::checkout::{
    AuthToken, Booking, BookingConfirmation, BookingGateway, BookingRequest,
};
use campus_commerce::search::{sort_products, ProductQuery, ProductSource};
use campus_commerce::{CommerceError, Currency, ProductId, UserId};
use tracing::{debug, info, warn};

const PRODUCTS: &str = "/api/products";
const CREATE_BOOKING: &str = "/api/bookings/create";
const MY_BOOKINGS: &str = "/api/bookings/my-bookings";
const LOGIN: &str = "/api/auth/login";
const SIGNUP: &str = "/api/auth/signup";
const USERS: &str = "/api/users";

/// Fallback when a rejected booking carries no message.
pub const BOOKING_FAILED: &str = "Booking failed";
/// Fallback when a rejected login carries no message.
pub const LOGIN_FAILED: &str = "Login failed.";
/// Fallback when a rejected sign-up carries no message.
pub const SIGNUP_FAILED: &str = "Sign-up failed.";
/// Reported when a seller's profile cannot be fetched.
pub const SELLER_LOOKUP_FAILED: &str = "Could not fetch seller information.";

/// Client for the marketplace backend.
#[derive(Debug, Clone)]
pub struct MarketplaceApi {
    client: FetchClient,
    currency: Currency,
}

impl MarketplaceApi {
    /// Create a client for the backend at `base_url`, pricing in INR.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(FetchClient::new().with_base_url(base_url))
    }

    pub fn with_client(client: FetchClient) -> Self {
        Self {
            client,
            currency: Currency::default(),
        }
    }

    /// Currency the backend's decimal prices are in.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}

#[async_trait]
impl ProductSource for MarketplaceApi {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, CommerceError> {
        debug!(search = %query.search, category = ?query.category, "listing products");
        let response = self
            .client
            .get(PRODUCTS)
            .query(query.query_pairs())
            .send()
            .await?
            .error_for_status()?;

        let records: Vec<ProductRecord> = response.json()?;
        let mut products = wire::into_products(records, self.currency)?;
        sort_products(&mut products, query.sort);
        Ok(products)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        let response = self
            .client
            .get(format!("{PRODUCTS}/{id}"))
            .send()
            .await?;

        if response.is_not_found() {
            return Err(CommerceError::ProductNotFound(id.to_string()));
        }
        let record: ProductRecord = response.error_for_status()?.json()?;
        record.into_product(self.currency)
    }
}

#[async_trait]
impl BookingGateway for MarketplaceApi {
    async fn create_booking(
        &self,
        token: &AuthToken,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, CommerceError> {
        let body = BookingCreateBody::from_request(request, self.currency);
        let response = self
            .client
            .post(CREATE_BOOKING)
            .bearer_auth(token.expose())
            .json(&body)?
            .send()
            .await?;

        if !response.is_success() {
            let message = response
                .message()
                .unwrap_or_else(|| BOOKING_FAILED.to_string());
            warn!(status = response.status, %message, "booking rejected");
            return Err(CommerceError::BookingRejected(message));
        }

        // Some backends answer with an empty body; the booking still went through.
        if response.body.is_empty() {
            return Ok(BookingConfirmation::default());
        }
        let record: BookingCreatedRecord = response.json()?;
        Ok(record.into())
    }

    async fn my_bookings(&self, token: &AuthToken) -> Result<Vec<Booking>, CommerceError> {
        let response = self
            .client
            .get(MY_BOOKINGS)
            .bearer_auth(token.expose())
            .send()
            .await?;

        if response.status == 401 || response.status == 403 {
            return Err(CommerceError::NotAuthenticated);
        }
        let records: Vec<BookingRecord> = response
            .error_for_status()
            .map_err(|e| match e {
                FetchError::HttpError { .. } => {
                    CommerceError::Backend("Failed to fetch bookings.".to_string())
                }
                other => other.into(),
            })?
            .json()?;

        records
            .into_iter()
            .map(|record| record.into_booking(self.currency))
            .collect()
    }
}

#[async_trait]
impl AccountGateway for MarketplaceApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginSession, CommerceError> {
        credentials.validate()?;
        let response = self
            .client
            .post(LOGIN)
            .json(&LoginBody::from(credentials))?
            .send()
            .await?;

        if !response.is_success() {
            let message = response
                .message()
                .unwrap_or_else(|| LOGIN_FAILED.to_string());
            warn!(status = response.status, %message, "login rejected");
            return Err(CommerceError::AuthRejected(message));
        }

        let session = response.json::<LoginRecord>()?.into_session()?;
        info!(email = %credentials.email, "signed in");
        Ok(session)
    }

    async fn signup(&self, account: &NewAccount) -> Result<Option<String>, CommerceError> {
        account.validate()?;
        let response = self
            .client
            .post(SIGNUP)
            .json(&SignupBody::from(account))?
            .send()
            .await?;

        if !response.is_success() {
            let message = response
                .message()
                .unwrap_or_else(|| SIGNUP_FAILED.to_string());
            warn!(status = response.status, %message, "sign-up rejected");
            return Err(CommerceError::AuthRejected(message));
        }

        info!(email = %account.credentials.email, "account created");
        Ok(response.message())
    }

    async fn user_profile(&self, id: &UserId) -> Result<UserProfile, CommerceError> {
        let response = self.client.get(format!("{USERS}/{id}")).send().await?;

        if !response.is_success() {
            warn!(status = response.status, user_id = %id, "user lookup failed");
            return Err(CommerceError::Backend(SELLER_LOOKUP_FAILED.to_string()));
        }

        let mut profile = UserProfile::from(response.json::<UserRecord>()?);
        if profile.id.is_none() {
            profile.id = Some(id.clone());
        }
        Ok(profile)
    }
}
