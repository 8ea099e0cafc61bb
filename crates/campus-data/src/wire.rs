//! JSON records as the marketplace backend sends and receives them.
//!
//! The backend uses `_id` keys, camelCase fields and decimal prices. These
//! records mirror that shape and are converted into the domain types with
//! validation, so nothing past this module sees a half-populated product.

use campus_commerce::account::{Credentials, LoginSession, NewAccount, UserProfile};
use campus_commerce::catalog::Product;
use campus_commerce::checkout::{
    AuthToken, BookedLine, Booking, BookingConfirmation, BookingRequest,
};
use campus_commerce::{BookingId, CommerceError, Currency, Money, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `imageUrl` is either a single URL or a list of them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ImageUrls {
    One(String),
    Many(Vec<String>),
}

impl ImageUrls {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            ImageUrls::One(url) => vec![url],
            ImageUrls::Many(urls) => urls,
        }
        .into_iter()
        .filter(|url| !url.trim().is_empty())
        .collect()
    }
}

/// `sellerId` is a bare id, or the seller document when the backend
/// populated it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SellerRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl SellerRef {
    pub fn id(&self) -> &str {
        match self {
            SellerRef::Id(id) => id,
            SellerRef::Populated { id } => id,
        }
    }
}

/// A product listing as returned by `/api/products`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: Option<ImageUrls>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub seller_id: Option<SellerRef>,
    #[serde(default)]
    pub post_date: Option<String>,
}

impl ProductRecord {
    /// Validate and convert into a [`Product`].
    pub fn into_product(self, currency: Currency) -> Result<Product, CommerceError> {
        if self.id.trim().is_empty() {
            return Err(CommerceError::InvalidProduct("listing without an id".into()));
        }
        let price = parse_price(self.price, currency).ok_or_else(|| {
            CommerceError::InvalidProduct(format!("{}: bad price {}", self.id, self.price))
        })?;

        let mut product = Product::new(self.id, self.title, price)
            .with_category(self.category)
            .with_description(self.description);
        product.images = self.image_url.map(ImageUrls::into_vec).unwrap_or_default();
        product.seller_id = self.seller_id.map(|s| UserId::new(s.id()));
        product.listed_at = self.post_date.as_deref().and_then(parse_timestamp);
        Ok(product)
    }
}

/// Convert a list of records, failing on the first invalid one.
pub fn into_products(
    records: Vec<ProductRecord>,
    currency: Currency,
) -> Result<Vec<Product>, CommerceError> {
    records
        .into_iter()
        .map(|record| record.into_product(currency))
        .collect()
}

/// One line of the booking-create body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingLineBody {
    pub product_id: String,
    pub quantity: u32,
    pub price: f64,
}

/// Body of `POST /api/bookings/create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreateBody {
    pub products: Vec<BookingLineBody>,
    pub total_price: f64,
}

impl BookingCreateBody {
    pub fn from_request(request: &BookingRequest, currency: Currency) -> Self {
        Self {
            products: request
                .products
                .iter()
                .map(|line| BookingLineBody {
                    product_id: line.product_id.to_string(),
                    quantity: line.quantity,
                    price: line.price.to_decimal(currency),
                })
                .collect(),
            total_price: request.total_price.to_decimal(currency),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct IdOnly {
    #[serde(rename = "_id")]
    id: String,
}

/// Response of `POST /api/bookings/create`; the backend may return the new
/// booking at the top level or nested under `booking`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BookingCreatedRecord {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(default)]
    booking: Option<IdOnly>,
    #[serde(default)]
    message: Option<String>,
}

impl From<BookingCreatedRecord> for BookingConfirmation {
    fn from(record: BookingCreatedRecord) -> Self {
        let id = record.id.or(record.booking.map(|b| b.id));
        BookingConfirmation {
            booking_id: id.map(BookingId::new),
            message: record.message,
        }
    }
}

/// The product part of a booked line; populated by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BookedProductRef {
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        title: String,
        #[serde(default, rename = "imageUrl")]
        image_url: Option<ImageUrls>,
    },
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedLineRecord {
    pub product_id: BookedProductRef,
    pub quantity: u32,
    pub price: f64,
}

/// A booking as returned by `/api/bookings/my-bookings`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub total_price: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub booking_date: Option<String>,
    #[serde(default)]
    pub products: Vec<BookedLineRecord>,
}

impl BookingRecord {
    pub fn into_booking(self, currency: Currency) -> Result<Booking, CommerceError> {
        let bad_price = |what: &str, value: f64| {
            CommerceError::Backend(format!("booking {}: bad {what} {value}", self.id))
        };

        let total_price = parse_price(self.total_price, currency)
            .ok_or_else(|| bad_price("total", self.total_price))?;

        let mut lines = Vec::with_capacity(self.products.len());
        for line in &self.products {
            let price = parse_price(line.price, currency)
                .ok_or_else(|| bad_price("price", line.price))?;
            let (product_id, title, images) = match &line.product_id {
                BookedProductRef::Populated { id, title, image_url } => (
                    id.clone(),
                    title.clone(),
                    image_url.clone().map(ImageUrls::into_vec).unwrap_or_default(),
                ),
                BookedProductRef::Id(id) => (id.clone(), String::new(), Vec::new()),
            };
            lines.push(BookedLine {
                product_id: ProductId::new(product_id),
                title,
                images,
                quantity: line.quantity,
                price,
            });
        }

        Ok(Booking {
            id: BookingId::new(self.id.clone()),
            total_price,
            status: self.status.clone(),
            booked_at: self.booking_date.as_deref().and_then(parse_timestamp),
            lines,
        })
    }
}

/// Body of `POST /api/auth/login`.
#[derive(Clone, PartialEq, Serialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

impl From<&Credentials> for LoginBody {
    fn from(credentials: &Credentials) -> Self {
        Self {
            email: credentials.email.clone(),
            password: credentials.password().to_string(),
        }
    }
}

/// Body of `POST /api/auth/signup`.
#[derive(Clone, PartialEq, Serialize)]
pub struct SignupBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<&NewAccount> for SignupBody {
    fn from(account: &NewAccount) -> Self {
        Self {
            name: account.name.clone(),
            email: account.credentials.email.clone(),
            password: account.credentials.password().to_string(),
        }
    }
}

/// A user document; `/api/users/{id}` sends only the public fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        UserProfile {
            id: record
                .id
                .filter(|id| !id.trim().is_empty())
                .map(UserId::new),
            name: record.name,
            email: record.email,
        }
    }
}

/// Response of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRecord {
    pub user: UserRecord,
    #[serde(default)]
    pub token: String,
}

impl LoginRecord {
    pub fn into_session(self) -> Result<LoginSession, CommerceError> {
        let token = AuthToken::from_optional(Some(self.token.as_str())).ok_or_else(|| {
            CommerceError::Backend("login response carried no token".to_string())
        })?;
        Ok(LoginSession {
            user: self.user.into(),
            token,
        })
    }
}

fn parse_price(value: f64, currency: Currency) -> Option<Money> {
    Money::from_decimal(value, currency).filter(|m| !m.is_negative())
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
