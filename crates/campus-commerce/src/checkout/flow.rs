//! Booking submission.
//!
//! The cart's only coupling to checkout: a request is built from the cart,
//! handed to a [`BookingGateway`], and the cart is cleared only once the
//! gateway accepts it. Any failure leaves the cart as it was so the user can
//! retry.

use crate::cart::CartStore;
use crate::checkout::{Booking, BookingConfirmation, BookingRequest};
use crate::error::CommerceError;
use crate::notify::{Notification, NotificationSink};
use crate::persist::{CartBackend, PersistentCart};
use async_trait::async_trait;
use std::fmt;
use tracing::{info, warn};

/// Bearer token of the signed-in user.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token from an optional config value; blanks count as absent.
    pub fn from_optional(token: Option<&str>) -> Option<Self> {
        token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Self::new)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Backend that accepts bookings.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// Place a booking on behalf of the token's user.
    async fn create_booking(
        &self,
        token: &AuthToken,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, CommerceError>;

    /// Bookings previously placed by the token's user.
    async fn my_bookings(&self, token: &AuthToken) -> Result<Vec<Booking>, CommerceError>;
}

/// Submit the cart as a booking.
///
/// On success the cart is cleared and a success notification is sent. On
/// any failure the cart is untouched.
pub async fn place_booking<S, G>(
    cart: &mut CartStore<S>,
    gateway: &G,
    token: Option<&AuthToken>,
) -> Result<BookingConfirmation, CommerceError>
where
    S: NotificationSink,
    G: BookingGateway + ?Sized,
{
    if cart.is_empty() {
        return Err(CommerceError::EmptyCart);
    }

    let Some(token) = token else {
        cart.notifier()
            .notify(Notification::error("Please login to proceed."));
        return Err(CommerceError::NotAuthenticated);
    };

    let request = BookingRequest::from_cart(cart);
    match gateway.create_booking(token, &request).await {
        Ok(confirmation) => {
            info!(
                lines = request.products.len(),
                total = request.total_price.amount_minor(),
                booking_id = ?confirmation.booking_id,
                "booking placed"
            );
            cart.notifier()
                .notify(Notification::success("Booking successful!"));
            cart.clear();
            Ok(confirmation)
        }
        Err(e) => {
            warn!(error = %e, "booking failed; cart left intact");
            cart.notifier().notify(Notification::error(e.to_string()));
            Err(e)
        }
    }
}

impl<S, B> PersistentCart<S, B>
where
    S: NotificationSink,
    B: CartBackend,
{
    /// [`place_booking`] for a persisted cart; the cleared cart is saved.
    pub async fn place_booking<G>(
        &mut self,
        gateway: &G,
        token: Option<&AuthToken>,
    ) -> Result<BookingConfirmation, CommerceError>
    where
        G: BookingGateway + ?Sized,
    {
        let confirmation = place_booking(&mut self.store, gateway, token).await?;
        self.save()?;
        Ok(confirmation)
    }
}
