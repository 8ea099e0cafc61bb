//! Checkout module.
//!
//! Turns a cart into a booking request and submits it through a
//! [`BookingGateway`].

mod booking;
mod flow;

pub use booking::{BookedLine, Booking, BookingConfirmation, BookingLine, BookingRequest};
pub use flow::{place_booking, AuthToken, BookingGateway};
