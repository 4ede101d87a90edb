//! Business logic on top of the repositories and external APIs.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod mailer;
pub mod stripe;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService, CartView};
pub use checkout::{CheckoutError, CheckoutService, SessionStatus};
pub use mailer::{MailClient, MailError};
pub use stripe::{LineItem, StripeClient, StripeError};
