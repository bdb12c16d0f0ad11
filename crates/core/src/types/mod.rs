//! Shared domain types.

pub mod email;
pub mod id;
pub mod money;
pub mod package;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{CurrencyCode, Price, round_to_cents};
pub use package::{
    InvalidPackageTransition, OPEN_WINDOW_SECONDS, PackageStatus, TimeRemaining, closing_time,
};
pub use status::{
    AdminRole, CouponKind, GiftCardStatus, InvalidReturnTransition, OrderPaymentStatus, PostStatus,
    ReturnStatus, StreamPhase,
};
