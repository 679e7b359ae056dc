//! Data models for the Venuity client

pub mod booking;
pub mod enums;
pub mod envelope;
pub mod favorite;
pub mod user;

// Re-export commonly used types
pub use booking::{BookingQuery, BookingRecord, PaymentSummary, ServiceLine, StatusUpdate, VenueSummary};
pub use enums::{BookingSort, BookingStatus, Bucket, FavoriteSort, FavoriteTab, FavoriteType, PaymentStatus};
pub use envelope::{Envelope, ErrorBody};
pub use favorite::{FavoriteItem, FavoriteQuery, ToggleFavoriteResponse};
pub use user::{SessionClaims, UpdateProfile, UserProfile};
