//! Shared domain enums

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Booking status as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Pending => "pending",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Pending => "Pending",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// PaymentStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Refunded,
    Failed,
}

// ---------------------------------------------------------------------------
// Bucket
// ---------------------------------------------------------------------------

/// Display category of a booking, derived from status and dates.
///
/// Also serves as the bookings page tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    #[default]
    Upcoming,
    Past,
    Cancelled,
    Pending,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [Bucket::Upcoming, Bucket::Past, Bucket::Cancelled, Bucket::Pending];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Upcoming => "upcoming",
            Bucket::Past => "past",
            Bucket::Cancelled => "cancelled",
            Bucket::Pending => "pending",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Bucket::Upcoming => "Upcoming",
            Bucket::Past => "Past",
            Bucket::Cancelled => "Cancelled",
            Bucket::Pending => "Pending",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// BookingSort
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingSort {
    /// Total amount, highest first
    Price,
    /// Event start, soonest first
    #[default]
    EventDate,
    /// Creation time, newest first
    Recent,
}

// ---------------------------------------------------------------------------
// FavoriteType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteType {
    Venue,
    Service,
}

impl FavoriteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoriteType::Venue => "venue",
            FavoriteType::Service => "service",
        }
    }
}

// ---------------------------------------------------------------------------
// FavoriteTab
// ---------------------------------------------------------------------------

/// Favorites page tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteTab {
    #[default]
    All,
    Venues,
    Services,
}

impl FavoriteTab {
    /// Item type admitted by this tab, `None` meaning every type
    pub fn item_type(&self) -> Option<FavoriteType> {
        match self {
            FavoriteTab::All => None,
            FavoriteTab::Venues => Some(FavoriteType::Venue),
            FavoriteTab::Services => Some(FavoriteType::Service),
        }
    }
}

// ---------------------------------------------------------------------------
// FavoriteSort
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteSort {
    /// Server order (most recently favorited first)
    #[default]
    Recent,
    /// Cheapest first
    Price,
    /// Best rated first
    Rating,
    /// Nearest first
    Distance,
    /// Alphabetical, case-insensitive
    Name,
}
