//! Star ratings and the aggregate values derived from them.
//!
//! Averages are held exactly as hundredths of a star so the two-decimal
//! rounding is integer arithmetic: `[5, 4, 4]` averages to `433` hundredths
//! (`4.33`), `[5, 5, 4]` to `467` (`4.67`).

use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

use super::FieldValidationError;

/// Integer star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest permitted rating.
    pub const MIN: u8 = 1;
    /// Highest permitted rating.
    pub const MAX: u8 = 5;

    /// Validate a raw rating.
    ///
    /// # Errors
    ///
    /// Returns [`FieldValidationError::OutOfRange`] outside `1..=5`.
    pub fn new(value: i64) -> Result<Self, FieldValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|stars| (Self::MIN..=Self::MAX).contains(stars))
            .map(Self)
            .ok_or(FieldValidationError::OutOfRange {
                field: "rating",
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
            })
    }

    /// Number of stars.
    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = FieldValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Mean rating stored as hundredths of a star, `0..=500`.
///
/// Serialises as a JSON number with two decimal places of precision, e.g.
/// `4.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AverageRating(u16);

impl AverageRating {
    /// Average of a book with no reviews.
    pub const ZERO: Self = Self(0);

    /// Construct from hundredths of a star, clamping to the valid range.
    #[must_use]
    pub const fn from_hundredths(hundredths: u16) -> Self {
        if hundredths > 500 {
            Self(500)
        } else {
            Self(hundredths)
        }
    }

    /// Hundredths of a star.
    #[must_use]
    pub const fn hundredths(self) -> u16 {
        self.0
    }

    /// Decimal value for presentation.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Serialize for AverageRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// The denormalised aggregate fields of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    /// Mean rating rounded half-up to two decimal places.
    #[schema(value_type = f64, example = 4.5)]
    pub average_rating: AverageRating,
    /// Number of live reviews.
    pub review_count: u64,
}

impl RatingSummary {
    /// Aggregate a set of ratings.
    ///
    /// An empty set yields an average of zero.
    ///
    /// # Examples
    /// ```
    /// use bookshelf::domain::{Rating, RatingSummary};
    ///
    /// let ratings: Vec<Rating> = [5, 3, 4]
    ///     .into_iter()
    ///     .filter_map(|stars| Rating::new(stars).ok())
    ///     .collect();
    /// let summary = RatingSummary::from_ratings(&ratings);
    /// assert_eq!(summary.review_count, 3);
    /// assert_eq!(summary.average_rating.hundredths(), 400);
    /// ```
    #[must_use]
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        let count = ratings.len() as u64;
        let total: u64 = ratings.iter().map(|rating| u64::from(rating.stars())).sum();
        Self {
            average_rating: mean_hundredths(total, count),
            review_count: count,
        }
    }
}

/// Round `total / count` to hundredths, halves away from zero.
fn mean_hundredths(total: u64, count: u64) -> AverageRating {
    let Some(doubled_count) = count.checked_mul(2) else {
        return AverageRating::ZERO;
    };
    if doubled_count == 0 {
        return AverageRating::ZERO;
    }
    // (total * 100 / count) rounded: add half the divisor before dividing.
    let numerator = total.saturating_mul(200).saturating_add(count);
    let hundredths = numerator.checked_div(doubled_count).unwrap_or_default();
    AverageRating::from_hundredths(u16::try_from(hundredths).unwrap_or(u16::MAX))
}

/// Review counts per star value, indexed `[1★, 2★, 3★, 4★, 5★]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Vec<u32>)]
pub struct RatingDistribution([u32; 5]);

impl RatingDistribution {
    /// Tally `ratings` by star value.
    ///
    /// # Examples
    /// ```
    /// use bookshelf::domain::{Rating, RatingDistribution};
    ///
    /// let ratings: Vec<Rating> = [1, 1, 3, 5, 5, 5]
    ///     .into_iter()
    ///     .filter_map(|stars| Rating::new(stars).ok())
    ///     .collect();
    /// assert_eq!(RatingDistribution::from_ratings(&ratings).counts(), [2, 0, 1, 0, 3]);
    /// ```
    #[must_use]
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        let mut counts = [0_u32; 5];
        for rating in ratings {
            let slot = usize::from(rating.stars().saturating_sub(1));
            if let Some(count) = counts.get_mut(slot) {
                *count = count.saturating_add(1);
            }
        }
        Self(counts)
    }

    /// Counts per star value.
    #[must_use]
    pub const fn counts(&self) -> [u32; 5] {
        self.0
    }
}
