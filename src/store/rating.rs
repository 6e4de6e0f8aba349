use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Running aggregate for one laptop's scores.
///
/// The average is `sum / count`; individual scores are never retained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rating {
    /// How many times the laptop has been rated.
    pub count: u32,
    /// Sum of every score received so far.
    pub sum: f64,
}

/// In-memory rating accumulator.
pub struct RatingStore {
    ratings: Arc<RwLock<HashMap<String, Rating>>>,
}

impl RatingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            ratings: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Records a score for the laptop and returns the post-update aggregate.
    ///
    /// The exclusive lock is held for the whole call; every call mutates, so
    /// there is no separate read path.
    pub async fn add(&self, laptop_id: &str, score: f64) -> Rating {
        let mut ratings = self.ratings.write().await;

        let rating = ratings
            .entry(laptop_id.to_string())
            .and_modify(|rating| {
                rating.count += 1;
                rating.sum += score;
            })
            .or_insert(Rating {
                count: 1,
                sum: score,
            });

        *rating
    }
}

impl Default for RatingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RatingStore {
    fn clone(&self) -> Self {
        Self {
            ratings: Arc::clone(&self.ratings),
        }
    }
}
