use serde::{Deserialize, Serialize};

/// One sample of a simulated price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// UTC timestamp, `YYYY-MM-DDTHH:MM:SS.mmmZ`.
    pub date: String,
    pub price: f64,
}
