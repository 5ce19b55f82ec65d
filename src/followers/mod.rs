use serde::{de, Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::accounts::not_blank;

pub mod external;
pub mod handler;
pub mod synth;

/// Maximum number of followers returned by a single read.
pub const FOLLOWERS_PAGE_SIZE: usize = 50;

/// Largest batch accepted by the regular add endpoint.
pub const MAX_SYNTHETIC_BATCH: usize = 1000;

/// Largest batch accepted by the bulk endpoint.
pub const MAX_BULK_BATCH: usize = 50_000;

/// Upper bound on followers pulled from the external source per import.
pub const MAX_REAL_FOLLOWERS: usize = 50;

/// A single follower record, either synthesized or imported.
///
/// Every field has a default so partially written documents still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub bio: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
    pub verified: bool,
    #[serde(rename = "followers")]
    pub follower_count: u64,
    #[serde(rename = "posts")]
    pub post_count: u64,
}

/// Placeholder avatar keyed by a display name or handle.
pub fn placeholder_avatar(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=667eea&color=fff&bold=true&size=128",
        name
    )
}

/// Query parameters for follower reads
#[derive(Debug, Default, Deserialize)]
pub struct FollowerFilter {
    pub limit: Option<usize>,
}

/// Request payload for the synthetic add endpoints
#[derive(Debug, Deserialize)]
pub struct AddFollowers {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub count: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Accepts an integer, a float (truncated toward zero) or a numeric string.
fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Option::<RawCount>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawCount::Integer(n)) => n,
        Some(RawCount::Float(f)) if f.is_finite() => f.trunc() as i64,
        Some(RawCount::Float(f)) => {
            return Err(de::Error::custom(format!("count must be a number, got {}", f)))
        }
        Some(RawCount::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("count must be a number, got {:?}", text)))?,
    };
    Ok(Some(count))
}

/// Request payload for importing real followers
#[derive(Debug, Deserialize, Validate)]
pub struct AddRealFollowers {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub username: String,
}

/// Front slice of an account's followers plus the true total
#[derive(Debug, Serialize)]
pub struct FollowerPage {
    pub followers: Vec<Profile>,
    pub total: usize,
}

/// Outcome of a follower mutation
#[derive(Debug, Serialize)]
pub struct FollowerBatch {
    pub added: usize,
    pub total: usize,
}
