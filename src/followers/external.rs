use axum::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{placeholder_avatar, Profile};
use crate::error::ServiceError;

const DEFAULT_BIO: &str = "Instagram kullanıcısı";

/// Follower object as returned by the external platform.
///
/// Every field is optional; only `pk` and `username` are required to
/// build a [`Profile`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalFollower {
    /// Platform identifier, sent either as a number or a numeric string.
    pub pk: Option<Value>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub profile_pic_url: Option<String>,
    pub is_verified: Option<bool>,
    pub follower_count: Option<u64>,
    pub media_count: Option<u64>,
}

/// A logged-in session able to resolve a handle to its followers.
#[async_trait]
pub trait FollowerSource: Send + Sync {
    /// Fetch at most `amount` followers of `username`.
    async fn followers_of(
        &self,
        username: &str,
        amount: usize,
    ) -> anyhow::Result<Vec<ExternalFollower>>;
}

impl ExternalFollower {
    pub fn into_profile(self) -> Result<Profile, ServiceError> {
        let id = match self.pk {
            Some(Value::Number(n)) if n.is_u64() => n.to_string(),
            Some(Value::String(s)) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s,
            Some(other) => {
                return Err(ServiceError::Mapping(format!(
                    "unsupported identifier {}",
                    other
                )))
            }
            None => return Err(ServiceError::Mapping("missing identifier".to_string())),
        };

        let username = non_empty(self.username)
            .ok_or_else(|| ServiceError::Mapping(format!("missing username for {}", id)))?;

        Ok(Profile {
            name: non_empty(self.full_name).unwrap_or_else(|| username.clone()),
            bio: non_empty(self.biography).unwrap_or_else(|| DEFAULT_BIO.to_string()),
            avatar_url: non_empty(self.profile_pic_url)
                .unwrap_or_else(|| placeholder_avatar(&username)),
            verified: self.is_verified.unwrap_or(false),
            follower_count: self.follower_count.unwrap_or(0),
            post_count: self.media_count.unwrap_or(0),
            id,
            username,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
