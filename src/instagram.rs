use anyhow::{anyhow, bail, Context, Result};
use axum::async_trait;
use reqwest::{header::AUTHORIZATION, Client, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    config::settings::InstagramSettings,
    followers::external::{ExternalFollower, FollowerSource},
};

const APP_ID_HEADER: &str = "x-ig-app-id";
const APP_ID: &str = "936619743392459";
const SESSION_HEADER: &str = "ig-set-authorization";

/// Logged-in client for the Instagram API.
#[derive(Clone)]
pub struct InstagramClient {
    client: Client,
    api_url: String,
    authorization: String,
}

#[derive(Deserialize)]
struct ProfileInfoResponse {
    data: ProfileInfoData,
}

#[derive(Deserialize)]
struct ProfileInfoData {
    user: Option<ProfileInfoUser>,
}

#[derive(Deserialize)]
struct ProfileInfoUser {
    id: Value,
}

#[derive(Deserialize)]
struct FollowersResponse {
    #[serde(default)]
    users: Vec<ExternalFollower>,
}

impl InstagramClient {
    /// Establish a session from the configured credentials.
    ///
    /// An access token is used as-is; otherwise username and password are
    /// exchanged for a session authorization. Returns `Ok(None)` when no
    /// credentials are configured.
    pub async fn connect(settings: &InstagramSettings) -> Result<Option<Self>> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("building HTTP client")?;
        let api_url = settings.api_url.trim_end_matches('/').to_string();

        if let Some(token) = &settings.access_token {
            return Ok(Some(Self {
                client,
                api_url,
                authorization: format!("Bearer {}", token),
            }));
        }

        let (Some(username), Some(password)) = (&settings.username, &settings.password) else {
            return Ok(None);
        };

        info!("logging in to Instagram as {}", username);

        let response = client
            .post(format!("{}/api/v1/accounts/login/", api_url))
            .header(APP_ID_HEADER, APP_ID)
            .form(&[("username", username.as_str()), ("password", password.as_str())])
            .send()
            .await
            .context("sending login request")?;
        let response = ensure_success(response, "login").await?;

        let authorization = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("login response did not include a session authorization"))?
            .to_string();

        Ok(Some(Self {
            client,
            api_url,
            authorization,
        }))
    }

    async fn user_id(&self, username: &str) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/api/v1/users/web_profile_info/", self.api_url))
            .query(&[("username", username)])
            .header(AUTHORIZATION, &self.authorization)
            .header(APP_ID_HEADER, APP_ID)
            .send()
            .await
            .with_context(|| format!("looking up {}", username))?;
        let info: ProfileInfoResponse = ensure_success(response, "profile lookup")
            .await?
            .json()
            .await
            .context("decoding profile lookup")?;

        match info.data.user.map(|u| u.id) {
            Some(Value::String(id)) => Ok(id),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => bail!("user {} not found", username),
        }
    }
}

#[async_trait]
impl FollowerSource for InstagramClient {
    async fn followers_of(&self, username: &str, amount: usize) -> Result<Vec<ExternalFollower>> {
        let user_id = self.user_id(username).await?;

        let response = self
            .client
            .get(format!(
                "{}/api/v1/friendships/{}/followers/",
                self.api_url, user_id
            ))
            .query(&[("count", amount)])
            .header(AUTHORIZATION, &self.authorization)
            .header(APP_ID_HEADER, APP_ID)
            .send()
            .await
            .with_context(|| format!("fetching followers of {}", username))?;
        let mut body: FollowersResponse = ensure_success(response, "follower list")
            .await?
            .json()
            .await
            .context("decoding follower list")?;

        body.users.truncate(amount);
        debug!(
            "fetched {} followers of {} ({})",
            body.users.len(),
            username,
            user_id
        );
        Ok(body.users)
    }
}

async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    bail!("{} failed with {}: {}", what, status, text)
}
