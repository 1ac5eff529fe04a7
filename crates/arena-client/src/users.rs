//! User directory over the REST API.

use arena_core::{EnrichmentError, UserDirectory, UserProfile};
use arena_protocol::UserId;
use async_trait::async_trait;
use tracing::trace;

/// Fetches profiles with `GET {origin}/user/{id}`.
pub struct HttpUserDirectory {
    client: reqwest::Client,
    origin: String,
    token: String,
}

impl HttpUserDirectory {
    /// Create a directory that authenticates with `token`.
    #[must_use]
    pub fn new(origin: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin: origin.into(),
            token: token.into(),
        }
    }

    /// URL of a user's profile.
    #[must_use]
    pub fn profile_url(&self, user: UserId) -> String {
        format!("{}/user/{}", self.origin, user)
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn fetch(&self, user: UserId) -> Result<UserProfile, EnrichmentError> {
        let url = self.profile_url(user);
        trace!(%url, "Fetching user profile");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| EnrichmentError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EnrichmentError::Status(response.status().as_u16()));
        }

        response
            .json::<UserProfile>()
            .await
            .map_err(|e| EnrichmentError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url() {
        let users = HttpUserDirectory::new("https://pong.example", "tok");
        assert_eq!(users.profile_url(42), "https://pong.example/user/42");
    }

    #[tokio::test]
    async fn test_unreachable_directory_is_a_request_error() {
        let users = HttpUserDirectory::new("http://127.0.0.1:9", "tok");
        assert!(matches!(
            users.fetch(1).await,
            Err(EnrichmentError::Request(_))
        ));
    }
}
