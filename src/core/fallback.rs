use crate::core::{Attempt, FallbackPolicy, UsersService};
use crate::utils::error::{Result, UsersError};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Everything the fallback client needs, resolved by the composition root.
#[derive(Debug, Clone)]
pub struct FallbackSettings {
    pub base_url: String,
    pub primary_path: String,
    pub fallback_path: String,
    pub policy: FallbackPolicy,
}

/// Calls the primary resource and, on a failure the policy accepts, makes a
/// single call to the fallback resource instead.
#[derive(Debug, Clone)]
pub struct FallbackClient {
    client: Client,
    primary_url: Url,
    fallback_url: Url,
    policy: FallbackPolicy,
}

impl FallbackClient {
    pub fn new(client: Client, settings: FallbackSettings) -> Result<Self> {
        let base = Url::parse(&settings.base_url)?;
        let primary_url = base.join(&settings.primary_path)?;
        let fallback_url = base.join(&settings.fallback_path)?;

        for (field, url) in [
            ("upstream.primary_path", &primary_url),
            ("upstream.fallback_path", &fallback_url),
        ] {
            if url.origin() != base.origin() {
                return Err(UsersError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: url.to_string(),
                    reason: format!("Resource must stay on {}", base.origin().ascii_serialization()),
                });
            }
        }

        Ok(Self {
            client,
            primary_url,
            fallback_url,
            policy: settings.policy,
        })
    }

    pub fn primary_url(&self) -> &Url {
        &self.primary_url
    }

    pub fn fallback_url(&self) -> &Url {
        &self.fallback_url
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub async fn fetch(&self, cancel: &CancellationToken) -> Result<String> {
        let error = match self.get_text(Attempt::Primary, cancel).await {
            Ok(body) => return Ok(body),
            Err(error) => error,
        };

        if !self.policy.should_fallback(&error) {
            tracing::debug!(
                policy = %self.policy,
                "Primary failure does not qualify for fallback: {}",
                error
            );
            return Err(error);
        }

        tracing::warn!(
            fallback_url = %self.fallback_url,
            "Primary request failed, using fallback: {}",
            error
        );

        let body = self.get_text(Attempt::Fallback, cancel).await?;
        tracing::info!(fallback_url = %self.fallback_url, "Fallback served the response");
        Ok(body)
    }

    async fn get_text(&self, attempt: Attempt, cancel: &CancellationToken) -> Result<String> {
        let url = match attempt {
            Attempt::Primary => &self.primary_url,
            Attempt::Fallback => &self.fallback_url,
        };

        tracing::debug!(%attempt, "Making API request to: {}", url);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(%attempt, "Request to {} cancelled", url);
                Err(UsersError::Cancelled)
            }
            result = self.send(url) => result,
        }
    }

    async fn send(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(UsersError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl UsersService for FallbackClient {
    async fn get_users(&self, cancel: &CancellationToken) -> Result<String> {
        self.fetch(cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StatusRange;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn client_for(server: &MockServer, policy: FallbackPolicy) -> FallbackClient {
        FallbackClient::new(
            Client::new(),
            FallbackSettings {
                base_url: server.base_url(),
                primary_path: "/userss".to_string(),
                fallback_path: "/users".to_string(),
                policy,
            },
        )
        .unwrap()
    }

    #[test]
    fn resolves_paths_against_base_url() {
        let client = FallbackClient::new(
            Client::new(),
            FallbackSettings {
                base_url: "https://jsonplaceholder.typicode.com".to_string(),
                primary_path: "/userss".to_string(),
                fallback_path: "/users".to_string(),
                policy: FallbackPolicy::default(),
            },
        )
        .unwrap();

        assert_eq!(
            client.primary_url().as_str(),
            "https://jsonplaceholder.typicode.com/userss"
        );
        assert_eq!(
            client.fallback_url().as_str(),
            "https://jsonplaceholder.typicode.com/users"
        );
    }

    #[test]
    fn rejects_unparsable_base_url() {
        let result = FallbackClient::new(
            Client::new(),
            FallbackSettings {
                base_url: "not a url".to_string(),
                primary_path: "/userss".to_string(),
                fallback_path: "/users".to_string(),
                policy: FallbackPolicy::default(),
            },
        );

        assert!(matches!(result, Err(UsersError::UrlError(_))));
    }

    #[test]
    fn rejects_paths_that_leave_the_base_host() {
        for (primary_path, fallback_path) in [
            ("/userss", "//evil.example/users"),
            ("https://evil.example/userss", "/users"),
        ] {
            let result = FallbackClient::new(
                Client::new(),
                FallbackSettings {
                    base_url: "https://jsonplaceholder.typicode.com".to_string(),
                    primary_path: primary_path.to_string(),
                    fallback_path: fallback_path.to_string(),
                    policy: FallbackPolicy::default(),
                },
            );

            assert!(
                matches!(result, Err(UsersError::InvalidConfigValueError { .. })),
                "{} / {} should be rejected",
                primary_path,
                fallback_path
            );
        }
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let server = MockServer::start();
        let primary = server.mock(|when, then| {
            when.method(GET).path("/userss");
            then.status(200).body("Some response");
        });
        let fallback = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200).body("unused");
        });

        let client = client_for(&server, FallbackPolicy::default());
        let body = client.fetch(&CancellationToken::new()).await.unwrap();

        assert_eq!(body, "Some response");
        primary.assert_hits(1);
        fallback.assert_hits(0);
    }

    #[tokio::test]
    async fn not_found_in_range_uses_fallback() {
        let server = MockServer::start();
        let primary = server.mock(|when, then| {
            when.method(GET).path("/userss");
            then.status(404);
        });
        let fallback = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200).body("[{\"id\":1}]");
        });

        let client = client_for(&server, FallbackPolicy::default());
        let body = client.fetch(&CancellationToken::new()).await.unwrap();

        assert_eq!(body, "[{\"id\":1}]");
        primary.assert_hits(1);
        fallback.assert_hits(1);
    }

    #[tokio::test]
    async fn custom_range_is_honoured() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/userss");
            then.status(503);
        });
        let fallback = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200).body("backup");
        });

        let policy = FallbackPolicy::StatusRange(StatusRange::new(500, 599));
        let client = client_for(&server, policy);
        let body = client.fetch(&CancellationToken::new()).await.unwrap();

        assert_eq!(body, "backup");
        fallback.assert_hits(1);
    }

    #[tokio::test]
    async fn already_cancelled_token_issues_no_request() {
        let server = MockServer::start();
        let primary = server.mock(|when, then| {
            when.method(GET).path("/userss");
            then.status(200).body("Some response");
        });

        let cancel = CancellationToken::new();
        cancel.cancel();

        let client = client_for(&server, FallbackPolicy::AnyFailure);
        let result = client.fetch(&cancel).await;

        assert!(matches!(result, Err(UsersError::Cancelled)));
        primary.assert_hits(0);
    }

    #[tokio::test]
    async fn cancellation_during_fallback_is_terminal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/userss");
            then.status(500);
        });
        server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200)
                .body("too late")
                .delay(Duration::from_secs(5));
        });

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        let client = client_for(&server, FallbackPolicy::default());
        let result = client.fetch(&cancel).await;

        assert!(matches!(result, Err(UsersError::Cancelled)));
    }
}
