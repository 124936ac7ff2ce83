use async_trait::async_trait;
use tracing::debug;

use crate::domain::{
    AuthSession, DomainError, LoginCredentials, Match, MatchId, MatchStatus, Organization,
    OrganizationId, OrganizationPage, OrganizationQuery, Pagination, Player, PlayerId,
    RegisterCredentials, RosterBackend, SubscriptionStatus, User, UserId,
};
use crate::infrastructure::auth::TokenCell;
use crate::infrastructure::http::envelope::{ensure_success, field, field_or_default};
use crate::infrastructure::http::HttpClientTrait;

/// REST implementation of the roster backend
#[derive(Debug)]
pub struct RestRosterBackend<C: HttpClientTrait> {
    client: C,
    base_url: String,
    token: TokenCell,
}

impl<C: HttpClientTrait> RestRosterBackend<C> {
    pub fn new(client: C, base_url: impl Into<String>, token: TokenCell) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            base_url,
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
        fallback: &str,
    ) -> Result<serde_json::Value, DomainError> {
        let url = self.url(path);
        let bearer = self.token.bearer();
        let mut headers = vec![("Accept", "application/json")];
        if let Some(bearer) = bearer.as_deref() {
            headers.push(("Authorization", bearer));
        }

        debug!(url = %url, "GET");
        let envelope = self.client.get_json(&url, headers, query).await?;
        ensure_success(envelope, fallback)
    }

    async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
        fallback: &str,
    ) -> Result<serde_json::Value, DomainError> {
        let url = self.url(path);
        let bearer = self.token.bearer();
        let mut headers = vec![
            ("Accept", "application/json"),
            ("Content-Type", "application/json"),
        ];
        if let Some(bearer) = bearer.as_deref() {
            headers.push(("Authorization", bearer));
        }

        debug!(url = %url, "POST");
        let envelope = self.client.post_json(&url, headers, body).await?;
        ensure_success(envelope, fallback)
    }

    fn parse_session(mut envelope: serde_json::Value) -> Result<AuthSession, DomainError> {
        Ok(AuthSession {
            token: field(&mut envelope, "token")?,
            user: field(&mut envelope, "user")?,
        })
    }
}

#[async_trait]
impl<C: HttpClientTrait> RosterBackend for RestRosterBackend<C> {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, DomainError> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| DomainError::internal(format!("Failed to encode credentials: {}", e)))?;
        let envelope = self.post("/auth/login", &body, "Login failed").await?;
        Self::parse_session(envelope)
    }

    async fn register(
        &self,
        credentials: &RegisterCredentials,
    ) -> Result<AuthSession, DomainError> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| DomainError::internal(format!("Failed to encode credentials: {}", e)))?;
        let envelope = self.post("/auth/register", &body, "Registration failed").await?;
        Self::parse_session(envelope)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, DomainError> {
        let mut envelope = self
            .get(&format!("/users/{}", id), &[], "Failed to fetch user")
            .await?;
        field(&mut envelope, "user")
    }

    async fn get_organization(&self, id: &OrganizationId) -> Result<Organization, DomainError> {
        let mut envelope = self
            .get(&format!("/organizations/{}", id), &[], "Failed to fetch organization")
            .await?;
        field(&mut envelope, "organization")
    }

    async fn list_organizations(
        &self,
        query: &OrganizationQuery,
    ) -> Result<OrganizationPage, DomainError> {
        query
            .validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let mut envelope = self
            .get("/organizations", &query.to_params(), "Failed to fetch organizations")
            .await?;

        Ok(OrganizationPage {
            organizations: field_or_default(&mut envelope, "organizations")?,
            pagination: field_or_default::<Option<Pagination>>(&mut envelope, "pagination")?
                .unwrap_or_default(),
        })
    }

    async fn subscribe(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<(), DomainError> {
        let body = serde_json::json!({
            "userId": user_id,
            "organizationId": organization_id,
        });
        self.post("/users/subscribe", &body, "Failed to subscribe to team")
            .await?;
        Ok(())
    }

    async fn unsubscribe(&self, user_id: &UserId) -> Result<(), DomainError> {
        let body = serde_json::json!({ "userId": user_id });
        self.post("/users/unsubscribe", &body, "Failed to unsubscribe from team")
            .await?;
        Ok(())
    }

    async fn subscription_status(
        &self,
        user_id: &UserId,
    ) -> Result<SubscriptionStatus, DomainError> {
        let envelope = self
            .get(
                "/users/unsubscribe",
                &[("userId", user_id.to_string())],
                "Failed to check subscription status",
            )
            .await?;

        serde_json::from_value(envelope)
            .map_err(|e| DomainError::api(format!("Failed to parse subscription status: {}", e)))
    }

    async fn join_eligibility(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<bool, DomainError> {
        let mut envelope = self
            .get(
                "/users/subscribe",
                &[
                    ("userId", user_id.to_string()),
                    ("organizationId", organization_id.to_string()),
                ],
                "Failed to check eligibility",
            )
            .await?;
        field(&mut envelope, "canJoin")
    }

    async fn get_player(&self, id: &PlayerId) -> Result<Player, DomainError> {
        let mut envelope = self
            .get(&format!("/players/{}", id), &[], "Failed to fetch player")
            .await?;
        field(&mut envelope, "player")
    }

    async fn get_match(&self, id: &MatchId) -> Result<Match, DomainError> {
        let mut envelope = self
            .get(&format!("/matches/{}", id), &[], "Failed to fetch match")
            .await?;
        field(&mut envelope, "match")
    }

    async fn list_matches(
        &self,
        status: MatchStatus,
        limit: u32,
    ) -> Result<Vec<Match>, DomainError> {
        let mut envelope = self
            .get(
                "/matches",
                &[("status", status.to_string()), ("limit", limit.to_string())],
                "Failed to fetch matches",
            )
            .await?;
        field_or_default(&mut envelope, "matches")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::mock::MockHttpClient;

    const BASE: &str = "http://localhost:3000/api";

    fn user_json(organization_id: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "id": "user-1",
            "name": "Ana",
            "lastName": "Lopez",
            "email": "ana@example.com",
            "role": "user",
            "organizationId": organization_id,
            "status": "active",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        })
    }

    fn org_json(id: &str, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "description": "",
            "createdAt": "2024-01-01T00:00:00Z"
        })
    }

    fn backend(client: MockHttpClient, token: Option<&str>) -> RestRosterBackend<MockHttpClient> {
        let cell = TokenCell::new();
        cell.set(token.map(str::to_string));
        RestRosterBackend::new(client, format!("{}/", BASE), cell)
    }

    #[tokio::test]
    async fn test_login_parses_session() {
        let client = MockHttpClient::new().with_post(
            format!("{}/auth/login", BASE),
            serde_json::json!({ "success": true, "token": "jwt", "user": user_json(None) }),
        );
        let backend = backend(client, None);

        let session = backend
            .login(&LoginCredentials::new("ana@example.com", "secret"))
            .await
            .unwrap();

        assert_eq!(session.token, "jwt");
        assert_eq!(session.user.email(), "ana@example.com");

        let requests = backend.client.requests();
        assert_eq!(requests[0].authorization, None);
        assert_eq!(requests[0].body.as_ref().unwrap()["email"], "ana@example.com");
    }

    #[tokio::test]
    async fn test_login_failure_envelope() {
        let client = MockHttpClient::new().with_post(
            format!("{}/auth/login", BASE),
            serde_json::json!({ "success": false, "error": "Invalid credentials" }),
        );
        let backend = backend(client, None);

        let error = backend
            .login(&LoginCredentials::new("ana@example.com", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(error, DomainError::api("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_get_organization_sends_bearer() {
        let client = MockHttpClient::new().with_get(
            format!("{}/organizations/org-1", BASE),
            serde_json::json!({ "success": true, "organization": org_json("org-1", "Rivers") }),
        );
        let backend = backend(client, Some("jwt"));

        let org = backend
            .get_organization(&OrganizationId::new("org-1").unwrap())
            .await
            .unwrap();

        assert_eq!(org.name(), "Rivers");
        assert_eq!(
            backend.client.requests()[0].authorization.as_deref(),
            Some("Bearer jwt")
        );
    }

    #[tokio::test]
    async fn test_get_organization_not_found_passes_through() {
        let url = format!("{}/organizations/gone", BASE);
        let client = MockHttpClient::new().with_error(
            "GET",
            &url,
            DomainError::not_found("Organization not found"),
        );
        let backend = backend(client, Some("jwt"));

        let error = backend
            .get_organization(&OrganizationId::new("gone").unwrap())
            .await
            .unwrap_err();

        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn test_list_organizations_defaults_missing_pagination() {
        let client = MockHttpClient::new().with_get(
            format!("{}/organizations", BASE),
            serde_json::json!({
                "success": true,
                "organizations": [org_json("org-1", "Rivers"), org_json("org-2", "Harbor")]
            }),
        );
        let backend = backend(client, Some("jwt"));

        let page = backend
            .list_organizations(&OrganizationQuery::new().with_search("r"))
            .await
            .unwrap();

        assert_eq!(page.organizations.len(), 2);
        assert_eq!(page.pagination, Pagination::default());

        let query = &backend.client.requests()[0].query;
        assert!(query.contains(&("search".to_string(), "r".to_string())));
        assert!(query.contains(&("page".to_string(), "1".to_string())));
    }

    #[tokio::test]
    async fn test_list_organizations_rejects_bad_page() {
        let backend = backend(MockHttpClient::new(), Some("jwt"));

        let error = backend
            .list_organizations(&OrganizationQuery::new().with_page(0))
            .await
            .unwrap_err();

        assert!(matches!(error, DomainError::Validation { .. }));
        assert!(backend.client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_body() {
        let client = MockHttpClient::new().with_post(
            format!("{}/users/subscribe", BASE),
            serde_json::json!({ "success": true }),
        );
        let backend = backend(client, Some("jwt"));

        backend
            .subscribe(
                &UserId::new("user-1").unwrap(),
                &OrganizationId::new("org-1").unwrap(),
            )
            .await
            .unwrap();

        let body = backend.client.requests()[0].body.clone().unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "userId": "user-1", "organizationId": "org-1" })
        );
    }

    #[tokio::test]
    async fn test_subscribe_failure_without_message() {
        let client = MockHttpClient::new().with_post(
            format!("{}/users/subscribe", BASE),
            serde_json::json!({ "success": false }),
        );
        let backend = backend(client, Some("jwt"));

        let error = backend
            .subscribe(
                &UserId::new("user-1").unwrap(),
                &OrganizationId::new("org-1").unwrap(),
            )
            .await
            .unwrap_err();

        assert_eq!(error, DomainError::api("Failed to subscribe to team"));
    }

    #[tokio::test]
    async fn test_subscription_status() {
        let client = MockHttpClient::new().with_get(
            format!("{}/users/unsubscribe", BASE),
            serde_json::json!({ "success": true, "isSubscribed": true, "organizationId": "org-1" }),
        );
        let backend = backend(client, Some("jwt"));

        let status = backend
            .subscription_status(&UserId::new("user-1").unwrap())
            .await
            .unwrap();

        assert!(status.is_subscribed);
        assert_eq!(status.organization_id.unwrap().as_str(), "org-1");
    }

    #[tokio::test]
    async fn test_join_eligibility() {
        let client = MockHttpClient::new().with_get(
            format!("{}/users/subscribe", BASE),
            serde_json::json!({ "success": true, "canJoin": false }),
        );
        let backend = backend(client, Some("jwt"));

        let can_join = backend
            .join_eligibility(
                &UserId::new("user-1").unwrap(),
                &OrganizationId::new("org-1").unwrap(),
            )
            .await
            .unwrap();

        assert!(!can_join);
        let query = &backend.client.requests()[0].query;
        assert!(query.contains(&("organizationId".to_string(), "org-1".to_string())));
    }

    #[tokio::test]
    async fn test_list_matches_query() {
        let client = MockHttpClient::new().with_get(
            format!("{}/matches", BASE),
            serde_json::json!({ "success": true, "matches": [] }),
        );
        let backend = backend(client, Some("jwt"));

        let matches = backend.list_matches(MatchStatus::Active, 10).await.unwrap();

        assert!(matches.is_empty());
        assert_eq!(
            backend.client.requests()[0].query,
            vec![
                ("status".to_string(), "active".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_user() {
        let client = MockHttpClient::new().with_get(
            format!("{}/users/user-1", BASE),
            serde_json::json!({ "success": true, "user": user_json(Some("org-7")) }),
        );
        let backend = backend(client, Some("jwt"));

        let user = backend.get_user(&UserId::new("user-1").unwrap()).await.unwrap();
        assert_eq!(user.organization_id().unwrap().as_str(), "org-7");
    }
}
