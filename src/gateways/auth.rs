//! Auth service HTTP adapter

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use super::{check_response, AuthGateway, GatewayError};
use crate::application::{UserIdentity, ValidatedUser};

/// Resolves identities against the auth service, forwarding the caller's bearer token
#[derive(Clone)]
pub struct HttpAuthGateway {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UsersBatchRequest<'a> {
    user_ids: &'a [Uuid],
}

impl HttpAuthGateway {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn resolve_user_by_document(
        &self,
        document: &str,
        token: &str,
    ) -> Result<ValidatedUser, GatewayError> {
        let url = format!("{}/api/v1/users/document/{}", self.base_url, document);

        let response = self.client.get(&url).bearer_auth(token).send().await?;
        let user = check_response(response).await?.json::<ValidatedUser>().await?;

        Ok(user)
    }

    async fn resolve_users_by_ids(
        &self,
        ids: &[Uuid],
        token: &str,
    ) -> Result<HashMap<Uuid, UserIdentity>, GatewayError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = format!("{}/api/v1/users/batch", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&UsersBatchRequest { user_ids: ids })
            .send()
            .await?;

        let users = check_response(response)
            .await?
            .json::<Vec<UserIdentity>>()
            .await?;

        tracing::debug!(requested = ids.len(), resolved = users.len(), "Resolved user identities");

        Ok(users.into_iter().map(|user| (user.id, user)).collect())
    }
}
