//! Mailchimp Marketing API client (reqwest, HTTP basic auth).

use reqwest::{Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::MailchimpConfig;
use crate::error::MailchimpError;
use crate::mailchimp::payload::MemberPayload;

/// Largest page the lists endpoint returns.
const LIST_PAGE_SIZE: u32 = 1000;

/// An audience (list) in the account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AudienceList {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ListsResponse {
    #[serde(default)]
    lists: Vec<AudienceList>,
}

#[derive(Debug, Deserialize)]
struct PingResponse {
    health_status: String,
}

/// Error document returned by the API on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: String,
}

/// Mailchimp client bound to one account.
pub struct MailchimpClient {
    http: reqwest::Client,
    api_root: String,
    api_key: SecretString,
}

impl MailchimpClient {
    pub fn new(config: &MailchimpConfig) -> Result<Self, MailchimpError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MailchimpError::RequestFailed {
                endpoint: "client".into(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            api_root: config.api_root(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, MailchimpError> {
        let resp = self
            .http
            .get(self.url(path))
            .basic_auth("anystring", Some(self.api_key.expose_secret()))
            .send()
            .await
            .map_err(|e| request_failed(path, e))?;
        let resp = check_status(path, resp).await?;
        resp.json::<T>()
            .await
            .map_err(|e| MailchimpError::InvalidResponse {
                endpoint: path.to_string(),
                reason: e.to_string(),
            })
    }

    /// Verify the credentials against `GET /ping`.
    pub async fn ping(&self) -> Result<String, MailchimpError> {
        let pong: PingResponse = self.get_json("ping").await?;
        tracing::info!(health = %pong.health_status, "Mailchimp credentials verified");
        Ok(pong.health_status)
    }

    /// Every audience in the account.
    pub async fn lists(&self) -> Result<Vec<AudienceList>, MailchimpError> {
        let path = format!("lists?count={LIST_PAGE_SIZE}&fields=lists.id,lists.name");
        let resp: ListsResponse = self.get_json(&path).await?;
        tracing::debug!(count = resp.lists.len(), "Fetched Mailchimp lists");
        Ok(resp.lists)
    }

    /// `{root}/lists/{list_id}/members`, with the id as one encoded segment.
    fn members_url(&self, list_id: &str) -> Result<Url, MailchimpError> {
        let invalid = |reason: String| MailchimpError::RequestFailed {
            endpoint: format!("lists/{list_id}/members"),
            reason,
        };
        let mut url = Url::parse(&self.api_root).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid(format!("{} cannot take a path", self.api_root)))?
            .pop_if_empty()
            .extend(["lists", list_id, "members"]);
        Ok(url)
    }

    /// Add one member to `list_id`.
    pub async fn add_member(&self, list_id: &str, member: &MemberPayload) -> Result<(), MailchimpError> {
        let path = format!("lists/{list_id}/members");
        let resp = self
            .http
            .post(self.members_url(list_id)?)
            .basic_auth("anystring", Some(self.api_key.expose_secret()))
            .json(member)
            .send()
            .await
            .map_err(|e| request_failed(&path, e))?;
        check_status(&path, resp).await?;
        Ok(())
    }
}

fn request_failed(endpoint: &str, e: reqwest::Error) -> MailchimpError {
    MailchimpError::RequestFailed {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    }
}

/// Turn non-2xx responses into errors carrying the API's title and detail.
async fn check_status(endpoint: &str, resp: Response) -> Result<Response, MailchimpError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let raw = resp.text().await.unwrap_or_default();
    let body: ApiErrorBody = serde_json::from_str(&raw).unwrap_or_default();
    tracing::warn!(endpoint, status = status.as_u16(), title = %body.title, "Mailchimp request rejected");

    if status == StatusCode::UNAUTHORIZED {
        let reason = if body.detail.is_empty() { raw } else { body.detail };
        return Err(MailchimpError::AuthFailed(reason));
    }

    Err(MailchimpError::Api {
        status: status.as_u16(),
        title: if body.title.is_empty() {
            status.canonical_reason().unwrap_or("Unknown").to_string()
        } else {
            body.title
        },
        detail: body.detail,
    })
}
