use reqwest::{header, Client, Response};
use tracing::instrument;
use url::Url;

use sw_core::wire::{LoginRequest, LoginResponse, RecordPayload, RecordResponse};
use sw_core::{Id, Password, Record, Username};

use crate::{ClientConfig, ClientError, ClientResult};

/// Async client for the record service, holding the session token once logged in.
#[derive(Debug, Clone)]
pub struct RecordClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl RecordClient {
    /// Create a client for the service described by `config`.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url()?,
            token: None,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Exchange credentials for a session token.
    #[instrument(skip_all, fields(username = %username), level = "info")]
    pub async fn login(&mut self, username: &Username, password: &Password) -> ClientResult<()> {
        let url = self.base_url.join("auth/login/")?;
        let body = LoginRequest {
            username: username.as_str(),
            email: "",
            password: password.as_str(),
        };
        let response = self.client.post(url).json(&body).send().await?;
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "login rejected");
            return Err(ClientError::Unauthorized);
        }
        let login: LoginResponse = response.json().await?;
        self.token = Some(login.key);
        tracing::info!("logged in");
        Ok(())
    }

    /// End the session. The local token is dropped even if the service call fails.
    #[instrument(skip_all, level = "info")]
    pub async fn logout(&mut self) -> ClientResult<()> {
        let token = self.token.take().ok_or(ClientError::NotAuthenticated)?;
        let url = self.base_url.join("auth/logout/")?;
        let response = self
            .client
            .post(url)
            .header(header::AUTHORIZATION, format!("Token {token}"))
            .send()
            .await?;
        check_response(response).await?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Fetch every record, validating each one.
    #[instrument(skip(self), level = "debug")]
    pub async fn list_records(&self) -> ClientResult<Vec<Record>> {
        let url = self.base_url.join("records/")?;
        let response = self.authorized(self.client.get(url))?.send().await?;
        let listed: Vec<RecordResponse> = check_response(response).await?.json().await?;
        let records = listed
            .iter()
            .map(Record::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = records.len(), "fetched records");
        Ok(records)
    }

    /// Store a new record.
    #[instrument(skip(self, record), level = "debug")]
    pub async fn create_record(&self, record: &Record) -> ClientResult<()> {
        let url = self.base_url.join("records/")?;
        let payload = RecordPayload::from(record);
        let response = self
            .authorized(self.client.post(url))?
            .json(&payload)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }

    /// Delete a record by its server id.
    #[instrument(skip(self), level = "debug")]
    pub async fn delete_record(&self, id: Id) -> ClientResult<()> {
        let url = self.base_url.join(&format!("records/{id}/"))?;
        let response = self.authorized(self.client.delete(url))?.send().await?;
        check_response(response).await?;
        Ok(())
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> ClientResult<reqwest::RequestBuilder> {
        let token = self.token.as_ref().ok_or(ClientError::NotAuthenticated)?;
        Ok(request.header(header::AUTHORIZATION, format!("Token {token}")))
    }
}

async fn check_response(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
