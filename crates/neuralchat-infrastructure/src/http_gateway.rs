//! HttpChatGateway - REST implementation of the chat and auth gateways.
//!
//! The session credential is a cookie set by `POST /api/auth/login`; the
//! client keeps it in reqwest's cookie store and sends it with every request.
//! No request timeout is configured: in-flight calls either complete or fail.

use crate::dto::{
    ChatListResponse, CredentialsRequest, ErrorBody, MessageListResponse, SendMessageRequest,
    SendMessageResponse,
};
use async_trait::async_trait;
use neuralchat_core::{
    AppendedMessage, AuthGateway, ChatError, ChatGateway, ChatId, ChatSummary, CreatedChat,
    Credentials, MessageRecord, Result,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// Gateway that talks to the chat server's JSON API.
#[derive(Clone)]
pub struct HttpChatGateway {
    client: Client,
    base_url: String,
}

impl HttpChatGateway {
    /// Creates a gateway for the server at `base_url` with its own cookie jar.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ChatError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Uses an existing client, e.g. one that already carries a session cookie.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message);
        tracing::debug!(status = status.as_u16(), ?message, "chat server rejected request");
        Err(ChatError::remote(status.as_u16(), message))
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.execute(request).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn list_chats(&self) -> Result<Vec<ChatSummary>> {
        let body: ChatListResponse = self
            .fetch_json(self.client.get(self.url("/api/chat/all")))
            .await?;
        Ok(body.chats.into_iter().map(ChatSummary::from).collect())
    }

    async fn read_messages(&self, chat_id: &ChatId) -> Result<Vec<MessageRecord>> {
        let url = self.url(&format!("/api/chat/{chat_id}/messages"));
        let body: MessageListResponse = self.fetch_json(self.client.get(url)).await?;
        Ok(body.prompts.into_iter().map(MessageRecord::from).collect())
    }

    async fn create_chat(&self, prompt: &str, model: &str) -> Result<CreatedChat> {
        let request = self
            .client
            .post(self.url("/api/chat/new/message"))
            .json(&SendMessageRequest { prompt, model });
        let body: SendMessageResponse = self.fetch_json(request).await?;

        let chat_id = body.chat_id.ok_or_else(|| ChatError::Decode {
            format: "JSON".to_string(),
            message: "create response is missing `chatId`".to_string(),
        })?;

        Ok(CreatedChat {
            chat_id: ChatId::new(chat_id),
            title: body.title.unwrap_or_else(|| prompt.to_string()),
            response: body.response,
            message_id: body.message_id,
        })
    }

    async fn append_message(
        &self,
        chat_id: &ChatId,
        prompt: &str,
        model: &str,
    ) -> Result<AppendedMessage> {
        let request = self
            .client
            .post(self.url(&format!("/api/chat/{chat_id}/message")))
            .json(&SendMessageRequest { prompt, model });
        let body: SendMessageResponse = self.fetch_json(request).await?;

        Ok(AppendedMessage {
            response: body.response,
            message_id: body.message_id,
        })
    }

    async fn delete_chat(&self, chat_id: &ChatId) -> Result<()> {
        let url = self.url(&format!("/api/chat/{chat_id}"));
        self.execute(self.client.delete(url)).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for HttpChatGateway {
    async fn login(&self, credentials: &Credentials) -> Result<()> {
        let request = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&CredentialsRequest {
                user_name: &credentials.user_name,
                email: &credentials.email,
                password: &credentials.password,
            });
        self.execute(request).await?;
        Ok(())
    }

    async fn register(&self, credentials: &Credentials) -> Result<()> {
        let request = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&CredentialsRequest {
                user_name: &credentials.user_name,
                email: &credentials.email,
                password: &credentials.password,
            });
        self.execute(request).await?;
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        self.execute(self.client.post(self.url("/api/auth/logout")))
            .await?;
        Ok(())
    }
}
