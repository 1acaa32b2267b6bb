//! HTTP adapter for the remote `/posts` resource.

use async_trait::async_trait;
use metrics::counter;
use reqwest::{
    Client, Method, RequestBuilder, Response, Url,
    header::{ACCEPT, CACHE_CONTROL},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::repos::{PostsApi, PostsApiError};
use crate::config::RemoteSettings;
use crate::domain::posts::{Post, PostCreateRequest, PostId, PostUpdateRequest};

use super::error::InfraError;
use super::telemetry::REMOTE_REQUESTS_TOTAL;

const JSON: &str = "application/json";

#[derive(Clone, Debug)]
pub struct RemotePostsClient {
    client: Client,
    base: Url,
}

impl RemotePostsClient {
    pub fn new(settings: &RemoteSettings) -> Result<Self, InfraError> {
        let mut builder = Client::builder().user_agent(Self::user_agent());
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| {
            InfraError::configuration(format!("failed to build http client: {err}"))
        })?;

        Ok(Self {
            client,
            base: directory_url(settings.base_url.clone()),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("postdesk/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, PostsApiError> {
        self.base
            .join(path)
            .map_err(|err| PostsApiError::Url(err.to_string()))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, PostsApiError> {
        let url = self.url(path)?;
        debug!(target = "postdesk::remote", method = %method, url = %url, "sending request");
        Ok(self.client.request(method, url).header(ACCEPT, JSON))
    }

    async fn execute(request: RequestBuilder) -> Result<Response, PostsApiError> {
        let response = request.send().await.map_err(PostsApiError::transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PostsApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, PostsApiError> {
        let bytes = response.bytes().await.map_err(PostsApiError::transport)?;
        serde_json::from_slice(&bytes).map_err(PostsApiError::decode)
    }
}

fn directory_url(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn observe<T>(
    operation: &'static str,
    result: Result<T, PostsApiError>,
) -> Result<T, PostsApiError> {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(PostsApiError::Status { .. }) => "status",
        Err(PostsApiError::Decode(_)) => "decode",
        Err(PostsApiError::Transport(_) | PostsApiError::Url(_)) => "transport",
    };
    counter!(REMOTE_REQUESTS_TOTAL, "operation" => operation, "outcome" => outcome).increment(1);
    result
}

#[async_trait]
impl PostsApi for RemotePostsClient {
    async fn list_posts(&self) -> Result<Vec<Post>, PostsApiError> {
        let result: Result<Vec<Post>, PostsApiError> = async {
            let request = self
                .request(Method::GET, "posts")?
                .header(CACHE_CONTROL, "no-store");
            let response = Self::execute(request).await?;
            Self::decode(response).await
        }
        .await;
        observe("list", result)
    }

    async fn create_post(&self, request: PostCreateRequest) -> Result<Post, PostsApiError> {
        let result: Result<Post, PostsApiError> = async {
            let request = self.request(Method::POST, "posts")?.json(&request);
            let response = Self::execute(request).await?;
            Self::decode(response).await
        }
        .await;
        observe("create", result)
    }

    async fn update_post(&self, request: PostUpdateRequest) -> Result<Post, PostsApiError> {
        let result: Result<Post, PostsApiError> = async {
            let path = format!("posts/{}", request.id);
            let request = self.request(Method::PUT, &path)?.json(&request);
            let response = Self::execute(request).await?;
            Self::decode(response).await
        }
        .await;
        observe("update", result)
    }

    async fn delete_post(&self, id: PostId) -> Result<(), PostsApiError> {
        let result: Result<(), PostsApiError> = async {
            let request = self.request(Method::DELETE, &format!("posts/{id}"))?;
            Self::execute(request).await.map(|_| ())
        }
        .await;
        observe("delete", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = directory_url(Url::parse("https://example.com/api").expect("url"));
        assert_eq!(url.as_str(), "https://example.com/api/");
        assert_eq!(
            url.join("posts/3").expect("join").as_str(),
            "https://example.com/api/posts/3"
        );
    }

    #[test]
    fn root_base_url_is_untouched() {
        let url = directory_url(Url::parse("https://example.com").expect("url"));
        assert_eq!(url.as_str(), "https://example.com/");
    }
}
