//! Page-number pagination over list endpoints

use crate::github::client::GitHubClient;
use crate::github::error::{GitHubError, GitHubResult};
use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A list endpoint plus the filters sent with every page.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub path: String,
    pub per_page: u32,
    pub params: Vec<(&'static str, String)>,
}

impl PageRequest {
    pub fn new(path: impl Into<String>, per_page: u32) -> Self {
        Self {
            path: path.into(),
            per_page: per_page.max(1),
            params: Vec::new(),
        }
    }

    /// Server-side `since` filter (ISO 8601).
    #[must_use]
    pub fn since(self, since: Option<&str>) -> Self {
        match since {
            Some(s) => self.param("since", s),
            None => self,
        }
    }

    #[must_use]
    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }
}

/// Lazily walk pages 1, 2, ... of `request`, yielding every item.
///
/// Stops after the first page holding fewer than `per_page` items, an empty
/// page, or a body that is not a JSON array. Each call starts again at page 1.
pub fn paginate<T>(
    client: &GitHubClient,
    request: PageRequest,
) -> impl Stream<Item = GitHubResult<T>> + '_
where
    T: DeserializeOwned + 'static,
{
    stream::try_unfold(Some(1u32), move |next_page| {
        let request = request.clone();
        async move {
            match next_page {
                Some(page) => fetch_page::<T>(client, &request, page).await,
                None => Ok(None),
            }
        }
    })
    .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, GitHubError>)))
    .try_flatten()
}

/// Fetch one page; returns its items and the next page number, or `None` when done.
async fn fetch_page<T>(
    client: &GitHubClient,
    request: &PageRequest,
    page: u32,
) -> GitHubResult<Option<(Vec<T>, Option<u32>)>>
where
    T: DeserializeOwned,
{
    let mut params = request.params.clone();
    params.push(("per_page", request.per_page.to_string()));
    params.push(("page", page.to_string()));

    let body: Value = client.get(&request.path, &params).await?;
    let Value::Array(raw) = body else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }

    let is_last = raw.len() < request.per_page as usize;
    let items = raw
        .into_iter()
        .map(|item| {
            serde_json::from_value::<T>(item).map_err(|source| GitHubError::Json {
                url: request.path.clone(),
                source,
            })
        })
        .collect::<GitHubResult<Vec<T>>>()?;

    let next = if is_last { None } else { Some(page + 1) };
    Ok(Some((items, next)))
}

/// Collect every page of `request` into memory.
pub async fn fetch_all<T>(client: &GitHubClient, request: PageRequest) -> GitHubResult<Vec<T>>
where
    T: DeserializeOwned + 'static,
{
    paginate(client, request).try_collect().await
}
