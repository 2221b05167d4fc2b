//! Paging over ARM list operations.
//!
//! List operations return `{ "value": [...], "nextLink": "..." }`. A
//! [`Pager`] sends the first request as built by the service crate, then
//! follows `nextLink` with `GET` until it is empty or absent.
//!
//! ```rust,no_run
//! use azure_mgmt_core::models::Operation;
//! use azure_mgmt_core::pager::Pager;
//!
//! # async fn example(mut pager: Pager<Operation>) -> azure_mgmt_core::error::ArmResult<()> {
//! while let Some(page) = pager.next_page().await? {
//!     for op in page.value {
//!         println!("{:?}", op.name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use crate::client::{decode_body, ArmClient};
use crate::error::{ArmError, ArmResult};
use crate::models::ListResult;
use crate::request::ArmRequest;
use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use url::Url;

/// Iterator over the pages of a list operation.
#[derive(Debug)]
pub struct Pager<T> {
    client: ArmClient,
    next: Option<ArmRequest>,
    pages: usize,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Pager<T> {
    /// Create a pager whose first page is fetched with `first`.
    pub fn new(client: &ArmClient, first: ArmRequest) -> Self {
        Self {
            client: client.clone(),
            next: Some(first),
            pages: 0,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns `true` while there are pages left to fetch.
    pub fn more(&self) -> bool {
        self.next.is_some()
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Fetch the next page, or `None` once the last page has been returned.
    pub async fn next_page(&mut self) -> ArmResult<Option<ListResult<T>>> {
        let Some(request) = self.next.take() else {
            return Ok(None);
        };

        let response = self.client.send(&request, &[200]).await?;
        let body = response.bytes().await?;
        let page: ListResult<T> = decode_body(&body)?;
        self.pages += 1;

        self.next = match page.next_link.as_deref() {
            Some(link) if !link.is_empty() => {
                let url = Url::parse(link).map_err(|e| {
                    ArmError::invalid_endpoint_with_source("invalid nextLink", e)
                })?;
                Some(ArmRequest::get(url))
            }
            _ => None,
        };

        tracing::debug!(
            page = self.pages,
            items = page.value.len(),
            more = self.next.is_some(),
            "fetched page"
        );
        Ok(Some(page))
    }

    /// Flatten the remaining pages into a stream of items.
    pub fn into_stream(self) -> impl Stream<Item = ArmResult<T>> {
        stream::try_unfold(self, |mut pager| async move {
            Ok::<_, ArmError>(pager.next_page().await?.map(|page| (page, pager)))
        })
        .map_ok(|page| stream::iter(page.value.into_iter().map(Ok::<T, ArmError>)))
        .try_flatten()
    }

    /// Fetch every remaining page and collect the items.
    pub async fn collect_all(mut self) -> ArmResult<Vec<T>> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page.value);
        }
        Ok(items)
    }
}
