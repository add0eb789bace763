// lib/src/pages/list.rs

use std::future::Future;

use log::debug;

use models::Identified;

use crate::errors::{PortalError, PortalResult};
use crate::notice::Notice;

/// Local state behind a table view. Every load replaces the rows wholesale.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    items: Vec<T>,
    loading: bool,
    loaded: bool,
    notice: Option<Notice>,
}

impl<T> Default for ListPage<T> {
    fn default() -> Self {
        ListPage { items: Vec::new(), loading: false, loaded: false, notice: None }
    }
}

impl<T: Identified> ListPage<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `fetch` and, on success, swaps in its rows. On failure the
    /// previous rows stay and the error becomes the page notice.
    pub async fn load<E, Fut>(&mut self, fetch: Fut) -> PortalResult<usize>
    where
        Fut: Future<Output = Result<Vec<T>, E>>,
        PortalError: From<E>,
    {
        self.loading = true;
        let result = fetch.await.map_err(PortalError::from);
        self.loading = false;
        match result {
            Ok(items) => {
                debug!("Loaded {} rows", items.len());
                self.items = items;
                self.loaded = true;
                self.notice = None;
                Ok(self.items.len())
            }
            Err(err) => {
                self.notice = Some(Notice::from_error(&err));
                Err(err)
            }
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Loaded at least once and nothing came back.
    pub fn is_empty(&self) -> bool {
        self.loaded && self.items.is_empty()
    }

    pub fn find(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn find_mut(&mut self, id: i64) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Swaps in a fresh copy of one row; `false` when the id is not listed.
    pub fn replace(&mut self, item: T) -> bool {
        match self.find_mut(item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: i64) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        self.items.sort_by(compare);
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Records `err` as the page notice and hands it back.
    pub fn fail(&mut self, err: PortalError) -> PortalError {
        self.notice = Some(Notice::from_error(&err));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_api::ApiError;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(i64);

    impl Identified for Row {
        fn id(&self) -> i64 {
            self.0
        }
    }

    #[tokio::test]
    async fn load_replaces_rows_and_failure_keeps_them() {
        let mut page = ListPage::new();
        page.load(async { Ok::<_, ApiError>(vec![Row(1), Row(2)]) }).await.unwrap();
        assert_eq!(page.items(), &[Row(1), Row(2)]);

        page.load(async { Ok::<_, ApiError>(vec![Row(3)]) }).await.unwrap();
        assert_eq!(page.items(), &[Row(3)]);

        let err = page.load(async { Err::<Vec<Row>, _>(ApiError::Timeout) }).await.unwrap_err();
        assert!(matches!(err, PortalError::Api(ApiError::Timeout)));
        assert_eq!(page.items(), &[Row(3)]);
        assert!(page.notice().is_some_and(|n| n.is_error()));
        assert!(!page.is_loading());
    }

    #[tokio::test]
    async fn remove_and_replace_by_id() {
        let mut page = ListPage::new();
        page.load(async { Ok::<_, ApiError>(vec![Row(1), Row(2)]) }).await.unwrap();
        assert_eq!(page.remove(1), Some(Row(1)));
        assert_eq!(page.remove(1), None);
        assert!(page.replace(Row(2)));
        assert!(!page.replace(Row(9)));
        assert!(!page.is_empty());
    }
}
