//! List/detail/mutate resource management
//!
//! A [`ResourceManager`] owns one screen's fetched page, its cursor and
//! filters, and the form currently open on it. Every mutation is followed by
//! a re-fetch of the current page; nothing is patched in place.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::debounce::Debouncer;
use crate::envelope::{Page, PageInfo};
use crate::error::{Error, Notice, Notifier};

/// Quiescence period applied to typed search input unless configured otherwise
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Operator-facing strings for one resource
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub fetch_failed: &'static str,
    pub created: &'static str,
    pub create_failed: &'static str,
    pub updated: &'static str,
    pub update_failed: &'static str,
    pub deleted: &'static str,
    pub delete_failed: &'static str,
    pub detail_failed: &'static str,
}

/// Server-side list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Restrict to one locale, `None` means all
    pub locale: Option<String>,
}

impl ListFilter {
    /// Filter for a locale selector value, `"all"` clears it
    pub fn locale(value: &str) -> Self {
        let value = value.trim();
        Self {
            locale: (!value.is_empty() && !value.eq_ignore_ascii_case("all")).then(|| value.to_string()),
        }
    }
}

/// One remote entity type the console manages
#[async_trait]
pub trait Resource: Send + Sync {
    /// The record shown in the list and edited in the form
    type Item: Clone + Send + Sync;

    /// Extra data fetched only while a record is being viewed
    type Detail: Default + Send + Sync;

    fn labels(&self) -> &'static Labels;

    /// Field the free-text search matches against
    fn search_text<'a>(&self, item: &'a Self::Item) -> &'a str;

    /// Record the create form starts from, `None` when creation is not offered
    fn blank(&self) -> Option<Self::Item> {
        None
    }

    async fn fetch_page(&self, page: u32, filter: &ListFilter) -> Result<Page<Self::Item>, Error>;

    async fn create(&self, _item: &Self::Item) -> Result<Option<String>, Error> {
        Err(Error::unsupported("create"))
    }

    async fn update(&self, item: &Self::Item) -> Result<Option<String>, Error>;

    async fn delete(&self, item: &Self::Item) -> Result<Option<String>, Error>;

    async fn fetch_detail(&self, _item: &Self::Item) -> Result<Self::Detail, Error> {
        Ok(Self::Detail::default())
    }
}

/// Lifecycle of a manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    Idle,
    Loading,
    Loaded,
    Mutating,
    /// The last list fetch failed
    Error,
}

/// How the form was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    View,
    Edit,
    Create,
}

/// The open create/view/edit dialog
#[derive(Debug, Clone)]
pub struct Form<T, D> {
    pub mode: FormMode,
    pub record: T,
    /// View-only detail, discarded on close
    pub detail: D,
}

impl<T, D> Form<T, D> {
    pub fn is_read_only(&self) -> bool {
        self.mode == FormMode::View
    }
}

/// Case-insensitive substring filter; an empty query keeps everything
pub fn filter_by_substring<'a, T, F>(items: &'a [T], query: &str, field: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| field(item).to_lowercase().contains(&needle))
        .collect()
}

/// List, search, paginate and mutate one resource
pub struct ResourceManager<R: Resource> {
    pub(crate) resource: R,
    notifier: Arc<dyn Notifier>,
    state: ManagerState,
    items: Vec<R::Item>,
    page: PageInfo,
    /// Set once a fetch has reported the page count
    cursor_known: bool,
    filter: ListFilter,
    query: String,
    search: SearchBox,
    settled: mpsc::UnboundedReceiver<String>,
    form: Option<Form<R::Item, R::Detail>>,
    fetches: usize,
}

impl<R: Resource> ResourceManager<R> {
    pub fn new(resource: R, notifier: Arc<dyn Notifier>) -> Self {
        let (search, settled) = SearchBox::new(DEFAULT_SEARCH_DEBOUNCE);
        Self {
            resource,
            notifier,
            state: ManagerState::Idle,
            items: Vec::new(),
            page: PageInfo::default(),
            cursor_known: false,
            filter: ListFilter::default(),
            query: String::new(),
            search,
            settled,
            form: None,
            fetches: 0,
        }
    }

    /// Replace the quiescence period used by [`ResourceManager::search_input`]
    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        let (search, settled) = SearchBox::new(delay);
        self.search = search;
        self.settled = settled;
        self
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn state(&self) -> ManagerState {
        self.state
    }

    /// Everything the last fetch returned
    pub fn items(&self) -> &[R::Item] {
        &self.items
    }

    /// The fetched page narrowed by the search query
    pub fn visible(&self) -> Vec<&R::Item> {
        filter_by_substring(&self.items, &self.query, |item| self.resource.search_text(item))
    }

    pub fn page_info(&self) -> PageInfo {
        self.page
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Number of list fetches issued so far
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    pub fn form(&self) -> Option<&Form<R::Item, R::Detail>> {
        self.form.as_ref()
    }

    /// Mutable access to the record being edited
    pub fn form_mut(&mut self) -> Option<&mut Form<R::Item, R::Detail>> {
        self.form.as_mut()
    }

    fn emit(&self, notice: Notice) -> Notice {
        self.notifier.notify(&notice);
        notice
    }

    /// Fetch the current page
    pub async fn load(&mut self) -> bool {
        self.fetch(self.page.page).await
    }

    /// Fetch `page`, keeping the current filter.
    ///
    /// Once the page count is known the request is clamped into range.
    pub async fn go_to(&mut self, page: u32) -> bool {
        let page = if self.cursor_known {
            page.clamp(1, self.page.total_pages)
        } else {
            page.max(1)
        };
        self.fetch(page).await
    }

    /// Advance one page; does nothing on the last page
    pub async fn next_page(&mut self) -> bool {
        match self.page.next_page() {
            Some(page) => self.fetch(page).await,
            None => false,
        }
    }

    /// Go back one page; does nothing on the first page
    pub async fn previous_page(&mut self) -> bool {
        match self.page.previous_page() {
            Some(page) => self.fetch(page).await,
            None => false,
        }
    }

    /// Replace the server-side filter and fetch its first page
    pub async fn set_filter(&mut self, filter: ListFilter) -> bool {
        self.set_filter_at(filter, 1).await
    }

    /// Replace the server-side filter and fetch `page` of it in one request
    pub async fn set_filter_at(&mut self, filter: ListFilter, page: u32) -> bool {
        self.filter = filter;
        self.cursor_known = false;
        self.fetch(page.max(1)).await
    }

    /// Narrow the fetched page client-side, right away
    pub fn set_search(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Record a keystroke; the query only changes once typing has settled
    pub fn search_input(&mut self, text: &str) {
        self.search.input(text);
    }

    /// Apply the latest settled query, if one arrived.
    ///
    /// Returns `true` when the visible rows may have changed.
    pub fn apply_settled(&mut self) -> bool {
        let mut latest = None;
        while let Ok(query) = self.settled.try_recv() {
            latest = Some(query);
        }
        match latest {
            Some(query) if query != self.query => {
                self.query = query;
                true
            }
            _ => false,
        }
    }

    async fn fetch(&mut self, page: u32) -> bool {
        match self.fetch_once(page).await {
            Some(total_pages) if page > total_pages => {
                log::debug!("page {} is past the last page {}, fetching that instead", page, total_pages);
                self.fetch_once(total_pages).await.is_some()
            }
            outcome => outcome.is_some(),
        }
    }

    /// One list request; yields the reported page count on success
    async fn fetch_once(&mut self, page: u32) -> Option<u32> {
        self.state = ManagerState::Loading;
        self.fetches += 1;

        match self.resource.fetch_page(page, &self.filter).await {
            Ok(fetched) => {
                self.items = fetched.items;
                self.page = fetched.info;
                self.cursor_known = true;
                self.state = ManagerState::Loaded;
                Some(self.page.total_pages)
            }
            Err(e) => {
                log::warn!("list fetch for page {} failed: {}", page, e);
                self.emit(Notice::from_error(&e, self.resource.labels().fetch_failed));
                self.state = ManagerState::Error;
                None
            }
        }
    }

    /// Open an empty create form
    pub fn open_create(&mut self) -> bool {
        match self.resource.blank() {
            Some(record) => {
                self.form = Some(Form {
                    mode: FormMode::Create,
                    record,
                    detail: R::Detail::default(),
                });
                true
            }
            None => false,
        }
    }

    /// Open `item` read-only and fetch its detail
    pub async fn open_view(&mut self, item: &R::Item) {
        let detail = match self.resource.fetch_detail(item).await {
            Ok(detail) => detail,
            Err(e) => {
                self.emit(Notice::from_error(&e, self.resource.labels().detail_failed));
                R::Detail::default()
            }
        };
        self.form = Some(Form {
            mode: FormMode::View,
            record: item.clone(),
            detail,
        });
    }

    /// Open `item` pre-filled for editing
    pub fn open_edit(&mut self, item: &R::Item) {
        self.form = Some(Form {
            mode: FormMode::Edit,
            record: item.clone(),
            detail: R::Detail::default(),
        });
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Submit the open form.
    ///
    /// Returns `None` when no editable form is open. On success the form is
    /// closed and the current page re-fetched; on failure both are left as is.
    pub async fn submit(&mut self) -> Option<Notice> {
        let form = self.form.as_ref()?;
        let labels = self.resource.labels();

        if form.mode == FormMode::View {
            return None;
        }
        self.state = ManagerState::Mutating;

        let (result, ok, failed) = match form.mode {
            FormMode::Create => (self.resource.create(&form.record).await, labels.created, labels.create_failed),
            _ => (self.resource.update(&form.record).await, labels.updated, labels.update_failed),
        };

        let succeeded = result.is_ok();
        let notice = self.finish_mutation(result, ok, failed, false).await;
        if succeeded {
            self.form = None;
        }
        Some(notice)
    }

    /// Delete `item` right away; the page is re-fetched whatever the outcome
    pub async fn delete(&mut self, item: &R::Item) -> Notice {
        let labels = self.resource.labels();
        self.begin_mutation();
        let result = self.resource.delete(item).await;
        self.finish_mutation(result, labels.deleted, labels.delete_failed, true).await
    }

    /// Mark a write as in flight
    pub(crate) fn begin_mutation(&mut self) {
        self.state = ManagerState::Mutating;
    }

    /// Notify about a write and re-fetch as required
    pub(crate) async fn finish_mutation(
        &mut self,
        result: Result<Option<String>, Error>,
        success: &str,
        failure: &str,
        refetch_on_failure: bool,
    ) -> Notice {
        let notice = match &result {
            Ok(message) => Notice::from_message(message.clone(), success),
            Err(e) => Notice::from_error(e, failure),
        };
        self.emit(notice.clone());

        if result.is_ok() || refetch_on_failure {
            self.load().await;
        } else {
            self.state = ManagerState::Loaded;
        }
        notice
    }
}

/// Search input that only reports a query once typing has settled
pub struct SearchBox {
    debouncer: Debouncer,
    tx: mpsc::UnboundedSender<String>,
}

impl SearchBox {
    /// Create the box and the receiver settled queries arrive on
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                debouncer: Debouncer::new(delay),
                tx,
            },
            rx,
        )
    }

    /// Record a keystroke
    pub fn input(&mut self, text: &str) {
        let tx = self.tx.clone();
        let text = text.to_string();
        self.debouncer.schedule(async move {
            let _ = tx.send(text);
        });
    }

    /// Forget the pending query
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }
}
