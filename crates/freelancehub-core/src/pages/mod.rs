//! Page view-models.
//!
//! Each page fetches one resource keyed by a route parameter and exposes it as
//! loading, failed, or ready. Mutations go to the server and then refetch;
//! displayed data is never patched locally.

pub mod forms;
pub mod nav;
pub mod profile;
pub mod project;

pub use forms::{LoginForm, RegisterForm};
pub use nav::{nav_links, NavLink, NavTarget};
pub use profile::ProfilePage;
pub use project::{BidForm, ProjectPage};

/// What a page should show right now.
#[derive(Debug, PartialEq)]
pub enum PageView<'a, T> {
    Loading,
    Failed(&'a str),
    Ready(&'a T),
    /// Nothing fetched and nothing failed
    Empty,
}

/// A fetched resource with its loading and error state.
#[derive(Debug, Clone)]
pub struct Resource<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Resource<T> {
    /// Pages start out loading: the first fetch is issued on mount.
    pub fn new() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }

    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.loading = false;
    }

    /// Record an error. Takes precedence over any data already held.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn view(&self) -> PageView<'_, T> {
        if self.loading {
            PageView::Loading
        } else if let Some(ref error) = self.error {
            PageView::Failed(error)
        } else if let Some(ref data) = self.data {
            PageView::Ready(data)
        } else {
            PageView::Empty
        }
    }
}
