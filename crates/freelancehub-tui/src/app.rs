//! Application state for the FreelanceHub terminal client.
//!
//! `App` owns the session, the navigation history and the view-model of
//! whichever page is on screen, and coordinates the background bootstrap task.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use freelancehub_core::auth::{AuthState, SessionStore, ValidationOutcome};
use freelancehub_core::config::Config;
use freelancehub_core::models::User;
use freelancehub_core::pages::{nav_links, LoginForm, NavLink, NavTarget, ProfilePage, ProjectPage, RegisterForm};
use freelancehub_core::router::{Navigator, Route};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the bootstrap result channel.
/// At most one validation is in flight per credential change.
const CHANNEL_BUFFER_SIZE: usize = 4;

/// Maximum digits accepted in the "go to id" prompt
const MAX_ID_LENGTH: usize = 12;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    /// Typing an id into the "go to" prompt
    EnteringId(GotoKind),
    ConfirmingQuit,
    Quitting,
}

/// What the "go to" prompt opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GotoKind {
    Project,
    Profile,
}

impl GotoKind {
    pub fn prompt(&self) -> &'static str {
        match self {
            GotoKind::Project => "Project id",
            GotoKind::Profile => "User id",
        }
    }

    fn route(&self, id: i64) -> Route {
        match self {
            GotoKind::Project => Route::Project(id),
            GotoKind::Profile => Route::Profile(id),
        }
    }
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Button,
            LoginFocus::Password => LoginFocus::Email,
            LoginFocus::Button => LoginFocus::Password,
        }
    }
}

/// Register form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegisterFocus {
    Username,
    Email,
    Password,
    Role,
    Button,
}

impl RegisterFocus {
    pub fn next(&self) -> Self {
        match self {
            RegisterFocus::Username => RegisterFocus::Email,
            RegisterFocus::Email => RegisterFocus::Password,
            RegisterFocus::Password => RegisterFocus::Role,
            RegisterFocus::Role => RegisterFocus::Button,
            RegisterFocus::Button => RegisterFocus::Username,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            RegisterFocus::Username => RegisterFocus::Button,
            RegisterFocus::Email => RegisterFocus::Username,
            RegisterFocus::Password => RegisterFocus::Email,
            RegisterFocus::Role => RegisterFocus::Password,
            RegisterFocus::Button => RegisterFocus::Role,
        }
    }
}

/// Project page focus: the bid list or one of the bid form fields
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectFocus {
    Bids,
    Amount,
    Proposal,
}

/// Profile edit focus
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileFocus {
    Bio,
    Skills,
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub config: Config,
    pub session: SessionStore,
    pub navigator: Navigator,
    pub state: AppState,

    // Forms
    pub login_form: LoginForm,
    pub login_focus: LoginFocus,
    pub register_form: RegisterForm,
    pub register_focus: RegisterFocus,

    // Pages, present while their route is current
    pub project_page: Option<ProjectPage>,
    pub project_focus: ProjectFocus,
    pub bid_selection: usize,
    pub profile_page: Option<ProfilePage>,
    pub profile_focus: ProfileFocus,

    /// Digits typed into the "go to" prompt
    pub goto_input: String,

    // Bootstrap channel
    bootstrap_rx: mpsc::Receiver<ValidationOutcome>,
    bootstrap_tx: mpsc::Sender<ValidationOutcome>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let session = config.build_session()?;
        Ok(Self::with_session(config, session))
    }

    /// Create an application around an already-built session
    pub fn with_session(config: Config, session: SessionStore) -> Self {
        debug!(
            base_url = session.client().base_url(),
            loading = session.is_loading(),
            "App created"
        );

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let login_form = LoginForm::with_email(config.default_email());

        Self {
            config,
            session,
            navigator: Navigator::new(Route::Home),
            state: AppState::Normal,

            login_form,
            login_focus: LoginFocus::Email,
            register_form: RegisterForm::default(),
            register_focus: RegisterFocus::Username,

            project_page: None,
            project_focus: ProjectFocus::Bids,
            bid_selection: 0,
            profile_page: None,
            profile_focus: ProfileFocus::Bio,

            goto_input: String::new(),

            bootstrap_rx: rx,
            bootstrap_tx: tx,

            status_message: None,
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn identity(&self) -> Option<&User> {
        self.session.identity()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Validate the current credential in the background, once per credential value
    pub fn start_bootstrap(&mut self) {
        let Some(validation) = self.session.begin_validation() else {
            return;
        };
        let tx = self.bootstrap_tx.clone();
        debug!(generation = validation.generation(), "Spawning credential validation");
        tokio::spawn(async move {
            let outcome = validation.run().await;
            if tx.send(outcome).await.is_err() {
                warn!("Bootstrap result dropped: app is gone");
            }
        });
    }

    /// Check for completed background tasks and process results
    pub async fn check_background_tasks(&mut self) {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.bootstrap_rx.try_recv() {
            outcomes.push(outcome);
        }

        for outcome in outcomes {
            if !self.session.apply_validation(outcome) {
                continue;
            }
            let message = match self.identity() {
                Some(user) => format!("Signed in as {}", user.username),
                None => "Session expired. Please log in again.".to_string(),
            };
            self.status_message = Some(message);
            self.enforce_access().await;
        }
    }

    /// Submit the login form. On success the identity is revalidated in the background.
    pub async fn submit_login(&mut self) {
        let Some(route) = self.login_form.submit(&mut self.session).await else {
            return;
        };

        let email = self.login_form.email.trim().to_string();
        if self.config.last_email.as_deref() != Some(email.as_str()) {
            self.config.last_email = Some(email);
            if let Err(e) = self.config.save() {
                warn!(error = %e, "Failed to save config");
            }
        }

        self.start_bootstrap();
        self.status_message = self
            .identity()
            .map(|u| format!("Welcome back, {}", u.username));
        self.go(route).await;
    }

    pub async fn submit_register(&mut self) {
        let Some(route) = self.register_form.submit(&self.session).await else {
            return;
        };
        self.status_message = self.register_form.success.clone();
        self.login_form = LoginForm::with_email(self.register_form.email.trim());
        self.register_form = RegisterForm::default();
        self.go(route).await;
    }

    pub async fn logout(&mut self) {
        self.session.logout();
        self.status_message = Some("Logged out".to_string());
        self.enforce_access().await;
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn current_route(&self) -> Route {
        self.navigator.current()
    }

    pub fn nav_links(&self) -> Vec<NavLink> {
        nav_links(self.identity())
    }

    /// Follow the nav link at `index`, if there is one
    pub async fn follow_nav_link(&mut self, index: usize) {
        let Some(link) = self.nav_links().into_iter().nth(index) else {
            return;
        };
        match link.target {
            NavTarget::Go(route) => self.go(route).await,
            NavTarget::Logout => self.logout().await,
        }
    }

    /// Navigate to `route` through the access gate and mount its page
    pub async fn go(&mut self, route: Route) {
        let landed = self.navigator.navigate(&self.session, route);
        if landed != route {
            info!(requested = %route.path(), redirected = %landed.path(), "Access gate redirect");
        }
        self.mount_current().await;
    }

    pub async fn back(&mut self) {
        if self.navigator.back() {
            self.enforce_access().await;
        }
    }

    /// Re-run the gate on the current route after the session changed
    async fn enforce_access(&mut self) {
        let before = self.navigator.current();
        let after = self.navigator.enforce(&self.session);
        if before != after || self.needs_mount(after) {
            self.mount_current().await;
        }
    }

    fn needs_mount(&self, route: Route) -> bool {
        match route {
            Route::Project(id) => self.project_page.as_ref().map(|p| p.project_id()) != Some(id),
            Route::Profile(_) | Route::MyProfile => {
                let wanted = self.profile_user_id(route);
                wanted.is_some() && self.profile_page.as_ref().map(|p| p.user_id()) != wanted
            }
            _ => false,
        }
    }

    /// Which user a profile route shows
    fn profile_user_id(&self, route: Route) -> Option<i64> {
        match route {
            Route::Profile(id) => Some(id),
            Route::MyProfile => self.identity().map(|u| u.id),
            _ => None,
        }
    }

    /// Create and load the view-model for the current route
    async fn mount_current(&mut self) {
        let route = self.navigator.current();
        debug!(route = %route.path(), "Mounting page");

        match route {
            Route::Project(id) => {
                let mut page = ProjectPage::new(id);
                page.load(&self.session).await;
                self.project_page = Some(page);
                self.project_focus = ProjectFocus::Bids;
                self.bid_selection = 0;
            }
            Route::Profile(_) | Route::MyProfile => {
                self.profile_page = None;
                if let Some(user_id) = self.profile_user_id(route) {
                    let mut page = ProfilePage::new(user_id);
                    page.load(&self.session).await;
                    self.profile_page = Some(page);
                    self.profile_focus = ProfileFocus::Bio;
                }
            }
            Route::Login => {
                self.login_form.error = None;
                self.login_focus = if self.login_form.email.is_empty() {
                    LoginFocus::Email
                } else {
                    LoginFocus::Password
                };
            }
            Route::Register => {
                self.register_form.error = None;
                self.register_focus = RegisterFocus::Username;
            }
            Route::Home | Route::Projects => {}
        }
    }

    /// Refetch the page on screen
    pub async fn reload(&mut self) {
        if let Some(page) = self.project_page.as_mut() {
            if self.navigator.current() == Route::Project(page.project_id()) {
                page.load(&self.session).await;
                return;
            }
        }
        if matches!(self.navigator.current(), Route::Profile(_) | Route::MyProfile) {
            if let Some(page) = self.profile_page.as_mut() {
                page.load(&self.session).await;
            }
        }
    }

    // =========================================================================
    // Go-to prompt
    // =========================================================================

    pub fn start_goto(&mut self, kind: GotoKind) {
        self.goto_input.clear();
        self.state = AppState::EnteringId(kind);
    }

    pub fn push_goto_char(&mut self, c: char) {
        if c.is_ascii_digit() && self.goto_input.len() < MAX_ID_LENGTH {
            self.goto_input.push(c);
        }
    }

    pub async fn finish_goto(&mut self, kind: GotoKind) {
        self.state = AppState::Normal;
        match self.goto_input.parse::<i64>() {
            Ok(id) => self.go(kind.route(id)).await,
            Err(_) => self.status_message = Some("Enter a numeric id".to_string()),
        }
        self.goto_input.clear();
    }

    // =========================================================================
    // Project page actions
    // =========================================================================

    pub fn project_bid_count(&self) -> usize {
        self.project_page
            .as_ref()
            .and_then(|p| p.project())
            .map(|p| p.bids.len())
            .unwrap_or(0)
    }

    /// Move into the bid form, if the viewer may bid
    pub fn start_bid(&mut self) {
        let allowed = self
            .project_page
            .as_ref()
            .map(|p| p.can_bid(self.session.identity()))
            .unwrap_or(false);
        if allowed {
            self.project_focus = ProjectFocus::Amount;
        } else if !self.is_authenticated() {
            self.status_message = Some("Log in as a freelancer to place a bid".to_string());
        }
    }

    pub async fn submit_bid(&mut self) {
        let Some(page) = self.project_page.as_mut() else {
            return;
        };
        if page.submit_bid(&self.session).await {
            self.project_focus = ProjectFocus::Bids;
            self.status_message = Some("Bid placed".to_string());
        }
    }

    /// Accept the highlighted bid, if the viewer is the project's client
    pub async fn accept_selected_bid(&mut self) {
        let Some(page) = self.project_page.as_mut() else {
            return;
        };
        if !page.can_accept_bids(self.session.identity()) {
            return;
        }
        let Some(bid_id) = page
            .project()
            .and_then(|p| p.bids.get(self.bid_selection))
            .map(|b| b.id)
        else {
            return;
        };
        if page.accept_bid(&self.session, bid_id).await {
            self.status_message = Some("Bid accepted".to_string());
        }
    }

    /// Open the profile of the highlighted bid's freelancer
    pub async fn open_selected_bidder(&mut self) {
        let user_id = self
            .project_page
            .as_ref()
            .and_then(|p| p.project())
            .and_then(|p| p.bids.get(self.bid_selection))
            .map(|b| b.freelancer.id);
        if let Some(id) = user_id {
            self.go(Route::Profile(id)).await;
        }
    }

    pub async fn open_project_client(&mut self) {
        let user_id = self
            .project_page
            .as_ref()
            .and_then(|p| p.project())
            .map(|p| p.client.id);
        if let Some(id) = user_id {
            self.go(Route::Profile(id)).await;
        }
    }

    // =========================================================================
    // Profile page actions
    // =========================================================================

    pub fn profile_is_editing(&self) -> bool {
        self.profile_page.as_ref().map(|p| p.is_editing()).unwrap_or(false)
    }

    pub fn start_profile_edit(&mut self) {
        if let Some(page) = self.profile_page.as_mut() {
            if page.is_current_user(self.session.identity()) {
                page.start_editing();
                self.profile_focus = ProfileFocus::Bio;
            }
        }
    }

    pub fn cancel_profile_edit(&mut self) {
        if let Some(page) = self.profile_page.as_mut() {
            page.cancel_editing();
        }
    }

    pub async fn save_profile(&mut self) {
        let Some(page) = self.profile_page.as_mut() else {
            return;
        };
        if page.save_edits(&mut self.session).await {
            self.status_message = Some("Profile updated".to_string());
        }
    }
}
