//! Project detail page: the project, its bids, placing and accepting bids.

use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::models::{Project, User};

use super::{PageView, Resource};

pub const LOAD_ERROR: &str = "Failed to load project.";
pub const BID_ERROR: &str = "Failed to place bid.";
pub const ACCEPT_ERROR: &str = "Failed to accept bid.";

/// Smallest bid the form accepts
const MIN_BID_AMOUNT: f64 = 1.0;

/// Bid form fields as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct BidForm {
    pub amount: String,
    pub proposal: String,
    /// Input validation problem, shown next to the form
    pub error: Option<String>,
}

impl BidForm {
    /// Parse and check the form. Returns the amount and trimmed proposal.
    pub fn validate(&self) -> Result<(f64, &str), String> {
        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| "Bid amount must be a number.".to_string())?;
        if !amount.is_finite() || amount < MIN_BID_AMOUNT {
            return Err(format!("Bid amount must be at least {}.", MIN_BID_AMOUNT));
        }
        let proposal = self.proposal.trim();
        if proposal.is_empty() {
            return Err("Proposal is required.".to_string());
        }
        Ok((amount, proposal))
    }

    pub fn clear(&mut self) {
        self.amount.clear();
        self.proposal.clear();
        self.error = None;
    }
}

pub struct ProjectPage {
    project_id: i64,
    resource: Resource<Project>,
    pub bid_form: BidForm,
}

impl ProjectPage {
    pub fn new(project_id: i64) -> Self {
        Self {
            project_id,
            resource: Resource::new(),
            bid_form: BidForm::default(),
        }
    }

    pub fn project_id(&self) -> i64 {
        self.project_id
    }

    pub fn project(&self) -> Option<&Project> {
        self.resource.data()
    }

    pub fn view(&self) -> PageView<'_, Project> {
        self.resource.view()
    }

    pub async fn load(&mut self, session: &SessionStore) {
        self.resource.begin();
        match session.client().fetch_project(self.project_id).await {
            Ok(project) => {
                debug!(project_id = self.project_id, bids = project.bids.len(), "Project loaded");
                self.resource.succeed(project);
            }
            Err(e) => {
                warn!(project_id = self.project_id, error = %e, "Failed to load project");
                self.resource.fail(LOAD_ERROR);
            }
        }
    }

    /// Submit the bid form. On success the form is cleared and the project refetched.
    pub async fn submit_bid(&mut self, session: &SessionStore) -> bool {
        let (amount, proposal) = match self.bid_form.validate() {
            Ok((amount, proposal)) => (amount, proposal.to_string()),
            Err(message) => {
                self.bid_form.error = Some(message);
                return false;
            }
        };
        self.bid_form.error = None;

        match session.client().place_bid(self.project_id, amount, &proposal).await {
            Ok(()) => {
                self.bid_form.clear();
                self.load(session).await;
                true
            }
            Err(e) => {
                warn!(project_id = self.project_id, error = %e, "Failed to place bid");
                self.resource.fail(e.user_message(BID_ERROR));
                false
            }
        }
    }

    pub async fn accept_bid(&mut self, session: &SessionStore, bid_id: i64) -> bool {
        match session.client().accept_bid(self.project_id, bid_id).await {
            Ok(()) => {
                self.load(session).await;
                true
            }
            Err(e) => {
                warn!(project_id = self.project_id, bid_id, error = %e, "Failed to accept bid");
                self.resource.fail(e.user_message(ACCEPT_ERROR));
                false
            }
        }
    }

    // =========================================================================
    // Permissions for the current viewer
    // =========================================================================

    pub fn is_client(&self, viewer: Option<&User>) -> bool {
        match (self.project(), viewer) {
            (Some(project), Some(user)) => project.is_client(user.id),
            _ => false,
        }
    }

    pub fn viewer_has_bid(&self, viewer: Option<&User>) -> bool {
        match (self.project(), viewer) {
            (Some(project), Some(user)) => project.has_bid_from(user.id),
            _ => false,
        }
    }

    fn is_open(&self) -> bool {
        self.project().map(|p| p.status.is_open()).unwrap_or(false)
    }

    /// Freelancers may bid once on an open project
    pub fn can_bid(&self, viewer: Option<&User>) -> bool {
        let is_freelancer = viewer.map(|u| u.is_freelancer).unwrap_or(false);
        is_freelancer && self.is_open() && !self.viewer_has_bid(viewer)
    }

    /// The client of an open project may accept bids
    pub fn can_accept_bids(&self, viewer: Option<&User>) -> bool {
        self.is_client(viewer) && self.is_open()
    }

    /// Whether to tell a freelancer they already bid here
    pub fn shows_already_bid(&self, viewer: Option<&User>) -> bool {
        viewer.map(|u| u.is_freelancer).unwrap_or(false) && self.viewer_has_bid(viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(amount: &str, proposal: &str) -> BidForm {
        BidForm {
            amount: amount.to_string(),
            proposal: proposal.to_string(),
            error: None,
        }
    }

    #[test]
    fn test_bid_form_validation() {
        assert_eq!(form("250", " Quick turnaround ").validate(), Ok((250.0, "Quick turnaround")));
        assert_eq!(form("12.5", "ok").validate(), Ok((12.5, "ok")));
        assert!(form("", "ok").validate().is_err());
        assert!(form("abc", "ok").validate().is_err());
        assert!(form("0.5", "ok").validate().is_err());
        assert!(form("NaN", "ok").validate().is_err());
        assert_eq!(form("10", "   ").validate(), Err("Proposal is required.".to_string()));
    }

    #[test]
    fn test_permissions_without_project() {
        let page = ProjectPage::new(1);
        assert!(!page.can_bid(None));
        assert!(!page.can_accept_bids(None));
        assert!(!page.is_client(None));
    }
}
