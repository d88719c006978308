//! User profile page with in-place editing of the viewer's own bio and skills.

use tracing::warn;

use crate::auth::SessionStore;
use crate::models::{PublicProfile, User};

use super::{PageView, Resource};

pub const LOAD_ERROR: &str = "Failed to load profile.";
pub const UPDATE_ERROR: &str = "Failed to update profile.";

pub struct ProfilePage {
    user_id: i64,
    resource: Resource<PublicProfile>,
    editing: bool,
    pub edit_bio: String,
    pub edit_skills: String,
}

impl ProfilePage {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            resource: Resource::new(),
            editing: false,
            edit_bio: String::new(),
            edit_skills: String::new(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn profile(&self) -> Option<&PublicProfile> {
        self.resource.data()
    }

    pub fn view(&self) -> PageView<'_, PublicProfile> {
        self.resource.view()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_current_user(&self, viewer: Option<&User>) -> bool {
        viewer.map(|u| u.id == self.user_id).unwrap_or(false)
    }

    /// Fetch the profile and seed the edit drafts from it
    pub async fn load(&mut self, session: &SessionStore) {
        self.resource.begin();
        match session.client().fetch_user(self.user_id).await {
            Ok(profile) => {
                self.edit_bio = profile.user.bio.clone().unwrap_or_default();
                self.edit_skills = profile.user.skills.clone().unwrap_or_default();
                self.resource.succeed(profile);
            }
            Err(e) => {
                warn!(user_id = self.user_id, error = %e, "Failed to load profile");
                self.resource.fail(LOAD_ERROR);
            }
        }
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
    }

    /// Leave edit mode, restoring the drafts from the displayed profile
    pub fn cancel_editing(&mut self) {
        self.editing = false;
        if let Some(profile) = self.resource.data() {
            self.edit_bio = profile.user.bio.clone().unwrap_or_default();
            self.edit_skills = profile.user.skills.clone().unwrap_or_default();
        }
    }

    /// Save the drafts, then refetch the page and the session identity.
    pub async fn save_edits(&mut self, session: &mut SessionStore) -> bool {
        let client = session.client();
        match client.update_profile(&self.edit_bio, &self.edit_skills).await {
            Ok(()) => {
                self.editing = false;
                self.load(session).await;
                if let Err(e) = session.refresh_identity().await {
                    warn!(error = %e, "Failed to refresh identity after profile edit");
                }
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to update profile");
                self.resource.fail(e.user_message(UPDATE_ERROR));
                false
            }
        }
    }
}
