use serde::{Deserialize, Serialize};

use super::user::{split_skills, User};

/// Lifecycle state of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Open,
    InProgress,
    Completed,
    #[serde(other)]
    Other,
}

impl ProjectStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectStatus::Open => "open",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Other => "unknown",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ProjectStatus::Open)
    }
}

fn default_status() -> ProjectStatus {
    ProjectStatus::Open
}

/// A bid placed by a freelancer on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: i64,
    pub amount: f64,
    pub proposal: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub proposed_timeline_days: Option<i32>,
    pub freelancer: User,
}

/// Project detail returned by `GET /project/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub budget: f64,
    #[serde(default = "default_status")]
    pub status: ProjectStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub required_skills: Option<String>,
    pub client: User,
    #[serde(default)]
    pub freelancer: Option<User>,
    #[serde(default)]
    pub bids: Vec<Bid>,
}

impl Project {
    pub fn required_skill_list(&self) -> Vec<&str> {
        split_skills(self.required_skills.as_deref())
    }

    /// Whether the given user is the client who posted this project
    pub fn is_client(&self, user_id: i64) -> bool {
        self.client.id == user_id
    }

    pub fn has_bid_from(&self, user_id: i64) -> bool {
        self.bids.iter().any(|b| b.freelancer.id == user_id)
    }

    pub fn bid_count_display(&self) -> String {
        format!("Bids ({})", self.bids.len())
    }
}
