use serde::{Deserialize, Serialize};

/// A marketplace user as reported by the backend.
///
/// The same record describes the logged-in identity (`GET /user/profile`)
/// and users nested inside projects, bids and reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_freelancer: bool,
    #[serde(default)]
    pub bio: Option<String>,
    /// Comma-separated, e.g. "Python,React,Graphic Design"
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default, rename = "avg_rating", alias = "ranking_score")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub completion_rate: Option<f64>,
    #[serde(default)]
    pub on_time_rate: Option<f64>,
    #[serde(default)]
    pub portfolio_score: Option<f64>,
}

impl User {
    pub fn skill_list(&self) -> Vec<&str> {
        split_skills(self.skills.as_deref())
    }

    pub fn role_display(&self) -> &'static str {
        if self.is_freelancer {
            "Freelancer"
        } else {
            "Client"
        }
    }

    pub fn rating_display(&self) -> String {
        format!("{:.1} / 5.0", self.rating.unwrap_or(0.0))
    }

    pub fn bio_display(&self) -> &str {
        match self.bio.as_deref() {
            Some(bio) if !bio.trim().is_empty() => bio,
            _ => "No bio provided.",
        }
    }
}

/// Split a comma-separated skills string, trimming and dropping empty entries.
pub fn split_skills(skills: Option<&str>) -> Vec<&str> {
    skills
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// A review left for a user on a completed project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub reviewer: Option<User>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Review {
    pub fn reviewer_name(&self) -> &str {
        self.reviewer
            .as_ref()
            .map(|r| r.username.as_str())
            .unwrap_or("Unknown")
    }

    pub fn rating_display(&self) -> String {
        format!("{} / 5 ★", self.rating)
    }
}

/// Public profile returned by `GET /user/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicProfile {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub reviews_received: Vec<Review>,
}
