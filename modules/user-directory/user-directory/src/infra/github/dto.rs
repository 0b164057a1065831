//! Wire types for the GitHub REST API.

use serde::Deserialize;
use time::OffsetDateTime;
use user_directory_sdk::{SearchHit, UserSummary};

/// `GET /search/users`
#[derive(Debug, Deserialize)]
pub struct SearchUsersResponse {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

/// `GET /users/{login}`
#[derive(Debug, Deserialize)]
pub struct UserDetail {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub public_repos: Option<u64>,
    pub html_url: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// Error body GitHub returns with 4xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl From<SearchItem> for SearchHit {
    fn from(item: SearchItem) -> Self {
        Self {
            id: item.id,
            login: item.login,
            avatar_url: item.avatar_url,
            profile_url: item.html_url,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<UserDetail> for UserSummary {
    fn from(user: UserDetail) -> Self {
        Self {
            id: user.id,
            login: user.login,
            display_name: non_blank(user.name),
            avatar_url: user.avatar_url,
            bio: non_blank(user.bio),
            location: non_blank(user.location),
            follower_count: user.followers.unwrap_or(0),
            following_count: user.following.unwrap_or(0),
            public_repo_count: user.public_repos.unwrap_or(0),
            profile_url: user.html_url,
            joined_at: user.created_at,
            degraded: false,
        }
    }
}
