//! Plain-text rendering of profiles and search state.

use std::fmt::{self, Display, Formatter};
use user_directory_sdk::format::{format_count, format_joined_date};
use user_directory_sdk::{PaginationInfo, SearchResult, UserSummary};
use user_search::SearchState;

/// Multi-line card for one profile.
pub struct UserCard<'a>(pub &'a UserSummary);

impl Display for UserCard<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let user = self.0;
        if user.name() == user.login {
            writeln!(f, "{}", user.login)?;
        } else {
            writeln!(f, "{} ({})", user.name(), user.login)?;
        }

        if user.degraded {
            writeln!(f, "  (profile details unavailable)")?;
        } else {
            let mut facts = Vec::new();
            if let Some(location) = user.location.as_deref().filter(|l| !l.is_empty()) {
                facts.push(location.to_owned());
            }
            if let Some(joined) = user.joined_at {
                facts.push(format!("joined {}", format_joined_date(joined)));
            }
            if !facts.is_empty() {
                writeln!(f, "  {}", facts.join(" | "))?;
            }
            if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
                writeln!(f, "  {bio}")?;
            }
            writeln!(
                f,
                "  {} followers | {} following | {} repos",
                format_count(user.follower_count),
                format_count(user.following_count),
                format_count(user.public_repo_count)
            )?;
        }
        writeln!(f, "  {}", user.profile_url)
    }
}

/// `Page X of Y`, with the total and navigation hints.
pub struct PageLine<'a> {
    pub result: &'a SearchResult,
    pub pagination: &'a PaginationInfo,
}

impl Display for PageLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Page {} of {} ({} users)",
            self.pagination.current_page,
            self.pagination.total_pages.max(1),
            format_count(self.result.total_count)
        )?;
        if self.pagination.has_previous_page {
            f.write_str("  :prev")?;
        }
        if self.pagination.has_next_page {
            f.write_str("  :next")?;
        }
        if self.result.incomplete_results {
            f.write_str("  (results may be incomplete)")?;
        }
        writeln!(f)
    }
}

/// Cards for every item followed by the page line.
pub struct ResultsView<'a> {
    pub result: &'a SearchResult,
    pub pagination: &'a PaginationInfo,
}

impl Display for ResultsView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.result.is_empty() {
            return writeln!(f, "No users found.");
        }
        for user in &self.result.items {
            writeln!(f, "{}", UserCard(user))?;
        }
        write!(
            f,
            "{}",
            PageLine {
                result: self.result,
                pagination: self.pagination,
            }
        )
    }
}

/// Full screen for the interactive front-end.
pub struct StateView<'a>(pub &'a SearchState);

impl Display for StateView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = self.0;
        if state.loading {
            return writeln!(
                f,
                "Searching for '{}' (page {})...",
                state.query.trim(),
                state.page
            );
        }
        if let Some(error) = &state.error {
            writeln!(f, "Error: {}", error.message)?;
            if error.category.is_transient() {
                writeln!(f, "  :retry to try again, :dismiss to hide")?;
            } else {
                writeln!(f, "  :dismiss to hide")?;
            }
        }
        if state.query.trim().is_empty() {
            if state.error.is_none() {
                writeln!(f, "Type a username to search.")?;
            }
            return Ok(());
        }
        if state.error.is_none() || !state.results.is_empty() {
            let pagination = state.pagination();
            write!(
                f,
                "{}",
                ResultsView {
                    result: &state.results,
                    pagination: &pagination,
                }
            )?;
        }
        Ok(())
    }
}
