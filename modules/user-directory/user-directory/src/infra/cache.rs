//! TTL cache for profile lookups.

use moka::future::Cache;
use user_directory_sdk::UserSummary;

use crate::config::DetailCacheConfig;

/// Profile cache keyed by lowercased login (GitHub logins are case-insensitive).
#[derive(Clone)]
pub struct DetailCache {
    cache: Cache<String, UserSummary>,
}

impl DetailCache {
    #[must_use]
    pub fn new(config: &DetailCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { cache }
    }

    /// `None` when caching is disabled.
    #[must_use]
    pub fn from_config(config: &DetailCacheConfig) -> Option<Self> {
        config.enabled.then(|| Self::new(config))
    }

    pub async fn get(&self, login: &str) -> Option<UserSummary> {
        self.cache.get(&login.to_lowercase()).await
    }

    /// Store a profile. Degraded summaries are never cached.
    pub async fn insert(&self, summary: &UserSummary) {
        if summary.degraded {
            return;
        }
        self.cache
            .insert(summary.login.to_lowercase(), summary.clone())
            .await;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::time::Duration;
    use user_directory_sdk::SearchHit;

    fn summary(login: &str) -> UserSummary {
        let mut s = UserSummary::degraded_from(&SearchHit {
            id: 7,
            login: login.to_owned(),
            avatar_url: String::new(),
            profile_url: String::new(),
        });
        s.degraded = false;
        s.follower_count = 42;
        s
    }

    fn enabled(ttl: Duration) -> DetailCacheConfig {
        DetailCacheConfig {
            enabled: true,
            ttl,
            max_entries: 10,
        }
    }

    #[test]
    fn disabled_config_builds_nothing() {
        assert!(DetailCache::from_config(&DetailCacheConfig::default()).is_none());
        assert!(DetailCache::from_config(&enabled(Duration::from_secs(1))).is_some());
    }

    #[tokio::test]
    async fn hit_is_case_insensitive() {
        let cache = DetailCache::new(&enabled(Duration::from_secs(60)));
        assert!(cache.get("Octocat").await.is_none());

        cache.insert(&summary("Octocat")).await;
        let cached = cache.get("octocat").await.unwrap();
        assert_eq!(cached.follower_count, 42);
    }

    #[tokio::test]
    async fn degraded_entries_are_skipped() {
        let cache = DetailCache::new(&enabled(Duration::from_secs(60)));
        let mut s = summary("ghost");
        s.degraded = true;
        cache.insert(&s).await;
        assert!(cache.get("ghost").await.is_none());
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = DetailCache::new(&enabled(Duration::from_millis(50)));
        cache.insert(&summary("octocat")).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get("octocat").await.is_none());
    }
}
