//! Fan-out/fan-in search aggregation.
//!
//! The aggregator invokes every registered provider concurrently, waits for
//! all of them to settle (full join, not a race), and concatenates the
//! successful contributions in provider-priority order. Provider failures are
//! absorbed here: a failed or timed-out provider contributes an empty list
//! and an entry in `provider_errors`, never an error to the caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::provider::{
    InternetArchiveProvider, JamendoProvider, MixcloudProvider, SoundcloudProvider,
    YoutubeProvider,
};
use crate::search::{ProviderError, SearchItem, SearchProvider};

/// The merged outcome of one fan-out.
#[derive(Debug)]
pub struct AggregatedSearch {
    /// All successful providers' items, concatenated in provider-priority
    /// order. Unfiltered and unsorted; the pipeline does that.
    pub items: Vec<SearchItem>,
    /// Providers that failed this request (platform tag -> error message).
    /// Disabled providers (missing credential) are not failures and do not
    /// appear here.
    pub provider_errors: HashMap<String, String>,
    pub duration_ms: u64,
}

pub struct Aggregator {
    providers: Vec<Arc<dyn SearchProvider>>,
    per_provider_limit: usize,
    deadline: Duration,
}

impl Aggregator {
    /// Build an aggregator over an explicit provider list.
    ///
    /// The list order is the provider-priority order used for concatenation
    /// and therefore for tie-breaks in the pipeline's stable sorts.
    pub fn new(
        providers: Vec<Arc<dyn SearchProvider>>,
        per_provider_limit: usize,
        deadline: Duration,
    ) -> Self {
        Self {
            providers,
            per_provider_limit,
            deadline,
        }
    }

    /// Build the production provider set from configuration.
    ///
    /// Keyed providers without a credential are not registered at all; the
    /// keyless ones honor their `enabled` flags. Registration order is fixed:
    /// jamendo, soundcloud, youtube, internet-archive, mixcloud.
    pub fn from_config(config: &SearchConfig) -> Self {
        let timeout = Duration::from_secs(config.provider_timeout_secs);
        let mut providers: Vec<Arc<dyn SearchProvider>> = Vec::new();

        if config.jamendo.client_id.is_some() {
            providers.push(Arc::new(JamendoProvider::new(&config.jamendo, timeout)));
        } else {
            info!("Jamendo client id not configured, provider disabled");
        }

        providers.push(Arc::new(SoundcloudProvider::new(
            &config.soundcloud,
            timeout,
        )));

        if config.youtube.api_key.is_some() {
            providers.push(Arc::new(YoutubeProvider::new(&config.youtube, timeout)));
        } else {
            info!("YouTube API key not configured, provider disabled");
        }

        if config.internet_archive.enabled {
            providers.push(Arc::new(InternetArchiveProvider::new(
                &config.internet_archive,
                timeout,
            )));
        }

        if config.mixcloud.enabled {
            providers.push(Arc::new(MixcloudProvider::new(&config.mixcloud, timeout)));
        }

        Self::new(
            providers,
            config.per_provider_limit,
            Duration::from_secs(config.overall_deadline_secs),
        )
    }

    /// Platform tags of the registered providers, in priority order.
    pub fn registered_platforms(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.platform().as_str()).collect()
    }

    /// Fan out the query to every provider and join all contributions.
    ///
    /// This never fails: with zero providers, or all of them failing, the
    /// result is simply empty.
    pub async fn search(&self, query: &str) -> AggregatedSearch {
        let start = Instant::now();

        debug!(
            query = query,
            providers = self.providers.len(),
            "Starting provider fan-out"
        );

        let searches = self.providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            let query = query.to_string();
            let limit = self.per_provider_limit;
            let deadline = self.deadline;
            async move {
                let result = match tokio::time::timeout(deadline, provider.search(&query, limit))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(ProviderError::Timeout),
                };
                (provider.platform(), result)
            }
        });

        let settled = futures::future::join_all(searches).await;

        let mut items = Vec::new();
        let mut provider_errors = HashMap::new();

        for (platform, result) in settled {
            match result {
                Ok(mut batch) => {
                    debug!(
                        platform = %platform,
                        results = batch.len(),
                        "Provider search complete"
                    );
                    items.append(&mut batch);
                }
                Err(ProviderError::MissingCredential(credential)) => {
                    debug!(
                        platform = %platform,
                        credential = credential,
                        "Provider disabled, skipping"
                    );
                }
                Err(e) => {
                    warn!(platform = %platform, error = %e, "Provider search failed");
                    provider_errors.insert(platform.as_str().to_string(), e.to_string());
                }
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            results = items.len(),
            failed_providers = provider_errors.len(),
            duration_ms = duration_ms,
            "Fan-out complete"
        );

        AggregatedSearch {
            items,
            provider_errors,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;

    #[test]
    fn test_from_config_skips_keyed_providers_without_credentials() {
        let config = SearchConfig::default();
        let aggregator = Aggregator::from_config(&config);
        // jamendo and youtube have no credentials; soundcloud runs keyless.
        assert_eq!(
            aggregator.registered_platforms(),
            vec!["soundcloud", "internet-archive", "mixcloud"]
        );
    }

    #[test]
    fn test_from_config_registers_all_in_priority_order() {
        let mut config = SearchConfig::default();
        config.jamendo.client_id = Some("j".to_string());
        config.youtube.api_key = Some("y".to_string());

        let aggregator = Aggregator::from_config(&config);
        assert_eq!(
            aggregator.registered_platforms(),
            vec![
                "jamendo",
                "soundcloud",
                "youtube",
                "internet-archive",
                "mixcloud"
            ]
        );
    }

    #[test]
    fn test_from_config_honors_enabled_flags() {
        let mut config = SearchConfig::default();
        config.internet_archive.enabled = false;
        config.mixcloud.enabled = false;

        let aggregator = Aggregator::from_config(&config);
        assert_eq!(aggregator.registered_platforms(), vec!["soundcloud"]);
    }
}
