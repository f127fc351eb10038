pub mod aggregator;
pub mod config;
pub mod pipeline;
pub mod provider;
pub mod search;
pub mod testing;

pub use aggregator::{AggregatedSearch, Aggregator};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    SearchConfig, ServerConfig,
};
pub use pipeline::{process, process_with_rng, CURATED_RESULT_COUNT};
pub use provider::{
    InternetArchiveProvider, JamendoProvider, MixcloudProvider, SoundcloudProvider,
    YoutubeProvider,
};
pub use search::{
    Platform, PlatformFilter, ProviderError, SearchItem, SearchOptions, SearchProvider, SortBy,
};
