//! Provider adapters.
//!
//! One adapter per external platform. Each one builds a provider-specific
//! request, maps the provider's own response shape into `SearchItem`s with
//! the documented field fallbacks, and truncates to the requested limit.
//! Adapters surface failures as `ProviderError`; the aggregator absorbs them
//! so one provider's outage never affects the others.

mod internet_archive;
mod jamendo;
mod mixcloud;
mod soundcloud;
mod youtube;

pub use internet_archive::InternetArchiveProvider;
pub use jamendo::JamendoProvider;
pub use mixcloud::MixcloudProvider;
pub use soundcloud::SoundcloudProvider;
pub use youtube::YoutubeProvider;
