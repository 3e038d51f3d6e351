//! Media source description and resolution
//!
//! The host describes what to play with a [`MediaSource`]; the bridge
//! resolves it into the form the engine consumes:
//! - bare absolute paths gain a `file://` scheme
//! - the URI is classified as network or local asset
//! - a `--repeat` init option is injected when looping is requested

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// URI schemes the engine reads from local storage rather than the network
const LOCAL_SCHEMES: &[&str] = &["file", "content", "assets-library", "ms-appx", "ms-appdata"];

/// Host-facing description of a media source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaSource {
    /// Media URI (network URL, local path, or platform asset reference)
    pub uri: String,
    /// Engine initialization options (e.g. `--network-caching=50`)
    pub init_options: Vec<String>,
    /// HTTP headers forwarded to the engine for network sources
    pub headers: HashMap<String, String>,
    /// Start playback as soon as the source is ready
    pub autoplay: bool,
    /// Loop playback instead of ending
    pub repeat: bool,
}

impl MediaSource {
    /// Create a source for the given URI with autoplay on
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            init_options: Vec::new(),
            headers: HashMap::new(),
            autoplay: true,
            repeat: false,
        }
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// Append an engine initialization option
    pub fn with_init_option(mut self, option: impl Into<String>) -> Self {
        self.init_options.push(option.into());
        self
    }

    /// Add an HTTP header forwarded to the engine
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Resolve into the form handed to the engine
    ///
    /// `progress_interval` is the tick period for `progress` events; zero
    /// disables ticks.
    pub fn resolve(&self, progress_interval: Duration) -> Result<ResolvedSource> {
        if self.uri.is_empty() {
            return Err(Error::UnplayableSource("empty uri".to_string()));
        }

        let raw = if self.uri.starts_with('/') {
            format!("file://{}", self.uri)
        } else {
            self.uri.clone()
        };
        let url = Url::parse(&raw)?;

        // Anything that is not a known local-asset scheme is network
        let is_network = !LOCAL_SCHEMES.contains(&url.scheme());

        let mut init_options = self.init_options.clone();
        if self.repeat {
            let already_repeats = init_options
                .iter()
                .any(|opt| opt.starts_with("--repeat") || opt.starts_with("--input-repeat"));
            if !already_repeats {
                init_options.push("--repeat".to_string());
            }
        }

        Ok(ResolvedSource {
            url,
            is_network,
            autoplay: self.autoplay,
            init_options,
            headers: self.headers.clone(),
            progress_interval,
        })
    }
}

/// A resolved source, ready to hand to a [`PlaybackEngine`](crate::PlaybackEngine)
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    /// Parsed media URL
    pub url: Url,
    /// True when the engine must fetch over the network
    pub is_network: bool,
    /// Start playback as soon as the source is ready
    pub autoplay: bool,
    /// Engine initialization options, repeat flag folded in
    pub init_options: Vec<String>,
    /// HTTP headers for network sources
    pub headers: HashMap<String, String>,
    /// Tick period for `progress` events; zero disables ticks
    pub progress_interval: Duration,
}

impl ResolvedSource {
    /// True when playback should loop instead of ending
    pub fn repeats(&self) -> bool {
        self.init_options
            .iter()
            .any(|opt| opt.starts_with("--repeat") || opt.starts_with("--input-repeat"))
    }
}
