//! Pagination types
//!
//! Sweep parameters, per-sweep client identity, and the state carried
//! from one page to the next.

use crate::config::ClientSettings;
use crate::types::Cursor;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// One full sweep over a user's collection endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepRequest {
    /// Numeric or string user identifier
    pub user_id: String,
    /// Collection endpoint name (e.g. `wishes`, `ratings`)
    pub endpoint: String,
    /// Optional bearer token
    pub token: Option<String>,
    /// Items requested per page
    pub per_page: u32,
    /// Value of the `client-country` header
    pub country: String,
}

impl SweepRequest {
    /// Create a sweep with default page size and country
    pub fn new(user_id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            endpoint: endpoint.into(),
            token: None,
            per_page: 24,
            country: "NL".to_string(),
        }
    }

    /// Set the bearer token
    #[must_use]
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Set the page size
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Set the country
    #[must_use]
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Same sweep against a different endpoint
    #[must_use]
    pub fn with_endpoint(&self, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..self.clone()
        }
    }
}

/// Header set sent with every page of one sweep.
///
/// The anonymous user id is drawn once, so all pages of a sweep present
/// the same identity.
#[derive(Debug, Clone)]
pub struct ClientProfile {
    settings: ClientSettings,
    user_agent: String,
    country: String,
    anonymous_user_id: Uuid,
    token: Option<String>,
}

impl ClientProfile {
    /// Build the profile for one sweep
    pub fn for_sweep(settings: &ClientSettings, user_agent: &str, sweep: &SweepRequest) -> Self {
        Self {
            settings: settings.clone(),
            user_agent: user_agent.to_string(),
            country: sweep.country.clone(),
            anonymous_user_id: Uuid::new_v4(),
            token: sweep.token.clone(),
        }
    }

    /// The per-sweep anonymous user id
    pub fn anonymous_user_id(&self) -> Uuid {
        self.anonymous_user_id
    }

    /// Headers in send order
    pub fn headers(&self) -> Vec<(String, String)> {
        let s = &self.settings;
        let mut headers = vec![
            ("Accept".to_string(), s.accept.clone()),
            ("Accept-Encoding".to_string(), s.accept_encoding.clone()),
            ("Accept-Language".to_string(), s.accept_language.clone()),
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("client".to_string(), s.client_tag.clone()),
            ("client-country".to_string(), self.country.clone()),
            (
                "anonymous_user_id".to_string(),
                self.anonymous_user_id.to_string(),
            ),
            ("Referer".to_string(), s.referer.clone()),
            ("Origin".to_string(), s.origin.clone()),
            ("DNT".to_string(), s.dnt.clone()),
        ];
        if !s.audio_codecs.is_empty() {
            headers.push((
                "client-accept-audio-codecs".to_string(),
                s.audio_codecs.clone(),
            ));
        }
        if !s.video_codecs.is_empty() {
            headers.push((
                "client-accept-video-codecs".to_string(),
                s.video_codecs.clone(),
            ));
        }
        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }
}

/// Paginator configuration
#[derive(Debug, Clone)]
pub struct PaginatorConfig {
    /// Base URL; pages are fetched from `{base_url}/{user_id}/{endpoint}`
    pub base_url: String,
    /// Delay between consecutive page requests
    pub page_delay: Duration,
    /// Client identification header values
    pub client: ClientSettings,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mubi.com/v4/users".to_string(),
            page_delay: Duration::from_millis(50),
            client: ClientSettings::default(),
        }
    }
}

/// Why a sweep ended normally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The page had no list of items, or an empty one
    EmptyPage,
    /// The last item carried no usable identifier
    NoCursor,
    /// The last item's identifier equals the cursor just sent
    CursorUnchanged,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPage => f.write_str("empty page"),
            Self::NoCursor => f.write_str("no cursor on last item"),
            Self::CursorUnchanged => f.write_str("cursor unchanged"),
        }
    }
}

/// Result of processing one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch another page with this cursor
    Continue(Cursor),
    /// No more pages
    Done(StopReason),
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// State carried across the pages of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Cursor for the next request; `None` before the first page
    pub cursor: Option<Cursor>,
    /// Pages fetched so far
    pub pages_fetched: u32,
    /// Items accumulated so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Set cursor
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = Some(cursor);
    }

    /// Record a fetched page of `count` items
    pub fn add_page(&mut self, count: usize) {
        self.pages_fetched += 1;
        self.total_fetched += count as u64;
    }
}
