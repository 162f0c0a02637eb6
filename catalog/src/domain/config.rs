//! Environment-driven configuration for catalog query behaviour.

/// Environment variable name for the text search result cap.
pub const CATALOG_TEXT_RESULT_CAP_ENV: &str = "CATALOG_TEXT_RESULT_CAP";

/// Environment variable name for the default proximity search radius.
pub const CATALOG_PROXIMITY_RADIUS_METRES_ENV: &str = "CATALOG_PROXIMITY_RADIUS_METRES";

/// Environment variable name for the proximity search result cap.
pub const CATALOG_PROXIMITY_RESULT_CAP_ENV: &str = "CATALOG_PROXIMITY_RESULT_CAP";

/// Environment variable name for the review count needed to rank an entry.
pub const CATALOG_MIN_REVIEW_COUNT_ENV: &str = "CATALOG_MIN_REVIEW_COUNT";

/// Environment variable name for the top-rated ranking length.
pub const CATALOG_TOP_RATED_LIMIT_ENV: &str = "CATALOG_TOP_RATED_LIMIT";

/// Environment variable name for the listing page size.
pub const CATALOG_PAGE_SIZE_ENV: &str = "CATALOG_PAGE_SIZE";

/// Environment variable name for the name-field text search weight.
pub const CATALOG_TEXT_NAME_WEIGHT_ENV: &str = "CATALOG_TEXT_NAME_WEIGHT";

/// Environment variable name for the description-field text search weight.
pub const CATALOG_TEXT_DESCRIPTION_WEIGHT_ENV: &str = "CATALOG_TEXT_DESCRIPTION_WEIGHT";

/// Environment abstraction for catalog configuration lookups.
///
/// This trait allows testing with mock environments without unsafe env var
/// mutations.
pub trait CatalogEnv {
    /// Fetch a string value by name.
    fn string(&self, name: &str) -> Option<String>;
}

/// Environment access backed by the real process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCatalogEnv;

impl DefaultCatalogEnv {
    /// Create a new environment reader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CatalogEnv for DefaultCatalogEnv {
    fn string(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Limits applied to the catalog's read operations.
///
/// Each limit has a conservative default and is clamped to a sane range, so a
/// misconfigured environment degrades to defaults rather than failing start-up.
///
/// # Example
///
/// ```
/// # use catalog::domain::QueryLimits;
/// let limits = QueryLimits::default();
/// assert_eq!(limits.text_result_cap(), 5);
/// assert_eq!(limits.default_page_size(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct QueryLimits {
    text_result_cap: usize,
    proximity_radius_metres: f64,
    proximity_result_cap: usize,
    min_review_count: usize,
    top_rated_limit: usize,
    default_page_size: u64,
}

impl QueryLimits {
    /// Default number of text search results returned.
    const DEFAULT_TEXT_RESULT_CAP: usize = 5;

    /// Default proximity radius in metres, roughly ten miles.
    const DEFAULT_PROXIMITY_RADIUS_METRES: f64 = 16_093.0;

    /// Default number of proximity results returned.
    const DEFAULT_PROXIMITY_RESULT_CAP: usize = 10;

    /// Default number of reviews an entry needs before it can be ranked.
    const DEFAULT_MIN_REVIEW_COUNT: usize = 2;

    /// Default length of the top-rated ranking.
    const DEFAULT_TOP_RATED_LIMIT: usize = 10;

    /// Default listing page size.
    const DEFAULT_PAGE_SIZE: u64 = 4;

    /// Result caps and page sizes are clamped to the range [1, 100].
    const MIN_CAP: usize = 1;
    const MAX_CAP: usize = 100;

    /// Review count thresholds are clamped to the range [1, 1000].
    const MAX_MIN_REVIEW_COUNT: usize = 1000;

    /// Radii beyond half the Earth's circumference select everything anyway.
    const MAX_PROXIMITY_RADIUS_METRES: f64 = 20_037_500.0;

    /// Load limits from the real process environment.
    pub fn from_env() -> Self {
        Self::from_env_with(&DefaultCatalogEnv)
    }

    /// Load limits from a custom environment source.
    ///
    /// Useful for testing without unsafe env var mutations. Unparseable or
    /// out-of-range values fall back to the defaults.
    pub fn from_env_with(env: &impl CatalogEnv) -> Self {
        let text_result_cap = parse_cap(
            env,
            CATALOG_TEXT_RESULT_CAP_ENV,
            Self::DEFAULT_TEXT_RESULT_CAP,
        );
        let proximity_radius_metres = env
            .string(CATALOG_PROXIMITY_RADIUS_METRES_ENV)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|radius| radius.is_finite() && *radius > 0.0)
            .unwrap_or(Self::DEFAULT_PROXIMITY_RADIUS_METRES)
            .min(Self::MAX_PROXIMITY_RADIUS_METRES);
        let proximity_result_cap = parse_cap(
            env,
            CATALOG_PROXIMITY_RESULT_CAP_ENV,
            Self::DEFAULT_PROXIMITY_RESULT_CAP,
        );
        let min_review_count = env
            .string(CATALOG_MIN_REVIEW_COUNT_ENV)
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(Self::DEFAULT_MIN_REVIEW_COUNT)
            .clamp(Self::MIN_CAP, Self::MAX_MIN_REVIEW_COUNT);
        let top_rated_limit = parse_cap(
            env,
            CATALOG_TOP_RATED_LIMIT_ENV,
            Self::DEFAULT_TOP_RATED_LIMIT,
        );
        let default_page_size = env
            .string(CATALOG_PAGE_SIZE_ENV)
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_PAGE_SIZE)
            .clamp(Self::MIN_CAP as u64, Self::MAX_CAP as u64);

        Self {
            text_result_cap,
            proximity_radius_metres,
            proximity_result_cap,
            min_review_count,
            top_rated_limit,
            default_page_size,
        }
    }

    /// Maximum number of text search results returned.
    pub fn text_result_cap(&self) -> usize {
        self.text_result_cap
    }

    /// Proximity radius in metres used when the caller gives none.
    pub fn proximity_radius_metres(&self) -> f64 {
        self.proximity_radius_metres
    }

    /// Maximum number of proximity results returned.
    pub fn proximity_result_cap(&self) -> usize {
        self.proximity_result_cap
    }

    /// Number of reviews an entry needs before it can be ranked.
    pub fn min_review_count(&self) -> usize {
        self.min_review_count
    }

    /// Maximum length of the top-rated ranking.
    pub fn top_rated_limit(&self) -> usize {
        self.top_rated_limit
    }

    /// Listing page size used when the caller gives none.
    pub fn default_page_size(&self) -> u64 {
        self.default_page_size
    }
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            text_result_cap: Self::DEFAULT_TEXT_RESULT_CAP,
            proximity_radius_metres: Self::DEFAULT_PROXIMITY_RADIUS_METRES,
            proximity_result_cap: Self::DEFAULT_PROXIMITY_RESULT_CAP,
            min_review_count: Self::DEFAULT_MIN_REVIEW_COUNT,
            top_rated_limit: Self::DEFAULT_TOP_RATED_LIMIT,
            default_page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_cap(env: &impl CatalogEnv, name: &str, default: usize) -> usize {
    env.string(name)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default)
        .clamp(QueryLimits::MIN_CAP, QueryLimits::MAX_CAP)
}

/// Field weights applied when scoring text search matches.
///
/// A hit in the entry name counts for more than a hit in the description.
#[derive(Debug, Clone, Copy)]
pub struct TextSearchWeights {
    name: f64,
    description: f64,
}

impl TextSearchWeights {
    /// Default weight of a name-field hit.
    const DEFAULT_NAME_WEIGHT: f64 = 2.0;

    /// Default weight of a description-field hit.
    const DEFAULT_DESCRIPTION_WEIGHT: f64 = 1.0;

    /// Load weights from the real process environment.
    pub fn from_env() -> Self {
        Self::from_env_with(&DefaultCatalogEnv)
    }

    /// Load weights from a custom environment source.
    ///
    /// Weights must be finite and non-negative; anything else falls back to
    /// the default.
    pub fn from_env_with(env: &impl CatalogEnv) -> Self {
        Self {
            name: parse_weight(env, CATALOG_TEXT_NAME_WEIGHT_ENV, Self::DEFAULT_NAME_WEIGHT),
            description: parse_weight(
                env,
                CATALOG_TEXT_DESCRIPTION_WEIGHT_ENV,
                Self::DEFAULT_DESCRIPTION_WEIGHT,
            ),
        }
    }

    /// Weight of a name-field hit.
    pub fn name(&self) -> f64 {
        self.name
    }

    /// Weight of a description-field hit.
    pub fn description(&self) -> f64 {
        self.description
    }
}

impl Default for TextSearchWeights {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME_WEIGHT,
            description: Self::DEFAULT_DESCRIPTION_WEIGHT,
        }
    }
}

fn parse_weight(env: &impl CatalogEnv, name: &str, default: f64) -> f64 {
    env.string(name)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|weight| weight.is_finite() && *weight >= 0.0)
        .unwrap_or(default)
}
