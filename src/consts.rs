pub mod embed_consts {
    //! Embed Configuration Constants
    //!
    //! Timing, retry and layout constants shared by the controller, the page
    //! host and the headless watch mode, grouped by functional area.

    // =============================================================================
    // DISPLAY REGION
    // =============================================================================

    /// Identifier of the region the dashboard widget is mounted into.
    pub const CONTAINER_ID: &str = "dashboard-content";

    /// Maximum number of queued controller events.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // CONTROLLER TIMING
    // =============================================================================

    /// Controller retry and cleanup configuration
    pub mod controller {
        use std::time::Duration;

        /// Number of automatic re-initializations after the first failure
        pub const MAX_RETRIES: u32 = 3;

        /// Delay before an automatic re-initialization (milliseconds)
        pub const RETRY_DELAY_MS: u64 = 3_000;

        /// Delay before the second, late loading-overlay cleanup (milliseconds)
        /// Covers SDK DOM writes that land after initialization resolves.
        pub const LOADING_CLEANUP_DELAY_MS: u64 = 2_000;

        /// Delay after page start before any leftover loading overlay is forced away
        pub const PAGE_READY_CLEANUP_DELAY_MS: u64 = 5_000;

        /// Helper function to get the retry delay
        pub const fn retry_delay() -> Duration {
            Duration::from_millis(RETRY_DELAY_MS)
        }

        /// Helper function to get the late loading cleanup delay
        pub const fn loading_cleanup_delay() -> Duration {
            Duration::from_millis(LOADING_CLEANUP_DELAY_MS)
        }

        /// Helper function to get the page-ready cleanup delay
        pub const fn page_ready_cleanup_delay() -> Duration {
            Duration::from_millis(PAGE_READY_CLEANUP_DELAY_MS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// HTTP client configuration for token minting and the published dashboard API
    pub mod http {
        use std::time::Duration;

        /// Connect timeout for outbound requests (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Overall request timeout for outbound requests (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // PAGE HOST
    // =============================================================================

    /// Embed page host configuration
    pub mod server {
        /// Default listening port
        pub const DEFAULT_PORT: u16 = 3000;

        /// Default bind address
        pub const DEFAULT_HOST: &str = "0.0.0.0";

        /// Default page template location, relative to the working directory
        pub const DEFAULT_TEMPLATE_PATH: &str = "templates/index.html";

        /// Default static asset directory, relative to the working directory
        pub const DEFAULT_STATIC_DIR: &str = "static";

        /// Cache-Control header value for static assets
        pub const STATIC_CACHE_CONTROL: &str = "public, max-age=3600";
    }
}
