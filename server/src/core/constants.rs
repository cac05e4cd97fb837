// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Bodega";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "bodega";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".bodega";

// =============================================================================
// Configuration Files
// =============================================================================

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "BODEGA_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "BODEGA_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "BODEGA_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "BODEGA_LOG";

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "BODEGA_DATA_DIR";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8000;

// =============================================================================
// Authentication
// =============================================================================

/// Environment variable for the JWT signing secret (64 hex chars)
pub const ENV_JWT_SECRET: &str = "BODEGA_JWT_SECRET";

/// Environment variable for the access token TTL in minutes
pub const ENV_TOKEN_TTL_MINUTES: &str = "BODEGA_TOKEN_TTL_MINUTES";

/// Environment variable for the seeded admin password
pub const ENV_ADMIN_PASSWORD: &str = "BODEGA_ADMIN_PASSWORD";

/// Cookie name for the access token
pub const TOKEN_COOKIE_NAME: &str = "bodega_token";

/// Default access token TTL in minutes
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Role name: regular user
pub const ROLE_USER: &str = "user";

/// Role name: administrator
pub const ROLE_ADMIN: &str = "admin";

/// Username of the seeded admin account
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Fallback password for the seeded admin account (dev only, warned at startup)
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Client id of the seeded OAuth client
pub const DEFAULT_OAUTH_CLIENT_ID: &str = "app123";

/// Secret of the seeded OAuth client (dev only)
pub const DEFAULT_OAUTH_CLIENT_SECRET: &str = "secret456";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "bodega.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default body limit for general API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Body limit for auth endpoints (64 KB)
pub const AUTH_BODY_LIMIT: usize = 64 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
