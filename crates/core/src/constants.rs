use std::time::Duration;

/// Idea store used when `IDEAHUB_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path segment under the API base URL that holds idea resources.
pub const IDEAS_RESOURCE: &str = "ideas";
