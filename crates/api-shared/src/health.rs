use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Simple health service shared by every IdeaHub server.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Reports the named component as alive.
    ///
    /// The check is static: the web frontend stays healthy while the idea store is down,
    /// since store failures surface per request.
    pub fn check_health(component: &str) -> HealthRes {
        HealthRes {
            ok: true,
            message: format!("{component} is alive"),
        }
    }
}
