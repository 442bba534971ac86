use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: String,
    #[schema(example = "2025-01-01T10:00:00+00:00")]
    pub timestamp: String,
    #[schema(example = "development")]
    pub environment: String,
}
