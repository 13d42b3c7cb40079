use axum::Json;

use crate::{models::GeneratedName, services::name_generator};

/// GET /generate-name
pub async fn generate_name() -> Json<GeneratedName> {
    Json(GeneratedName {
        name: name_generator::generate_name(),
    })
}
