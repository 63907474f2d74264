//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::account::{Account, AccountPayload};
use crate::gateway::handlers::HealthResponse;

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Account API",
        version = "1.0.0",
        description = "RESTful API for managing bank accounts. Account 1 is a protected seed record.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::accounts::list_accounts,
        crate::gateway::handlers::accounts::get_account,
        crate::gateway::handlers::accounts::create_account,
        crate::gateway::handlers::accounts::update_account,
        crate::gateway::handlers::accounts::delete_account,
    ),
    components(
        schemas(
            Account,
            AccountPayload,
            HealthResponse,
        )
    ),
    tags(
        (name = "Accounts", description = "RESTful API for managing accounts"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
