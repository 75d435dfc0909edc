//! OpenAPI document for the admin trust API, served through Swagger UI at
//! `/docs`.

use utoipa::OpenApi;

use crate::api::handlers::{activity_log, dev, health, metrics, users, ErrorMessage};
use crate::store::{AuditEntry, Role, UserRecord};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LoveDate Admin Trust API",
        description = "Admin-only moderation API: user records, verification, bans, and the audit trail."
    ),
    paths(
        health::health,
        users::list_users,
        users::get_user,
        users::verify_user,
        users::ban_user,
        activity_log::activity_log,
        metrics::metrics,
        dev::session,
        dev::seed,
    ),
    components(schemas(
        UserRecord,
        Role,
        AuditEntry,
        ErrorMessage,
        users::UserListResponse,
        users::UserResponse,
        users::BanRequest,
        metrics::MetricsResponse,
        dev::DevSessionResponse,
        dev::SeedResponse,
        health::Health,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "admin-users", description = "User moderation"),
        (name = "admin-audit", description = "Audit trail"),
        (name = "admin-metrics", description = "Dashboard metrics"),
        (name = "dev", description = "Dev-only helpers"),
    )
)]
pub struct ApiDoc;
