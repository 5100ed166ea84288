use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Pulls in the domain documents, whose paths are already absolute below `/api`.
struct DomainDocs;

impl Modify for DomainDocs {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.merge(domain_todos::TodosApiDoc::openapi());
        openapi.merge(domain_users::AuthApiDoc::openapi());
    }
}

/// Declares the `bearer_auth` scheme referenced by the protected todo routes.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Todos API",
        version = "0.1.0",
        description = "Personal todo list with token-protected mutations"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    modifiers(&DomainDocs, &BearerAuth)
)]
pub struct ApiDoc;
