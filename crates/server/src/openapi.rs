//! OpenAPI document served at `/api-docs/openapi.json` and browsable at `/docs`.
//!
//! Request schemas below mirror the JSON and form bodies the handlers accept;
//! they exist for documentation only.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct RegisterRequest { pub name: String, pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct ForgotPasswordRequest { pub email: String }

#[derive(ToSchema)]
pub struct VerifyOtpRequest { pub email: String, pub otp: String }

#[derive(ToSchema)]
pub struct ResetPasswordRequest { pub email: String, pub new_password: String }

#[derive(ToSchema)]
pub struct UpdateProfileRequest { pub name: Option<String>, pub email: Option<String>, pub password: Option<String> }

/// Multipart client form. `name` and `language` are required on create.
#[derive(ToSchema)]
pub struct ClientForm {
    pub name: Option<String>,
    pub language: Option<String>,
    pub business_status: Option<String>,
    pub place_id: Option<String>,
    pub public_url: Option<String>,
    pub status: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub admin_notes: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub logo: Option<Vec<u8>>,
}

/// Ratings of 3 or less need a comment.
#[derive(ToSchema)]
pub struct ReviewRequest {
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i64,
    pub comment: Option<String>,
    pub contact: Option<String>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::admin::register,
        crate::routes::admin::login,
        crate::routes::admin::forgot_password,
        crate::routes::admin::verify_otp,
        crate::routes::admin::reset_password,
        crate::routes::admin::me,
        crate::routes::admin::update_me,
        crate::routes::clients::list,
        crate::routes::clients::create,
        crate::routes::clients::get,
        crate::routes::clients::update,
        crate::routes::clients::delete,
        crate::routes::reviews::submit,
        crate::routes::reviews::list_for_client,
        crate::routes::reviews::list_all,
        crate::routes::reviews::delete,
        crate::routes::public::client_page,
        crate::routes::dashboard::stats,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            ForgotPasswordRequest,
            VerifyOtpRequest,
            ResetPasswordRequest,
            UpdateProfileRequest,
            ClientForm,
            ReviewRequest,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "admin"),
        (name = "clients"),
        (name = "reviews"),
        (name = "public"),
        (name = "dashboard")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/admin/login", "/admin/me", "/clients", "/clients/{client}", "/clients/{client}/avis", "/avis/{id}", "/public/{slug}", "/dashboard"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
