use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use scholaris_auth::TokenPair;
use scholaris_core::{AccountStatus, Role};
use scholaris_models::{
    Account, Identity, LoginRequest, LoginResponse, LogoutRequest, MessageResponse,
    ParentProfile, RefreshTokenRequest, SessionResponse, StudentProfile, TeacherProfile,
};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::get_me,
        crate::modules::auth::controller::get_session,
        crate::modules::students::controller::get_student,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::parents::controller::get_parent,
        crate::modules::admin::controller::get_account,
    ),
    components(
        schemas(
            Role,
            AccountStatus,
            Account,
            Identity,
            LoginRequest,
            LoginResponse,
            RefreshTokenRequest,
            LogoutRequest,
            TokenPair,
            SessionResponse,
            MessageResponse,
            StudentProfile,
            TeacherProfile,
            ParentProfile,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, token rotation and session endpoints"),
        (name = "Students", description = "Student records, ownership checked"),
        (name = "Teachers", description = "Teacher records, ownership checked"),
        (name = "Parents", description = "Parent records, ownership checked"),
        (name = "Admin", description = "Administrator-only endpoints")
    ),
    info(
        title = "Scholaris API",
        version = "0.1.0",
        description = "School management REST API: JWT authentication, role gates and per-resource ownership checks.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
