//! OpenAPI document for the HTTP API, served at `/openapi.json` and rendered at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    api::{
        self,
        models::{
            auth::{AuthResponse, SigninRequest, SignupRequest},
            bookmarks::{BookmarkCreate, BookmarkResponse, BookmarkUpdate},
            users::{UserResponse, UserUpdate},
        },
    },
    errors::{FieldError, ValidationErrorBody},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token from `/auth/signup` or `/auth/signin`, sent in the `Authorization` header:\n\n\
                            ```\nAuthorization: Bearer YOUR_ACCESS_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "bookmarkd",
        description = "Personal bookmarks behind token authentication. Every bookmark belongs to the user who created it."
    ),
    modifiers(&SecurityAddon),
    paths(
        api::handlers::auth::signup,
        api::handlers::auth::signin,
        api::handlers::users::get_me,
        api::handlers::users::update_me,
        api::handlers::bookmarks::list_bookmarks,
        api::handlers::bookmarks::create_bookmark,
        api::handlers::bookmarks::get_bookmark,
        api::handlers::bookmarks::update_bookmark,
        api::handlers::bookmarks::delete_bookmark,
    ),
    components(schemas(
        SignupRequest,
        SigninRequest,
        AuthResponse,
        UserResponse,
        UserUpdate,
        BookmarkCreate,
        BookmarkUpdate,
        BookmarkResponse,
        ValidationErrorBody,
        FieldError,
    )),
    tags(
        (name = "authentication", description = "Signup and signin"),
        (name = "users", description = "The authenticated user's profile"),
        (name = "bookmarks", description = "Bookmarks owned by the authenticated user"),
    )
)]
pub struct ApiDoc;
