//! Descriptor table for every remote operation.
//!
//! Each operation is a `const Operation` (id, method, path template). The
//! facade invokes them through one generic function; the user-service
//! wrappers are expanded from `for_each_user_service_op!` so the table and
//! the typed methods cannot drift apart.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::ApiError;
use crate::http::HttpMethod;

/// Characters left as-is in a path segment (RFC 3986 unreserved).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub const USER_SERVICE_PREFIX: &str = "/userservice.v1.UserService/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub id: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
}

impl Operation {
    /// Names of the `{token}`s in the path template, in order.
    pub fn path_params(&self) -> impl Iterator<Item = &'static str> {
        let path: &'static str = self.path;
        path.split('{')
            .skip(1)
            .filter_map(|rest| rest.split_once('}').map(|(name, _)| name))
    }

    /// Substitute every `{token}` with its percent-encoded value.
    pub fn resolve_path(&self, params: &[(&str, &str)]) -> Result<String, ApiError> {
        resolve_path(self.path, params)
    }
}

pub fn resolve_path(template: &str, params: &[(&str, &str)]) -> Result<String, ApiError> {
    let mut resolved = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        let value = params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| ApiError::MissingPathParam(name.to_string()))?;
        // URL parsing would collapse these into the parent path.
        if value == "." || value == ".." {
            return Err(ApiError::InvalidPathParam {
                name: name.to_string(),
                value: value.to_string(),
            });
        }

        resolved.push_str(&rest[..start]);
        resolved.extend(utf8_percent_encode(value, PATH_SEGMENT));
        rest = &rest[start + len + 1..];
    }
    resolved.push_str(rest);
    Ok(resolved)
}

pub const LIST_PETS: Operation = Operation {
    id: "listPets",
    method: HttpMethod::Get,
    path: "/pets",
};

pub const CREATE_PET: Operation = Operation {
    id: "createPet",
    method: HttpMethod::Post,
    path: "/pets",
};

pub const GET_PET: Operation = Operation {
    id: "getPet",
    method: HttpMethod::Get,
    path: "/pets/{petId}",
};

pub const UPDATE_PET: Operation = Operation {
    id: "updatePet",
    method: HttpMethod::Put,
    path: "/pets/{petId}",
};

pub const DELETE_PET: Operation = Operation {
    id: "deletePet",
    method: HttpMethod::Delete,
    path: "/pets/{petId}",
};

pub const PET_STORE: &[Operation] = &[LIST_PETS, CREATE_PET, GET_PET, UPDATE_PET, DELETE_PET];

/// Calls `$callback!` with one `CONST, fn_name, "RpcMethod", "doc";` row per
/// user-service method.
macro_rules! for_each_user_service_op {
    ($callback:ident) => {
        $callback! {
            REGISTER_USER, register_user, "RegisterUser", "Register a new user account.";
            LOGIN_USER, login_user, "LoginUser", "Authenticate a user and create a session.";
            REFRESH_TOKEN, refresh_token, "RefreshToken", "Refresh an authentication token.";
            LOGOUT_USER, logout_user, "LogoutUser", "Log out a user and invalidate the session.";
            GET_USER, get_user, "GetUser", "Get a user profile by ID.";
            GET_CURRENT_USER, get_current_user, "GetCurrentUser", "Get the authenticated user's profile.";
            UPDATE_USER, update_user, "UpdateUser", "Update user profile information.";
            DELETE_USER, delete_user, "DeleteUser", "Delete a user account.";
            LIST_USERS, list_users, "ListUsers", "List users with pagination and filtering.";
            CHANGE_PASSWORD, change_password, "ChangePassword", "Change a user's password.";
            RESET_PASSWORD, reset_password, "ResetPassword", "Reset a user's password.";
            SEND_VERIFICATION_EMAIL, send_verification_email, "SendVerificationEmail", "Send an email verification message.";
            VERIFY_EMAIL, verify_email, "VerifyEmail", "Verify an email address.";
            LIST_USER_SESSIONS, list_user_sessions, "ListUserSessions", "List a user's active sessions.";
            REVOKE_SESSION, revoke_session, "RevokeSession", "Revoke a session.";
            GET_USER_PREFERENCES, get_user_preferences, "GetUserPreferences", "Get a user's preferences.";
            UPDATE_USER_PREFERENCES, update_user_preferences, "UpdateUserPreferences", "Update a user's preferences.";
        }
    };
}
pub(crate) use for_each_user_service_op;

macro_rules! user_service_consts {
    ($($konst:ident, $fn_name:ident, $rpc:literal, $doc:literal;)*) => {
        $(
            #[doc = $doc]
            pub const $konst: Operation = Operation {
                id: $rpc,
                method: HttpMethod::Post,
                path: concat!("/userservice.v1.UserService/", $rpc),
            };
        )*

        pub const USER_SERVICE: &[Operation] = &[$($konst),*];
    };
}

for_each_user_service_op!(user_service_consts);

/// Look an operation up by its identifier (`listPets`, `LoginUser`, ...).
pub fn find(id: &str) -> Option<&'static Operation> {
    PET_STORE.iter().chain(USER_SERVICE).find(|op| op.id == id)
}
