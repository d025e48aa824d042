//! One-shot flash messages carried across redirects in a cookie.

use crate::web::FlashView;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::convert::Infallible;

const FLASH_COOKIE: &str = "taskboard_flash";

/// Outcome codes stored in the flash cookie.
///
/// The cookie carries a code rather than free text so the response never
/// echoes client-controlled content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashCode {
    /// A task was created.
    Created,
    /// A task was updated.
    Updated,
    /// A task was deleted.
    Deleted,
    /// Creating a task failed in the store.
    CreateFailed,
    /// Updating a task failed in the store.
    UpdateFailed,
    /// Deleting a task failed in the store.
    DeleteFailed,
}

impl FlashCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::CreateFailed => "create_failed",
            Self::UpdateFailed => "update_failed",
            Self::DeleteFailed => "delete_failed",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "created" => Some(Self::Created),
            "updated" => Some(Self::Updated),
            "deleted" => Some(Self::Deleted),
            "create_failed" => Some(Self::CreateFailed),
            "update_failed" => Some(Self::UpdateFailed),
            "delete_failed" => Some(Self::DeleteFailed),
            _ => None,
        }
    }

    /// Message shown in the banner.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Created => "Task created successfully!",
            Self::Updated => "Task updated successfully!",
            Self::Deleted => "Task deleted successfully!",
            Self::CreateFailed => "Failed to create task.",
            Self::UpdateFailed => "Failed to update task.",
            Self::DeleteFailed => "Failed to delete task.",
        }
    }

    /// Bootstrap alert level for the banner.
    #[must_use]
    pub fn level(self) -> &'static str {
        match self {
            Self::Created | Self::Updated | Self::Deleted => "success",
            Self::CreateFailed | Self::UpdateFailed | Self::DeleteFailed => "danger",
        }
    }

    /// Builds the banner view model.
    #[must_use]
    pub fn view(self) -> FlashView {
        FlashView {
            level: self.level().to_owned(),
            message: self.message().to_owned(),
        }
    }
}

/// Extractor for a pending flash message.
///
/// Pages that render the banner must also attach [`clear_flash`] so the
/// message shows exactly once.
#[derive(Debug, Clone, Copy)]
pub struct Flash(pub Option<FlashCode>);

impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let code = parts
            .headers
            .get(COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(find_flash_cookie);
        Ok(Self(code))
    }
}

fn find_flash_cookie(header: &str) -> Option<FlashCode> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == FLASH_COOKIE).then(|| FlashCode::parse(value))?
    })
}

/// Redirects with `303 See Other`, storing a flash code for the next page.
pub fn redirect_with_flash(location: &str, code: FlashCode) -> Response {
    let cookie = format!("{FLASH_COOKIE}={}; Path=/; HttpOnly", code.as_str());
    match (
        HeaderValue::from_str(location),
        HeaderValue::from_str(&cookie),
    ) {
        (Ok(location), Ok(cookie)) => (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, location), (SET_COOKIE, cookie)],
        )
            .into_response(),
        // Locations are server-built paths; a malformed one is a defect,
        // not a client error.
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Attaches a cookie expiring the flash message to a rendered response.
pub fn clear_flash(mut response: Response) -> Response {
    let cleared = format!("{FLASH_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    if let Ok(value) = HeaderValue::from_str(&cleared) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_flash_cookie_among_others() {
        let header = "session=abc; taskboard_flash=created; theme=dark";
        assert_eq!(find_flash_cookie(header), Some(FlashCode::Created));
    }

    #[test]
    fn ignores_unknown_flash_values() {
        assert_eq!(find_flash_cookie("taskboard_flash=bogus"), None);
        assert_eq!(find_flash_cookie("other=created"), None);
    }

    #[test]
    fn codes_round_trip_and_carry_levels() {
        for code in [
            FlashCode::Created,
            FlashCode::Updated,
            FlashCode::Deleted,
            FlashCode::CreateFailed,
            FlashCode::UpdateFailed,
            FlashCode::DeleteFailed,
        ] {
            assert_eq!(FlashCode::parse(code.as_str()), Some(code));
        }
        assert_eq!(FlashCode::Created.level(), "success");
        assert_eq!(FlashCode::DeleteFailed.level(), "danger");
    }
}
