use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    error::AppError,
    models::{Requester, SYSTEM_ACTOR, UNKNOWN_USER},
};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Identity claimed through `x-user-id` / `x-user-name`, trusted as sent.
#[derive(Debug, Clone, Default)]
pub struct CallerIdentity {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

impl CallerIdentity {
    pub fn requester(&self, user_id: Option<String>, user_name: Option<String>) -> Requester {
        Requester {
            user_id: user_id
                .or_else(|| self.user_id.clone())
                .unwrap_or_else(|| UNKNOWN_USER.to_string()),
            user_name: user_name
                .or_else(|| self.user_name.clone())
                .unwrap_or_else(|| UNKNOWN_USER.to_string()),
        }
    }

    pub fn approver(&self, approved_by: Option<String>) -> String {
        approved_by
            .or_else(|| self.user_id.clone())
            .unwrap_or_else(|| SYSTEM_ACTOR.to_string())
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CallerIdentity {
            user_id: header_value(parts, USER_ID_HEADER),
            user_name: header_value(parts, USER_NAME_HEADER),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requester_prefers_body_then_header_then_unknown() {
        let caller = CallerIdentity {
            user_id: Some("hdr-id".into()),
            user_name: None,
        };
        let requester = caller.requester(Some("body-id".into()), None);
        assert_eq!(requester.user_id, "body-id");
        assert_eq!(requester.user_name, "unknown");

        let requester = caller.requester(None, Some("Bea".into()));
        assert_eq!(requester.user_id, "hdr-id");
        assert_eq!(requester.user_name, "Bea");
    }

    #[test]
    fn approver_defaults_to_system() {
        assert_eq!(CallerIdentity::default().approver(None), "system");
        assert_eq!(
            CallerIdentity::default().approver(Some("lab-admin".into())),
            "lab-admin"
        );
    }
}
