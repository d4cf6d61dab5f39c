//! Row-level visibility scope resolver.
//!
//! Every handler resolves the caller's scope exactly once and threads the
//! result into its queries, instead of re-deriving role branches per
//! endpoint. A non-admin caller is always pinned to their own id: the
//! `profesionalId` query parameter is never trusted from client input.

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::Role;

/// Sentinel values an admin may pass to request the unscoped view.
const SENTINELS: [&str; 2] = ["all", "todos"];

/// Resolve the professional filter for a request.
///
/// Returns `None` for the unscoped (admin, all-professionals) view, or
/// `Some(id)` to restrict every query to that professional's rows.
pub fn resolver(
    rol: Role,
    caller_id: Uuid,
    solicitado: Option<&str>,
) -> Result<Option<Uuid>, AppError> {
    if rol != Role::Admin {
        return Ok(Some(caller_id));
    }

    match solicitado {
        None => Ok(None),
        Some(s) if SENTINELS.contains(&s) => Ok(None),
        Some(s) => s
            .parse::<Uuid>()
            .map(Some)
            .map_err(|_| AppError::Validation("Invalid profesionalId parameter".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profesional_is_pinned_to_own_id() {
        let propio = Uuid::new_v4();
        let ajeno = Uuid::new_v4();

        // Passing another professional's id must be neutralized.
        let scope = resolver(Role::Profesional, propio, Some(&ajeno.to_string())).unwrap();
        assert_eq!(scope, Some(propio));

        // Same result with no parameter at all.
        let scope = resolver(Role::Profesional, propio, None).unwrap();
        assert_eq!(scope, Some(propio));

        // Sentinels do not widen a professional's view either.
        let scope = resolver(Role::Profesional, propio, Some("all")).unwrap();
        assert_eq!(scope, Some(propio));
    }

    #[test]
    fn admin_without_parameter_is_unscoped() {
        let scope = resolver(Role::Admin, Uuid::new_v4(), None).unwrap();
        assert_eq!(scope, None);
    }

    #[test]
    fn admin_sentinel_is_unscoped() {
        let admin = Uuid::new_v4();
        assert_eq!(resolver(Role::Admin, admin, Some("all")).unwrap(), None);
        assert_eq!(resolver(Role::Admin, admin, Some("todos")).unwrap(), None);
    }

    #[test]
    fn admin_explicit_id_is_honored() {
        let objetivo = Uuid::new_v4();
        let scope = resolver(Role::Admin, Uuid::new_v4(), Some(&objetivo.to_string())).unwrap();
        assert_eq!(scope, Some(objetivo));
    }

    #[test]
    fn admin_malformed_id_is_validation_error() {
        let result = resolver(Role::Admin, Uuid::new_v4(), Some("no-un-uuid"));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
