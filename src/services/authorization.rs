use tracing::warn;

use crate::entities::reservation;
use crate::entities::user::UserRole;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;

/// Admins and sales advisors see every reservation; agency users see
/// only their own agency's.
pub fn can_access_reservation(claims: &Claims, reservation: &reservation::Model) -> bool {
    match claims.role {
        UserRole::Admin | UserRole::SalesAdvisor => true,
        UserRole::Agency => match (claims.agency_id, reservation.agency_id) {
            (Some(own), Some(owner)) => own == owner,
            _ => false,
        },
    }
}

pub fn ensure_reservation_access(
    claims: &Claims,
    reservation: &reservation::Model,
) -> AppResult<()> {
    if can_access_reservation(claims, reservation) {
        return Ok(());
    }
    warn!(
        user = %claims.sub,
        reservation = %reservation.code,
        "denied cross-agency reservation access"
    );
    Err(AppError::Forbidden(
        "You do not have access to this reservation".to_string(),
    ))
}

/// Agency users may only create reservations tied to their own agency.
pub fn ensure_creation_allowed(claims: &Claims, requested_agency: Option<i32>) -> AppResult<()> {
    if claims.role != UserRole::Agency {
        return Ok(());
    }

    let Some(own) = claims.agency_id else {
        return Err(AppError::Conflict(
            "Agency user has no agency assigned".to_string(),
        ));
    };

    match requested_agency {
        Some(id) if id == own => Ok(()),
        Some(_) => Err(AppError::Forbidden(
            "You cannot create reservations for another agency".to_string(),
        )),
        None => Err(AppError::Forbidden(
            "Agency reservations must be tied to your own agency".to_string(),
        )),
    }
}

/// Agency id to filter listings by, if the caller is agency-scoped.
pub fn agency_scope(claims: &Claims) -> Option<i32> {
    match claims.role {
        UserRole::Agency => claims.agency_id,
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::entities::reservation::ReservationStatus;

    fn claims(role: UserRole, agency_id: Option<i32>) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            email: "user@rivertravel.com".to_string(),
            role,
            agency_id,
            exp: 0,
            iat: 0,
        }
    }

    fn reservation_for(agency_id: Option<i32>) -> reservation::Model {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        reservation::Model {
            id: Uuid::new_v4(),
            code: "RV-2025-000007".to_string(),
            trip_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            agency_id,
            origin: "Iquitos".to_string(),
            destination: "Nauta".to_string(),
            total: Decimal::from(100),
            amount_paid: Decimal::ZERO,
            balance_due: Decimal::from(100),
            penalty_applied: Decimal::ZERO,
            agency_commission: Decimal::ZERO,
            status: ReservationStatus::Pending,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn staff_roles_see_everything() {
        let res = reservation_for(Some(7));
        assert!(can_access_reservation(&claims(UserRole::Admin, None), &res));
        assert!(can_access_reservation(&claims(UserRole::SalesAdvisor, None), &res));
    }

    #[test]
    fn agency_users_are_scoped_to_their_agency() {
        let res = reservation_for(Some(7));
        assert!(can_access_reservation(&claims(UserRole::Agency, Some(7)), &res));
        assert!(!can_access_reservation(&claims(UserRole::Agency, Some(8)), &res));
    }

    #[test]
    fn agency_users_cannot_see_direct_sales() {
        let res = reservation_for(None);
        assert!(!can_access_reservation(&claims(UserRole::Agency, Some(7)), &res));
        assert!(ensure_reservation_access(&claims(UserRole::Agency, Some(7)), &res).is_err());
    }

    #[test]
    fn agency_creation_must_target_own_agency() {
        let c = claims(UserRole::Agency, Some(7));
        assert!(ensure_creation_allowed(&c, Some(7)).is_ok());
        assert!(ensure_creation_allowed(&c, Some(8)).is_err());
        assert!(ensure_creation_allowed(&c, None).is_err());
    }

    #[test]
    fn staff_create_for_any_agency_or_none() {
        let c = claims(UserRole::SalesAdvisor, None);
        assert!(ensure_creation_allowed(&c, Some(3)).is_ok());
        assert!(ensure_creation_allowed(&c, None).is_ok());
    }

    #[test]
    fn listing_scope_follows_the_role() {
        assert_eq!(agency_scope(&claims(UserRole::Agency, Some(7))), Some(7));
        assert_eq!(agency_scope(&claims(UserRole::Admin, None)), None);
        assert_eq!(agency_scope(&claims(UserRole::SalesAdvisor, Some(9))), None);
    }
}
