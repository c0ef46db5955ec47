//! Declarative access policy.
//!
//! Every gated operation is a named [`Capability`] with an explicit set of
//! allowed roles, declared once in [`Capability::required_roles`] rather
//! than as inline conditionals in route handlers. The check is pure set
//! membership: there is no hierarchy and no inheritance between roles, so
//! `admin` performs only what its row in the table grants.
//!
//! [`authorize`] runs strictly after token verification. An absent identity
//! denies with [`Deny::Unauthenticated`]; it never panics.

use amal_core::Role;

use crate::models::user::CurrentUser;

/// A named permission gated by one or more required roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    CreateActivity,
    UpdateActivity,
    DeleteActivity,
    CreateDonation,
    UpdateDonation,
    DeleteDonation,
    ListDistributions,
    RecordDistribution,
    UpdateDistribution,
    DeleteDistribution,
    CreateResource,
    UpdateResource,
    DeleteResource,
    UpdateProfile,
    ChangePassword,
}

impl Capability {
    /// The roles allowed to perform this capability.
    ///
    /// Creates and updates of entity records are staff work
    /// (admin/volunteer); deletes are admin-only; the self-service
    /// capabilities are open to any authenticated identity.
    #[must_use]
    pub const fn required_roles(self) -> &'static [Role] {
        match self {
            Self::CreateActivity
            | Self::UpdateActivity
            | Self::CreateDonation
            | Self::UpdateDonation
            | Self::RecordDistribution
            | Self::UpdateDistribution
            | Self::CreateResource
            | Self::UpdateResource => &[Role::Admin, Role::Volunteer],

            Self::DeleteActivity
            | Self::DeleteDonation
            | Self::DeleteDistribution
            | Self::DeleteResource => &[Role::Admin],

            Self::ListDistributions | Self::UpdateProfile | Self::ChangePassword => {
                &[Role::Admin, Role::Volunteer, Role::Beneficiary]
            }
        }
    }
}

/// Reason a capability was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deny {
    /// No identity attached: token verification did not run or failed.
    Unauthenticated,
    /// The identity's role is not in the capability's required set.
    Forbidden,
}

/// Decide whether the identity may perform the capability.
///
/// Side-effect-free and safe to call repeatedly.
///
/// # Errors
///
/// Returns [`Deny::Unauthenticated`] for an absent identity and
/// [`Deny::Forbidden`] for a role outside the required set.
pub fn authorize(identity: Option<&CurrentUser>, capability: Capability) -> Result<(), Deny> {
    let user = identity.ok_or(Deny::Unauthenticated)?;

    if capability.required_roles().contains(&user.role) {
        Ok(())
    } else {
        Err(Deny::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amal_core::UserId;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            role,
        }
    }

    #[test]
    fn test_absent_identity_always_denies() {
        for capability in [
            Capability::CreateDonation,
            Capability::DeleteActivity,
            Capability::UpdateProfile,
        ] {
            assert_eq!(
                authorize(None, capability),
                Err(Deny::Unauthenticated)
            );
        }
    }

    #[test]
    fn test_role_outside_set_is_forbidden() {
        let beneficiary = user(Role::Beneficiary);
        assert_eq!(
            authorize(Some(&beneficiary), Capability::CreateDonation),
            Err(Deny::Forbidden)
        );
        assert_eq!(
            authorize(Some(&beneficiary), Capability::RecordDistribution),
            Err(Deny::Forbidden)
        );
    }

    #[test]
    fn test_role_inside_set_is_allowed() {
        let admin = user(Role::Admin);
        let volunteer = user(Role::Volunteer);
        assert_eq!(authorize(Some(&admin), Capability::CreateDonation), Ok(()));
        assert_eq!(
            authorize(Some(&volunteer), Capability::CreateDonation),
            Ok(())
        );
    }

    #[test]
    fn test_no_inheritance_between_roles() {
        // Deletes list only admin; volunteer does not inherit them
        let volunteer = user(Role::Volunteer);
        assert_eq!(
            authorize(Some(&volunteer), Capability::DeleteDonation),
            Err(Deny::Forbidden)
        );
    }

    #[test]
    fn test_self_service_open_to_all_roles() {
        for role in [Role::Admin, Role::Volunteer, Role::Beneficiary] {
            let u = user(role);
            assert_eq!(authorize(Some(&u), Capability::UpdateProfile), Ok(()));
            assert_eq!(authorize(Some(&u), Capability::ChangePassword), Ok(()));
        }
    }
}
