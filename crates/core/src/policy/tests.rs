use proptest::prelude::*;
use rstest::rstest;
use uuid::Uuid;

use super::*;
use crate::auth::Role;

struct Cast {
    applicant: Actor,
    recruiter: Actor,
    stranger: Actor,
    admin: Actor,
    facts: ApplicationFacts,
}

fn cast() -> Cast {
    let applicant = Actor::new(Uuid::new_v4(), Role::Applicant);
    let recruiter = Actor::new(Uuid::new_v4(), Role::Recruiter);
    Cast {
        applicant,
        recruiter,
        stranger: Actor::new(Uuid::new_v4(), Role::Applicant),
        admin: Actor::new(Uuid::new_v4(), Role::Admin),
        facts: ApplicationFacts {
            applicant_id: applicant.user_id,
            recruiter_id: recruiter.user_id,
        },
    }
}

#[test]
fn test_view_application_parties_only() {
    let c = cast();
    assert_eq!(view_application(&c.applicant, &c.facts), Ok(()));
    assert_eq!(view_application(&c.recruiter, &c.facts), Ok(()));
    assert_eq!(
        view_application(&c.stranger, &c.facts),
        Err(Denial::Forbidden)
    );
    assert_eq!(view_application(&c.admin, &c.facts), Err(Denial::Forbidden));
}

#[test]
fn test_document_view_delete_asymmetry() {
    let c = cast();
    assert_eq!(view_document(&c.recruiter, &c.facts), Ok(()));
    assert_eq!(
        delete_document(&c.recruiter, &c.facts),
        Err(Denial::Forbidden)
    );
    assert_eq!(delete_document(&c.applicant, &c.facts), Ok(()));
}

#[test]
fn test_upload_and_withdraw_applicant_only() {
    let c = cast();
    assert_eq!(upload_document(&c.applicant, &c.facts), Ok(()));
    assert_eq!(
        upload_document(&c.recruiter, &c.facts),
        Err(Denial::Forbidden)
    );
    assert_eq!(withdraw_application(&c.applicant, &c.facts), Ok(()));
    assert_eq!(
        withdraw_application(&c.recruiter, &c.facts),
        Err(Denial::Forbidden)
    );
}

#[test]
fn test_status_change_recruiter_only() {
    let c = cast();
    assert_eq!(update_application_status(&c.recruiter, &c.facts), Ok(()));
    assert_eq!(
        update_application_status(&c.applicant, &c.facts),
        Err(Denial::Forbidden)
    );
}

#[test]
fn test_create_application_rules() {
    let c = cast();
    let offer_owner = c.recruiter.user_id;

    assert_eq!(create_application(&c.applicant, offer_owner, false), Ok(()));
    assert_eq!(
        create_application(&c.applicant, offer_owner, true),
        Err(Denial::Conflict)
    );
    // Self-application is refused before the duplicate check.
    assert_eq!(
        create_application(&c.recruiter, offer_owner, false),
        Err(Denial::Forbidden)
    );
    assert_eq!(
        create_application(&c.recruiter, offer_owner, true),
        Err(Denial::Forbidden)
    );
}

#[rstest]
#[case(Role::Recruiter, true)]
#[case(Role::Applicant, false)]
#[case(Role::Admin, false)]
fn test_create_offer(#[case] role: Role, #[case] allowed: bool) {
    let actor = Actor::new(Uuid::new_v4(), role);
    assert_eq!(create_offer(&actor).is_ok(), allowed);
}

#[test]
fn test_manage_offer_owner_or_admin() {
    let c = cast();
    let facts = OfferFacts {
        recruiter_id: c.recruiter.user_id,
        paused: false,
    };
    let other_recruiter = Actor::new(Uuid::new_v4(), Role::Recruiter);

    assert_eq!(manage_offer(&c.recruiter, &facts), Ok(()));
    assert_eq!(manage_offer(&c.admin, &facts), Ok(()));
    assert_eq!(
        manage_offer(&other_recruiter, &facts),
        Err(Denial::Forbidden)
    );
    assert_eq!(manage_offer(&c.applicant, &facts), Err(Denial::Forbidden));
}

#[test]
fn test_view_offer_visibility() {
    let c = cast();
    let active = OfferFacts {
        recruiter_id: c.recruiter.user_id,
        paused: false,
    };
    let paused = OfferFacts {
        paused: true,
        ..active
    };

    assert_eq!(view_offer(None, &active), Ok(()));
    assert_eq!(view_offer(Some(&c.applicant), &active), Ok(()));
    assert_eq!(view_offer(Some(&c.recruiter), &paused), Ok(()));
    assert_eq!(view_offer(None, &paused), Err(Denial::NotFound));
    assert_eq!(
        view_offer(Some(&c.applicant), &paused),
        Err(Denial::NotFound)
    );
    assert_eq!(view_offer(Some(&c.admin), &paused), Err(Denial::NotFound));
}

#[test]
fn test_modify_user_self_only() {
    let c = cast();
    assert_eq!(modify_user(&c.applicant, c.applicant.user_id), Ok(()));
    assert_eq!(
        modify_user(&c.admin, c.applicant.user_id),
        Err(Denial::Forbidden)
    );
}

#[test]
fn test_require_actor() {
    let c = cast();
    assert_eq!(require_actor(None), Err(Denial::NotAuthenticated));
    assert_eq!(require_actor(Some(&c.applicant)), Ok(&c.applicant));
}

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Applicant),
        Just(Role::Recruiter),
        Just(Role::Admin)
    ]
}

proptest! {
    // A requester who is neither the applicant nor the offer's recruiter is
    // always refused access to the application and its documents.
    #[test]
    fn prop_outsider_never_sees_application(
        role in role_strategy(),
        outsider in any::<u128>(),
        applicant in any::<u128>(),
        recruiter in any::<u128>(),
    ) {
        prop_assume!(outsider != applicant && outsider != recruiter);
        let actor = Actor::new(Uuid::from_u128(outsider), role);
        let facts = ApplicationFacts {
            applicant_id: Uuid::from_u128(applicant),
            recruiter_id: Uuid::from_u128(recruiter),
        };

        prop_assert_eq!(view_application(&actor, &facts), Err(Denial::Forbidden));
        prop_assert_eq!(view_document(&actor, &facts), Err(Denial::Forbidden));
        prop_assert_eq!(delete_document(&actor, &facts), Err(Denial::Forbidden));
    }

    // The offer's recruiter can never apply to their own offer.
    #[test]
    fn prop_self_application_always_forbidden(
        role in role_strategy(),
        id in any::<u128>(),
        already_applied in any::<bool>(),
    ) {
        let actor = Actor::new(Uuid::from_u128(id), role);
        prop_assert_eq!(
            create_application(&actor, actor.user_id, already_applied),
            Err(Denial::Forbidden)
        );
    }

    // Paused offers are indistinguishable from missing ones for non-owners.
    #[test]
    fn prop_paused_offer_hidden_from_non_owners(
        role in role_strategy(),
        viewer in any::<u128>(),
        owner in any::<u128>(),
    ) {
        prop_assume!(viewer != owner);
        let actor = Actor::new(Uuid::from_u128(viewer), role);
        let facts = OfferFacts { recruiter_id: Uuid::from_u128(owner), paused: true };
        prop_assert_eq!(view_offer(Some(&actor), &facts), Err(Denial::NotFound));
    }
}
