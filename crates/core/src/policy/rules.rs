//! Policy rules, one function per action.

use uuid::Uuid;

use super::{Actor, ApplicationFacts, Decision, Denial, OfferFacts};
use crate::auth::Role;

/// Unwraps the requester or refuses with `NotAuthenticated`.
pub fn require_actor(actor: Option<&Actor>) -> Result<&Actor, Denial> {
    actor.ok_or(Denial::NotAuthenticated)
}

fn allow_if(condition: bool) -> Decision {
    if condition {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

fn is_party(actor: &Actor, facts: &ApplicationFacts) -> bool {
    actor.user_id == facts.applicant_id || actor.user_id == facts.recruiter_id
}

/// View an application.
pub fn view_application(actor: &Actor, facts: &ApplicationFacts) -> Decision {
    allow_if(is_party(actor, facts))
}

/// View or list documents attached to an application.
pub fn view_document(actor: &Actor, facts: &ApplicationFacts) -> Decision {
    view_application(actor, facts)
}

/// Upload (or replace) a document on an application.
pub fn upload_document(actor: &Actor, facts: &ApplicationFacts) -> Decision {
    allow_if(actor.user_id == facts.applicant_id)
}

/// Delete a document. Recruiters may read applicant documents but never delete them.
pub fn delete_document(actor: &Actor, facts: &ApplicationFacts) -> Decision {
    allow_if(actor.user_id == facts.applicant_id)
}

/// Withdraw (delete) an application.
pub fn withdraw_application(actor: &Actor, facts: &ApplicationFacts) -> Decision {
    allow_if(actor.user_id == facts.applicant_id)
}

/// Change the review status of an application.
pub fn update_application_status(actor: &Actor, facts: &ApplicationFacts) -> Decision {
    allow_if(actor.user_id == facts.recruiter_id)
}

/// Apply to an offer.
pub fn create_application(actor: &Actor, offer_recruiter_id: Uuid, already_applied: bool) -> Decision {
    if actor.user_id == offer_recruiter_id {
        return Err(Denial::Forbidden);
    }
    if already_applied {
        return Err(Denial::Conflict);
    }
    Ok(())
}

/// Publish a new offer.
pub fn create_offer(actor: &Actor) -> Decision {
    allow_if(actor.role == Role::Recruiter)
}

/// Modify, pause/activate or delete an offer, or list its applications.
pub fn manage_offer(actor: &Actor, facts: &OfferFacts) -> Decision {
    allow_if(actor.user_id == facts.recruiter_id || actor.role == Role::Admin)
}

/// View an offer. Paused offers look nonexistent to everyone but their owner.
pub fn view_offer(actor: Option<&Actor>, facts: &OfferFacts) -> Decision {
    if !facts.paused {
        return Ok(());
    }
    match actor {
        Some(actor) if actor.user_id == facts.recruiter_id => Ok(()),
        _ => Err(Denial::NotFound),
    }
}

/// Modify or delete a user account (profile, password, deletion).
pub fn modify_user(actor: &Actor, target_user_id: Uuid) -> Decision {
    allow_if(actor.user_id == target_user_id)
}
