use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::database::is_unique_violation;
use crate::database::models::{Contact, KeyRecord, SharedKeySummary, User, UserProfile};
use crate::database::types::{ContactStatus, DUuid};
use crate::database::Database;

use super::CustodyError;

/// Answer a target may give to a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RespondAction {
    Accept,
    Reject,
}

impl std::str::FromStr for RespondAction {
    type Err = CustodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(RespondAction::Accept),
            "reject" => Ok(RespondAction::Reject),
            other => Err(CustodyError::InvalidAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub enum RespondOutcome {
    Accepted(Contact),
    Rejected,
}

/// One accepted contact, whichever side initiated the relationship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactEntry {
    pub relation_id: DUuid,
    #[serde(flatten)]
    pub user: UserProfile,
    pub trust_level: i64,
    pub initiated_by_me: bool,
    /// Keys this contact has shared into the caller's vault
    pub shared_keys: Vec<SharedKeySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingEntry {
    pub relation_id: DUuid,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactList {
    pub contacts: Vec<ContactEntry>,
    pub pending_received: Vec<PendingEntry>,
    pub pending_sent: Vec<PendingEntry>,
}

/// Ask `target` to become a contact of `initiator`
pub async fn request_contact(
    db: &Database,
    initiator: DUuid,
    target: DUuid,
) -> Result<Contact, CustodyError> {
    if initiator == target {
        return Err(CustodyError::SelfReference);
    }
    if User::get(target, db).await?.is_none() {
        return Err(CustodyError::NotFound("user"));
    }
    if let Some(existing) = Contact::between(initiator, target, db).await? {
        return Err(CustodyError::DuplicateRelation(existing.status));
    }

    match Contact::create_pending(initiator, target, db).await {
        Ok(contact) => {
            tracing::info!(
                relation_id = %contact.id,
                %initiator,
                %target,
                "contact request created"
            );
            Ok(contact)
        }
        // lost a race with a concurrent request for the same pair
        Err(e) if is_unique_violation(&e) => {
            let status = Contact::between(initiator, target, db)
                .await?
                .map(|c| c.status)
                .unwrap_or(ContactStatus::Pending);
            Err(CustodyError::DuplicateRelation(status))
        }
        Err(e) => Err(e.into()),
    }
}

/// Accept or reject a request addressed to `responder`
pub async fn respond_to_request(
    db: &Database,
    relation_id: DUuid,
    responder: DUuid,
    action: &str,
) -> Result<RespondOutcome, CustodyError> {
    if Contact::get_for_target(relation_id, responder, db)
        .await?
        .is_none()
    {
        return Err(CustodyError::NotFound("contact request"));
    }

    match action.parse::<RespondAction>()? {
        RespondAction::Accept => {
            let contact = Contact::accept(relation_id, responder, db)
                .await?
                .ok_or(CustodyError::NotFound("contact request"))?;
            tracing::info!(%relation_id, %responder, "contact request accepted");
            Ok(RespondOutcome::Accepted(contact))
        }
        RespondAction::Reject => {
            if !Contact::delete(relation_id, responder, db).await? {
                return Err(CustodyError::NotFound("contact request"));
            }
            tracing::info!(%relation_id, %responder, "contact request rejected");
            Ok(RespondOutcome::Rejected)
        }
    }
}

/// Everything `user_id` needs to render their contacts: accepted contacts in
///  either direction as one list, plus pending requests each way
pub async fn list_contacts(db: &Database, user_id: DUuid) -> Result<ContactList, CustodyError> {
    let relations = Contact::list_involving(user_id, db).await?;

    let mut shared_by_owner: HashMap<DUuid, Vec<SharedKeySummary>> = HashMap::new();
    for key in KeyRecord::shared_with(user_id, db).await? {
        if let Some(owner) = key.origin_owner_id {
            shared_by_owner.entry(owner).or_default().push(key);
        }
    }

    let mut as_initiator = Vec::new();
    let mut as_target = Vec::new();
    let mut list = ContactList::default();

    for relation in relations {
        let initiated_by_me = relation.user_id == user_id;
        match (relation.status, initiated_by_me) {
            (ContactStatus::Accepted, true) => as_initiator.push(relation),
            (ContactStatus::Accepted, false) => as_target.push(relation),
            (ContactStatus::Pending, false) => list.pending_received.push(PendingEntry {
                relation_id: relation.id,
                user: relation.other(),
            }),
            (ContactStatus::Pending, true) => list.pending_sent.push(PendingEntry {
                relation_id: relation.id,
                user: relation.other(),
            }),
        }
    }

    list.contacts = as_initiator
        .into_iter()
        .chain(as_target)
        .map(|relation| {
            let user = relation.other();
            ContactEntry {
                relation_id: relation.id,
                shared_keys: shared_by_owner.remove(&user.id).unwrap_or_default(),
                trust_level: relation.trust_level,
                initiated_by_me: relation.user_id == user_id,
                user,
            }
        })
        .collect();

    Ok(list)
}

/// Fails with `Forbidden` unless `a` and `b` are accepted contacts
pub async fn require_accepted(db: &Database, a: DUuid, b: DUuid) -> Result<Contact, CustodyError> {
    Contact::accepted_between(a, b, db)
        .await?
        .ok_or(CustodyError::Forbidden)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::custody::register;

    async fn setup() -> (Database, DUuid, DUuid) {
        let db = Database::in_memory().await.unwrap();
        let a = register(&db, "a@example.com", "alice", "h").await.unwrap();
        let b = register(&db, "b@example.com", "bob", "h").await.unwrap();
        (db, a.id, b.id)
    }

    #[tokio::test]
    async fn test_self_request_rejected() {
        let (db, a, _) = setup().await;
        let result = request_contact(&db, a, a).await;
        assert!(matches!(result, Err(CustodyError::SelfReference)));
    }

    #[tokio::test]
    async fn test_unknown_target() {
        let (db, a, _) = setup().await;
        let result = request_contact(&db, a, DUuid::new()).await;
        assert!(matches!(result, Err(CustodyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_reports_existing_status() {
        let (db, a, b) = setup().await;
        let request = request_contact(&db, a, b).await.unwrap();

        let again = request_contact(&db, b, a).await;
        assert!(matches!(
            again,
            Err(CustodyError::DuplicateRelation(ContactStatus::Pending))
        ));

        respond_to_request(&db, request.id, b, "accept").await.unwrap();
        let again = request_contact(&db, a, b).await;
        assert!(matches!(
            again,
            Err(CustodyError::DuplicateRelation(ContactStatus::Accepted))
        ));
    }

    #[tokio::test]
    async fn test_initiator_cannot_respond() {
        let (db, a, b) = setup().await;
        let request = request_contact(&db, a, b).await.unwrap();

        let result = respond_to_request(&db, request.id, a, "accept").await;
        assert!(matches!(result, Err(CustodyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_action() {
        let (db, a, b) = setup().await;
        let request = request_contact(&db, a, b).await.unwrap();

        let result = respond_to_request(&db, request.id, b, "block").await;
        assert!(matches!(result, Err(CustodyError::InvalidAction(action)) if action == "block"));
        // still pending
        assert_eq!(list_contacts(&db, b).await.unwrap().pending_received.len(), 1);
    }

    #[tokio::test]
    async fn test_reject_allows_new_request() {
        let (db, a, b) = setup().await;
        let request = request_contact(&db, a, b).await.unwrap();

        let outcome = respond_to_request(&db, request.id, b, "reject").await.unwrap();
        assert!(matches!(outcome, RespondOutcome::Rejected));
        assert!(Contact::between(a, b, &db).await.unwrap().is_none());

        request_contact(&db, b, a).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_partitions() {
        let (db, a, b) = setup().await;
        let c = register(&db, "c@example.com", "carol", "h").await.unwrap().id;
        let d = register(&db, "d@example.com", "dave", "h").await.unwrap().id;

        // a -> b accepted, c -> a accepted, a -> d pending, ... and b -> c pending
        let ab = request_contact(&db, a, b).await.unwrap();
        respond_to_request(&db, ab.id, b, "accept").await.unwrap();
        let ca = request_contact(&db, c, a).await.unwrap();
        respond_to_request(&db, ca.id, a, "accept").await.unwrap();
        request_contact(&db, a, d).await.unwrap();
        request_contact(&db, b, c).await.unwrap();

        let list = list_contacts(&db, a).await.unwrap();
        let names: Vec<&str> = list.contacts.iter().map(|c| c.user.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "carol"]);
        assert!(list.contacts[0].initiated_by_me);
        assert!(!list.contacts[1].initiated_by_me);
        assert!(list.pending_received.is_empty());
        assert_eq!(list.pending_sent.len(), 1);
        assert_eq!(list.pending_sent[0].user.username, "dave");

        let list = list_contacts(&db, c).await.unwrap();
        assert_eq!(list.contacts.len(), 1);
        assert_eq!(list.contacts[0].user.username, "alice");
        assert_eq!(list.pending_received[0].user.username, "bob");
    }
}
