//! End-to-end custody flows against an in-memory store

mod common;

use trustvault_daemon::custody::{self, CustodyError, RespondOutcome};
use trustvault_daemon::database::models::KeyRecord;
use trustvault_daemon::database::types::{ContactStatus, KeyKind};

#[tokio::test]
async fn test_at_most_one_relationship_per_pair() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;
    let bob = common::user(&db, "bob").await;

    custody::request_contact(&db, alice, bob).await.unwrap();

    let again = custody::request_contact(&db, alice, bob).await;
    assert!(matches!(
        again,
        Err(CustodyError::DuplicateRelation(ContactStatus::Pending))
    ));
    let reverse = custody::request_contact(&db, bob, alice).await;
    assert!(matches!(
        reverse,
        Err(CustodyError::DuplicateRelation(ContactStatus::Pending))
    ));

    let list = custody::list_contacts(&db, bob).await.unwrap();
    let pending = list.pending_received.into_iter().next().unwrap();
    custody::respond_to_request(&db, pending.relation_id, bob, "accept")
        .await
        .unwrap();

    let reverse = custody::request_contact(&db, bob, alice).await;
    assert!(matches!(
        reverse,
        Err(CustodyError::DuplicateRelation(ContactStatus::Accepted))
    ));
}

#[tokio::test]
async fn test_concurrent_requests_leave_one_row() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;
    let bob = common::user(&db, "bob").await;

    let (first, second) = tokio::join!(
        custody::request_contact(&db, alice, bob),
        custody::request_contact(&db, bob, alice),
    );
    assert_eq!([first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(), 1);

    let alice_view = custody::list_contacts(&db, alice).await.unwrap();
    let bob_view = custody::list_contacts(&db, bob).await.unwrap();
    assert_eq!(
        alice_view.pending_sent.len() + alice_view.pending_received.len(),
        1
    );
    assert_eq!(
        bob_view.pending_sent.len() + bob_view.pending_received.len(),
        1
    );
}

#[tokio::test]
async fn test_self_reference_always_fails() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;

    let result = custody::request_contact(&db, alice, alice).await;
    assert!(matches!(result, Err(CustodyError::SelfReference)));
}

#[tokio::test]
async fn test_accept_is_visible_from_both_sides() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;
    let bob = common::user(&db, "bob").await;
    common::connect(&db, alice, bob).await;

    let alice_view = custody::list_contacts(&db, alice).await.unwrap();
    let bob_view = custody::list_contacts(&db, bob).await.unwrap();

    assert_eq!(alice_view.contacts.len(), 1);
    assert_eq!(alice_view.contacts[0].user.id, bob);
    assert!(alice_view.contacts[0].initiated_by_me);
    assert_eq!(bob_view.contacts.len(), 1);
    assert_eq!(bob_view.contacts[0].user.id, alice);
    assert!(!bob_view.contacts[0].initiated_by_me);
    assert!(alice_view.pending_sent.is_empty());
    assert!(bob_view.pending_received.is_empty());
}

#[tokio::test]
async fn test_reject_removes_row_and_allows_new_request() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;
    let bob = common::user(&db, "bob").await;

    let request = custody::request_contact(&db, alice, bob).await.unwrap();
    let outcome = custody::respond_to_request(&db, request.id, bob, "reject")
        .await
        .unwrap();
    assert!(matches!(outcome, RespondOutcome::Rejected));

    let alice_view = custody::list_contacts(&db, alice).await.unwrap();
    assert!(alice_view.contacts.is_empty());
    assert!(alice_view.pending_sent.is_empty());

    // either side may ask again
    custody::request_contact(&db, bob, alice).await.unwrap();
}

#[tokio::test]
async fn test_only_the_target_can_respond() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;
    let bob = common::user(&db, "bob").await;

    let request = custody::request_contact(&db, alice, bob).await.unwrap();

    let by_initiator = custody::respond_to_request(&db, request.id, alice, "accept").await;
    assert!(matches!(by_initiator, Err(CustodyError::NotFound(_))));

    let bad_action = custody::respond_to_request(&db, request.id, bob, "maybe").await;
    assert!(matches!(bad_action, Err(CustodyError::InvalidAction(_))));
}

#[tokio::test]
async fn test_share_never_copies_private_material() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;
    let bob = common::user(&db, "bob").await;
    common::connect(&db, alice, bob).await;

    let personal = custody::generate_key_pair(&db, &common::CRYPTO, alice, "main")
        .await
        .unwrap();
    let source = custody::get_key(&db, alice, personal.key_id).await.unwrap();
    assert!(source.private_key.is_some());

    let shared = custody::share_key(&db, alice, bob, personal.key_id)
        .await
        .unwrap();
    assert_eq!(shared.kind, KeyKind::Contact);
    assert_eq!(shared.private_key, None);
    assert_eq!(shared.public_key, source.public_key);
    assert_eq!(shared.origin_key_id, Some(personal.key_id));
    assert_eq!(shared.shared_with_user_id, Some(bob));

    let stored = KeyRecord::get(shared.id, &db).await.unwrap().unwrap();
    assert_eq!(stored.private_key, None);
}

#[tokio::test]
async fn test_share_requires_accepted_not_pending() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;
    let bob = common::user(&db, "bob").await;
    custody::request_contact(&db, alice, bob).await.unwrap();

    let key = custody::generate_key_pair(&db, &common::CRYPTO, alice, "main")
        .await
        .unwrap();
    let result = custody::share_key(&db, alice, bob, key.key_id).await;
    assert!(matches!(result, Err(CustodyError::NotFound("contact"))));
}

#[tokio::test]
async fn test_concurrent_shares_leave_one_copy() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;
    let bob = common::user(&db, "bob").await;
    common::connect(&db, alice, bob).await;
    let key = custody::generate_key_pair(&db, &common::CRYPTO, alice, "main")
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        custody::share_key(&db, alice, bob, key.key_id),
        custody::share_key(&db, alice, bob, key.key_id),
    );
    assert_eq!(first.unwrap().id, second.unwrap().id);

    let bob_keys = custody::list_keys(&db, bob).await.unwrap();
    assert_eq!(bob_keys.len(), 1);
}

#[tokio::test]
async fn test_encrypt_decrypt_round_trip() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;
    let key = custody::generate_key_pair(&db, &common::CRYPTO, alice, "main")
        .await
        .unwrap();

    let plaintext = "the quick brown fox\nwith a second line";
    let encrypted = custody::encrypt(&db, &common::CRYPTO, plaintext, key.key_id, alice)
        .await
        .unwrap();
    assert_ne!(encrypted.ciphertext, plaintext);

    let decrypted = custody::decrypt(&db, &common::CRYPTO, &encrypted.ciphertext, key.key_id, alice)
        .await
        .unwrap();
    assert_eq!(decrypted, plaintext);
}

#[tokio::test]
async fn test_decrypt_with_someone_elses_key_is_not_found() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;
    let mallory = common::user(&db, "mallory").await;
    let key = custody::generate_key_pair(&db, &common::CRYPTO, alice, "main")
        .await
        .unwrap();

    // anyone may encrypt for any key id
    let encrypted = custody::encrypt(&db, &common::CRYPTO, "secret", key.key_id, mallory)
        .await
        .unwrap();

    let result = custody::decrypt(
        &db,
        &common::CRYPTO,
        &encrypted.ciphertext,
        key.key_id,
        mallory,
    )
    .await;
    assert!(matches!(result, Err(CustodyError::NotFound("key"))));
}

#[tokio::test]
async fn test_message_gate_ignores_shared_keys() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;
    let bob = common::user(&db, "bob").await;
    let key = custody::generate_key_pair(&db, &common::CRYPTO, alice, "main")
        .await
        .unwrap();

    // plant a shared copy in bob's vault without any relationship
    let source = custody::get_key(&db, alice, key.key_id).await.unwrap();
    let bob_vault = trustvault_daemon::database::models::Vault::for_user(bob, &db)
        .await
        .unwrap()
        .unwrap();
    KeyRecord::create_shared(
        bob_vault.id,
        "planted",
        &source.public_key,
        source.id,
        bob,
        &db,
    )
    .await
    .unwrap();

    let sent = custody::send_message(&db, &common::CRYPTO, alice, bob, "hi", key.key_id).await;
    assert!(matches!(sent, Err(CustodyError::Forbidden)));

    let history = custody::history(&db, bob, alice).await;
    assert!(matches!(history, Err(CustodyError::Forbidden)));
}

#[tokio::test]
async fn test_deleting_a_key_keeps_history() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;
    let bob = common::user(&db, "bob").await;
    common::connect(&db, alice, bob).await;
    let key = custody::generate_key_pair(&db, &common::CRYPTO, alice, "main")
        .await
        .unwrap();

    let message = custody::send_encrypted(&db, &common::CRYPTO, alice, bob, "hi", key.key_id)
        .await
        .unwrap();
    custody::delete_key(&db, alice, key.key_id).await.unwrap();

    let history = custody::history(&db, bob, alice).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, message.id);
    assert_eq!(history[0].key_id, Some(key.key_id));
    assert_eq!(history[0].key_name.as_deref(), Some("main"));
}

/// A asks B, B accepts, A shares K1 with B and sends B a message sealed with K1.
///  Only A can open it. B answers with a key of its own, which only B can open.
#[tokio::test]
async fn test_share_and_exchange_scenario() {
    let db = common::setup_db().await;
    let alice = common::user(&db, "alice").await;
    let bob = common::user(&db, "bob").await;

    let request = custody::request_contact(&db, alice, bob).await.unwrap();
    assert_eq!(request.status, ContactStatus::Pending);
    custody::respond_to_request(&db, request.id, bob, "accept")
        .await
        .unwrap();

    let k1 = custody::generate_key_pair(&db, &common::CRYPTO, alice, "k1")
        .await
        .unwrap();
    let shared = custody::share_key(&db, alice, bob, k1.key_id).await.unwrap();
    assert_eq!(shared.kind, KeyKind::Contact);
    assert_eq!(shared.origin_key_id, Some(k1.key_id));
    assert_eq!(shared.private_key, None);
    assert_eq!(shared.name, "k1 (shared by alice)");

    let bob_view = custody::list_contacts(&db, bob).await.unwrap();
    assert_eq!(bob_view.contacts[0].shared_keys.len(), 1);
    assert_eq!(bob_view.contacts[0].shared_keys[0].id, shared.id);

    let sent = custody::send_encrypted(&db, &common::CRYPTO, alice, bob, "hi", k1.key_id)
        .await
        .unwrap();
    assert_ne!(sent.content, "hi");

    // bob holds only the public half of k1
    let by_bob = custody::decrypt(&db, &common::CRYPTO, &sent.content, shared.id, bob).await;
    assert!(matches!(by_bob, Err(CustodyError::NotFound("key"))));
    let by_alice = custody::decrypt(&db, &common::CRYPTO, &sent.content, k1.key_id, alice)
        .await
        .unwrap();
    assert_eq!(by_alice, "hi");

    let k2 = custody::generate_key_pair(&db, &common::CRYPTO, bob, "k2")
        .await
        .unwrap();
    let reply = custody::send_encrypted(&db, &common::CRYPTO, alice, bob, "for bob", k2.key_id)
        .await
        .unwrap();
    let opened = custody::decrypt(&db, &common::CRYPTO, &reply.content, k2.key_id, bob)
        .await
        .unwrap();
    assert_eq!(opened, "for bob");

    let history = custody::history(&db, alice, bob).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, sent.id);
    assert_eq!(history[1].id, reply.id);
}
