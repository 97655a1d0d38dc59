// Service-level tests for the user management core, run against the
// in-memory store.
use std::sync::Arc;

use account_core::{
    AccountError, AccountService, EventRole, MemoryUserStore, NewUser, SearchAttribute,
    UserQuery, UserUpdate,
};
use account_crypto::{PasswordHasher, TokenConfig, TokenSigner};
use uuid::Uuid;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Low bcrypt cost keeps the suite fast without changing behaviour.
const TEST_COST: u32 = 4;

fn test_service() -> AccountService {
    let tokens = TokenSigner::new(&TokenConfig {
        secret: "service-test-secret".to_string(),
        ttl_seconds: 3600,
    });
    AccountService::new(
        Arc::new(MemoryUserStore::new()),
        PasswordHasher::new(TEST_COST),
        tokens,
    )
}

fn alice() -> NewUser {
    NewUser {
        title: None,
        gender: Some("female".to_string()),
        firstname: "Alice".to_string(),
        lastname: "Archer".to_string(),
        username: "alice".to_string(),
        email: "a@x.com".to_string(),
        password: "pw1".to_string(),
        organisation: Some("LMU".to_string()),
        address: None,
        city: Some("Munich".to_string()),
        country: Some("Germany".to_string()),
        zip_code: Some(80333),
        field_of_activity: "HCI".to_string(),
        research_interest: vec!["VR".to_string(), "AR".to_string()],
        security_question: "What primary school did you attend?".to_string(),
        security_answer: "Park Lane ".to_string(),
        eventbased_role: vec![EventRole {
            event: 1,
            role: "presenter".to_string(),
        }],
    }
}

fn bob() -> NewUser {
    NewUser {
        firstname: "Bob".to_string(),
        lastname: "Baker".to_string(),
        username: "bob".to_string(),
        email: "b@x.com".to_string(),
        password: "pw2".to_string(),
        field_of_activity: "networking".to_string(),
        research_interest: vec!["AV".to_string()],
        security_question: "In what town or city was your first full time job?".to_string(),
        security_answer: "augsburg".to_string(),
        title: None,
        gender: None,
        organisation: None,
        address: None,
        city: None,
        country: None,
        zip_code: None,
        eventbased_role: vec![],
    }
}

// =============================================================================
// REGISTRATION
// =============================================================================

#[tokio::test]
async fn register_and_issue_token_roundtrip() {
    let service = test_service();

    let user = service.create_user(alice()).await.unwrap();
    assert_eq!(user.username, "alice");

    // The issued token decodes back to the new identifier.
    let token = service.issue_token(user.id).unwrap();
    assert_eq!(service.verify_token(&token).unwrap(), user.id);
}

#[tokio::test]
async fn register_duplicate_username_fails() {
    let service = test_service();
    service.create_user(alice()).await.unwrap();

    let mut duplicate = alice();
    duplicate.email = "other@x.com".to_string();
    let err = service.create_user(duplicate).await.unwrap_err();
    assert!(matches!(err, AccountError::UsernameTaken));
}

#[tokio::test]
async fn register_duplicate_email_fails() {
    let service = test_service();
    service.create_user(alice()).await.unwrap();

    let mut duplicate = alice();
    duplicate.username = "alice2".to_string();
    let err = service.create_user(duplicate).await.unwrap_err();
    assert!(matches!(err, AccountError::EmailTaken));
}

#[tokio::test]
async fn username_taken_wins_when_both_are_taken() {
    let service = test_service();
    service.create_user(alice()).await.unwrap();

    let err = service.create_user(alice()).await.unwrap_err();
    assert!(matches!(err, AccountError::UsernameTaken));
}

#[tokio::test]
async fn register_rejects_missing_required_fields() {
    let service = test_service();

    let mut incomplete = alice();
    incomplete.firstname = "  ".to_string();
    let err = service.create_user(incomplete).await.unwrap_err();
    assert!(matches!(err, AccountError::Validation(_)));

    let mut incomplete = alice();
    incomplete.password = String::new();
    let err = service.create_user(incomplete).await.unwrap_err();
    assert!(matches!(err, AccountError::Validation(_)));
}

#[tokio::test]
async fn register_trims_username_and_email() {
    let service = test_service();

    let mut padded = alice();
    padded.username = "  alice  ".to_string();
    padded.email = " a@x.com ".to_string();
    let user = service.create_user(padded).await.unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "a@x.com");
}

#[tokio::test]
async fn stored_password_is_never_the_plaintext() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();

    let full = service
        .get_user_full(&UserQuery::by_id(created.id))
        .await
        .unwrap();
    assert_ne!(full.password, "pw1");
    // The stored answer is normalized for comparison.
    assert_eq!(full.security_answer, "park lane");
}

#[tokio::test]
async fn roundtrip_preserves_public_fields() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();

    let fetched = service
        .get_user(&UserQuery::by_username("alice"))
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

// =============================================================================
// AUTHENTICATION
// =============================================================================

#[tokio::test]
async fn authenticate_with_correct_password() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();

    let user = service.authenticate_user("alice", "pw1").await.unwrap();
    assert_eq!(user.id, created.id);
}

#[tokio::test]
async fn authenticate_with_wrong_password_fails() {
    let service = test_service();
    service.create_user(alice()).await.unwrap();

    let err = service
        .authenticate_user("alice", "wrongpw")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::BadCredentials));
}

#[tokio::test]
async fn authenticate_unknown_user_fails() {
    let service = test_service();

    let err = service
        .authenticate_user("nobody", "pw1")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::UserNotFound));
}

#[tokio::test]
async fn authenticate_by_token() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();
    let token = service.issue_token(created.id).unwrap();

    let user = service.authenticate_user_by_token(&token).await.unwrap();
    assert_eq!(user.id, created.id);

    let err = service
        .authenticate_user_by_token("not.a.token")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::TokenVerification(_)));
}

#[tokio::test]
async fn token_for_deleted_user_resolves_to_not_found() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();
    let token = service.issue_token(created.id).unwrap();

    service.delete_user("alice").await.unwrap();

    let err = service.authenticate_user_by_token(&token).await.unwrap_err();
    assert!(matches!(err, AccountError::UserNotFound));
}

// =============================================================================
// PASSWORD UPDATE
// =============================================================================

#[tokio::test]
async fn update_password_rejects_empty_password() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();

    let err = service.update_password(created.id, "").await.unwrap_err();
    assert!(matches!(err, AccountError::EmptyPassword));
}

#[tokio::test]
async fn update_password_rotates_credentials() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();

    service.update_password(created.id, "newpw").await.unwrap();

    assert!(service.authenticate_user("alice", "newpw").await.is_ok());
    let err = service.authenticate_user("alice", "pw1").await.unwrap_err();
    assert!(matches!(err, AccountError::BadCredentials));
}

#[tokio::test]
async fn update_password_for_unknown_user_fails() {
    let service = test_service();

    let err = service
        .update_password(Uuid::new_v4(), "newpw")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::UserNotFound));
}

// =============================================================================
// QUERY AND LISTING
// =============================================================================

#[tokio::test]
async fn query_matches_substring_on_requested_attribute() {
    let service = test_service();
    service.create_user(alice()).await.unwrap();
    service.create_user(bob()).await.unwrap();

    let hits = service
        .query_users("ali", Some(vec![SearchAttribute::Username]))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].username, "alice");
}

#[tokio::test]
async fn query_default_attributes_cover_names_and_email() {
    let service = test_service();
    service.create_user(alice()).await.unwrap();
    service.create_user(bob()).await.unwrap();

    // Matches Bob by lastname.
    let hits = service.query_users("baker", None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].username, "bob");
}

#[tokio::test]
async fn query_tokens_are_alternatives() {
    let service = test_service();
    service.create_user(alice()).await.unwrap();
    service.create_user(bob()).await.unwrap();

    let mut hits = service.query_users("alice bob", None).await.unwrap();
    hits.sort_by(|a, b| a.username.cmp(&b.username));
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn query_searches_research_interest_tags() {
    let service = test_service();
    service.create_user(alice()).await.unwrap();
    service.create_user(bob()).await.unwrap();

    let hits = service
        .query_users("vr", Some(vec![SearchAttribute::ResearchInterest]))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].username, "alice");
}

#[tokio::test]
async fn blank_query_degenerates_to_match_everything() {
    // Documented edge case of the core operation; the HTTP boundary
    // short-circuits blank terms before they get here.
    let service = test_service();
    service.create_user(alice()).await.unwrap();
    service.create_user(bob()).await.unwrap();

    let hits = service.query_users("  ", None).await.unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn get_users_returns_reduced_records() {
    let service = test_service();
    service.create_user(alice()).await.unwrap();
    service.create_user(bob()).await.unwrap();

    let users = service.get_users().await.unwrap();
    assert_eq!(users.len(), 2);
    let value = serde_json::to_value(&users).unwrap();
    assert!(value[0].get("password").is_none());
}

#[tokio::test]
async fn get_users_full_keeps_stored_hashes() {
    let service = test_service();
    service.create_user(alice()).await.unwrap();

    let users = service.get_users_full().await.unwrap();
    assert_eq!(users.len(), 1);
    assert!(users[0].password.starts_with("$2"));
}

// =============================================================================
// EVENT-BASED ROLES
// =============================================================================

#[tokio::test]
async fn check_role_returns_matching_entry() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();

    let role = service.check_role(created.id, 1).await.unwrap();
    assert_eq!(role, "presenter");
}

#[tokio::test]
async fn check_role_without_matching_event_fails() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();

    let err = service.check_role(created.id, 999).await.unwrap_err();
    assert!(matches!(err, AccountError::EventNotFound));
}

#[tokio::test]
async fn check_role_with_empty_role_list_fails() {
    let service = test_service();
    let created = service.create_user(bob()).await.unwrap();

    let err = service.check_role(created.id, 1).await.unwrap_err();
    assert!(matches!(err, AccountError::EventNotFound));
}

#[tokio::test]
async fn check_role_for_unknown_user_fails() {
    let service = test_service();

    let err = service.check_role(Uuid::new_v4(), 1).await.unwrap_err();
    assert!(matches!(err, AccountError::UserNotFound));
}

#[tokio::test]
async fn check_role_duplicate_events_resolve_in_stored_order() {
    let service = test_service();
    let mut user = alice();
    user.eventbased_role = vec![
        EventRole {
            event: 7,
            role: "visitor".to_string(),
        },
        EventRole {
            event: 7,
            role: "presenter".to_string(),
        },
    ];
    let created = service.create_user(user).await.unwrap();

    let role = service.check_role(created.id, 7).await.unwrap();
    assert_eq!(role, "visitor");
}

// =============================================================================
// PROFILE UPDATE
// =============================================================================

#[tokio::test]
async fn update_user_applies_partial_fields() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();

    let updated = service
        .update_user(
            created.id,
            UserUpdate {
                city: Some("Berlin".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.city.as_deref(), Some("Berlin"));
    assert_eq!(updated.username, "alice");
    assert_eq!(updated.email, "a@x.com");
}

#[tokio::test]
async fn update_user_rejects_taken_username_and_email() {
    let service = test_service();
    service.create_user(alice()).await.unwrap();
    let bob = service.create_user(bob()).await.unwrap();

    let err = service
        .update_user(
            bob.id,
            UserUpdate {
                username: Some("alice".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::UsernameTaken));

    let err = service
        .update_user(
            bob.id,
            UserUpdate {
                email: Some("a@x.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::EmailTaken));
}

#[tokio::test]
async fn update_user_allows_keeping_own_username() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();

    // Re-submitting the unchanged username is not a conflict with itself.
    let updated = service
        .update_user(
            created.id,
            UserUpdate {
                username: Some("alice".to_string()),
                organisation: Some("TUM".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.organisation.as_deref(), Some("TUM"));
}

#[tokio::test]
async fn update_user_for_unknown_id_fails() {
    let service = test_service();

    let err = service
        .update_user(Uuid::new_v4(), UserUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::UserNotFound));
}

#[tokio::test]
async fn update_normalizes_security_answer() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();

    service
        .update_user(
            created.id,
            UserUpdate {
                security_answer: Some("  New Answer ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let full = service
        .get_user_full(&UserQuery::by_id(created.id))
        .await
        .unwrap();
    assert_eq!(full.security_answer, "new answer");
}

#[tokio::test]
async fn uniqueness_invariant_survives_create_and_update_sequences() {
    let service = test_service();
    let a = service.create_user(alice()).await.unwrap();
    let b = service.create_user(bob()).await.unwrap();

    // A rename that would collide is rejected, a disjoint rename goes
    // through; afterwards no two records share a username or email.
    assert!(service
        .update_user(
            b.id,
            UserUpdate {
                username: Some("alice".to_string()),
                ..Default::default()
            },
        )
        .await
        .is_err());
    service
        .update_user(
            a.id,
            UserUpdate {
                username: Some("alice2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let users = service.get_users().await.unwrap();
    let mut usernames: Vec<_> = users.iter().map(|u| u.username.clone()).collect();
    let mut emails: Vec<_> = users.iter().map(|u| u.email.clone()).collect();
    usernames.sort();
    usernames.dedup();
    emails.sort();
    emails.dedup();
    assert_eq!(usernames.len(), users.len());
    assert_eq!(emails.len(), users.len());
}

// =============================================================================
// DELETION
// =============================================================================

#[tokio::test]
async fn delete_user_removes_the_record() {
    let service = test_service();
    service.create_user(alice()).await.unwrap();

    service.delete_user("alice").await.unwrap();

    let err = service
        .get_user(&UserQuery::by_username("alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::UserNotFound));
}

#[tokio::test]
async fn delete_unknown_user_fails() {
    let service = test_service();

    let err = service.delete_user("nobody").await.unwrap_err();
    assert!(matches!(err, AccountError::UserNotFound));
}

// =============================================================================
// SECURITY QUESTION RESET FLOW
// =============================================================================

#[tokio::test]
async fn security_question_lookup_by_email() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();

    let info = service.security_question("a@x.com").await.unwrap();
    assert_eq!(info.id, created.id);
    assert_eq!(
        info.security_question,
        "What primary school did you attend?"
    );

    let err = service.security_question("missing@x.com").await.unwrap_err();
    assert!(matches!(err, AccountError::UserNotFound));
}

#[tokio::test]
async fn security_answer_comparison_is_normalized() {
    let service = test_service();
    let created = service.create_user(alice()).await.unwrap();

    // Stored as "park lane"; compared case/whitespace-insensitively.
    assert!(service
        .check_security_answer(created.id, "  PARK LANE ")
        .await
        .is_ok());

    let err = service
        .check_security_answer(created.id, "wrong answer")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::BadCredentials));
}
