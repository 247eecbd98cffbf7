//! Tests for the JSON file store

use chrono::{Duration, Utc};
use std::sync::Arc;
use tempfile::TempDir;

use core_kernel::{Actor, PortError, UserId, UserRole};
use domain_claims::{ClaimAnswer, ClaimMode, ClaimPort, ClaimPortReferences, ClaimQuery, ClaimService, SubmitClaim};
use domain_items::{ItemPort, ItemQuery, ItemService, ItemStatus, NewQuestion, ReportFoundItem};
use infra_db::{JsonFileStore, StoreSnapshot};

fn actor(name: &str) -> Actor {
    Actor::new(UserId::new_v7(), name, UserRole::User)
}

fn report() -> ReportFoundItem {
    ReportFoundItem {
        name: "Calculator".to_string(),
        description: "TI-84 with initials".to_string(),
        category: "Electronics".to_string(),
        location: "Math building".to_string(),
        date_found: Utc::now() - Duration::hours(4),
        reporter_name: None,
        reporter_contact: "finder@campus.edu".to_string(),
        image_url: None,
        questions: vec![
            NewQuestion { question: "Initials?".into(), answer: "JS".into() },
            NewQuestion { question: "Case color?".into(), answer: "Black".into() },
        ],
    }
}

fn services(store: &JsonFileStore, mode: ClaimMode) -> (ItemService, ClaimService) {
    let items: Arc<dyn ItemPort> = Arc::new(store.clone());
    let claims: Arc<dyn ClaimPort> = Arc::new(store.clone());
    let refs = Arc::new(ClaimPortReferences::new(claims.clone()));
    (
        ItemService::new(items.clone(), refs),
        ClaimService::new(items, claims, mode),
    )
}

#[tokio::test]
async fn test_missing_file_opens_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::open(dir.path().join("data.json")).await.unwrap();

    assert!(store.find_items(&ItemQuery::new()).await.unwrap().is_empty());
    assert!(store.find_claims(&ClaimQuery::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");
    let finder = actor("Finder");
    let owner = actor("Owner");

    let item_id = {
        let store = JsonFileStore::open(&path).await.unwrap();
        let (items, claims) = services(&store, ClaimMode::AutoVerify);
        let item = items.report_found(&finder, report()).await.unwrap().item;

        let answers = item
            .questions
            .iter()
            .zip(["js", "black"])
            .map(|(q, a)| ClaimAnswer::new(q.id, a))
            .collect();
        claims
            .submit_claim(&owner, item.id, SubmitClaim { answers })
            .await
            .unwrap();
        item.id
    };

    let reopened = JsonFileStore::open(&path).await.unwrap();
    let item = reopened.get_item(item_id).await.unwrap();
    assert_eq!(item.status, ItemStatus::Claimed);
    assert_eq!(item.claimed_by, Some(owner.user_id));
    assert_eq!(item.questions.len(), 2);

    let stored_claims = reopened.find_claims(&ClaimQuery::for_item(item_id)).await.unwrap();
    assert_eq!(stored_claims.len(), 1);
}

#[tokio::test]
async fn test_questions_locked_through_claim_store() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::open(dir.path().join("data.json")).await.unwrap();
    let (items, claims) = services(&store, ClaimMode::Review);
    let finder = actor("Finder");

    let item = items.report_found(&finder, report()).await.unwrap().item;
    let answers = item.questions.iter().map(|q| ClaimAnswer::new(q.id, "guess")).collect();
    claims
        .submit_claim(&actor("Guesser"), item.id, SubmitClaim { answers })
        .await
        .unwrap();

    let update = domain_items::UpdateItemRequest {
        questions: Some(vec![
            NewQuestion { question: "New?".into(), answer: "Yes".into() },
            NewQuestion { question: "Other?".into(), answer: "No".into() },
        ]),
        ..Default::default()
    };
    let result = items.update_item(&finder, item.id, update).await;
    assert!(matches!(result, Err(domain_items::ItemError::QuestionsLocked)));
}

#[tokio::test]
async fn test_failed_write_leaves_state_unchanged() {
    let dir = TempDir::new().unwrap();
    // The data path is a directory, so the final rename fails
    let path = dir.path().join("blocked");
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("keep"), b"x").unwrap();

    let store = JsonFileStore::open(&path).await;
    // Reading a directory fails, which is reported rather than ignored
    assert!(store.is_err());

    let path = dir.path().join("data.json");
    let store = JsonFileStore::open(&path).await.unwrap();
    let (items, _) = services(&store, ClaimMode::Review);
    let item = items.report_found(&actor("Finder"), report()).await.unwrap().item;

    // Replace the data file with a non-empty directory so persisting fails
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("keep"), b"x").unwrap();

    let result = store.delete_item(item.id).await;
    assert!(matches!(result, Err(PortError::Connection { .. })));
    assert!(store.get_item(item.id).await.is_ok());
}

#[tokio::test]
async fn test_seed_only_applies_to_empty_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seeded.json");

    let store = JsonFileStore::open(&path).await.unwrap();
    let (items, _) = services(&store, ClaimMode::Review);
    let seeded = items.report_found(&actor("Finder"), report()).await.unwrap().item;
    let seed = store.snapshot().await;

    let fresh_path = dir.path().join("fresh.json");
    let fresh = JsonFileStore::open_with_seed(&fresh_path, seed.clone()).await.unwrap();
    assert_eq!(fresh.get_item(seeded.id).await.unwrap().name, "Calculator");

    let reseeded = JsonFileStore::open_with_seed(&fresh_path, StoreSnapshot::default()).await.unwrap();
    assert_eq!(reseeded.snapshot().await.items.len(), 1);
}
