//! End-to-end workflows across the item and claims domains
//!
//! Each scenario runs against the in-memory ports and against the JSON
//! file store, which must also survive a reopen.

use std::sync::Arc;

use core_kernel::ItemId;
use domain_claims::{
    verify_answers, ClaimError, ClaimMode, ClaimPort, ClaimPortReferences, ClaimService,
    ClaimStatus, ReviewDecision, SubmitClaim,
};
use domain_claims::ports::memory::InMemoryClaimPort;
use domain_items::ports::memory::InMemoryItemPort;
use domain_items::{ItemPort, ItemQuery, ItemService, ItemStatus, UpdateItemRequest};
use infra_db::JsonFileStore;
use test_utils::{
    assert_claim_status, assert_claimed_by, assert_item_ids, assert_item_status,
    assert_unauthorized, DateFixtures, QuestionFixtures, ReportFixtures, TestClaimBuilder,
    TestItemBuilder, UserFixtures,
};

struct Desk {
    items: ItemService,
    claims: ClaimService,
}

impl Desk {
    fn over(items: Arc<dyn ItemPort>, claims: Arc<dyn ClaimPort>, mode: ClaimMode) -> Self {
        Self {
            items: ItemService::new(items.clone(), Arc::new(ClaimPortReferences::new(claims.clone()))),
            claims: ClaimService::new(items, claims, mode),
        }
    }

    fn in_memory(mode: ClaimMode) -> Self {
        Self::over(
            Arc::new(InMemoryItemPort::new()),
            Arc::new(InMemoryClaimPort::new()),
            mode,
        )
    }

    fn on_file(store: JsonFileStore, mode: ClaimMode) -> Self {
        let store = Arc::new(store);
        Self::over(store.clone(), store, mode)
    }
}

fn correct_answers(item: &domain_items::Item) -> SubmitClaim {
    let answers = item
        .questions
        .iter()
        .zip(QuestionFixtures::bottle_answers())
        .map(|(q, a)| domain_claims::ClaimAnswer::new(q.id, a.to_lowercase()))
        .collect();
    SubmitClaim { answers }
}

#[tokio::test]
async fn test_found_item_is_claimed_and_returned() {
    let desk = Desk::in_memory(ClaimMode::Review);
    let finder = UserFixtures::finder();
    let owner = UserFixtures::owner();
    let rival = UserFixtures::rival();

    let lost = desk.items.report_lost(&owner, ReportFixtures::lost_bottle()).await.unwrap();
    assert!(lost.potential_matches.is_empty());

    let found = desk
        .items
        .report_found(&finder, ReportFixtures::found_bottle())
        .await
        .unwrap();
    assert_eq!(found.potential_matches.len(), 1);
    assert_eq!(found.potential_matches[0].id, lost.item.id);
    let item = found.item;

    let mine = desk.claims.submit_claim(&owner, item.id, correct_answers(&item)).await.unwrap();
    let theirs = desk
        .claims
        .submit_claim(&rival, item.id, correct_answers(&item))
        .await
        .unwrap();
    assert_claim_status(&mine.claim, ClaimStatus::Pending);

    let queue = desk.claims.review_queue(&finder).await.unwrap();
    assert_eq!(queue.len(), 2);

    let approved = desk
        .claims
        .review_claim(&finder, item.id, mine.claim.id, ReviewDecision::Approve, None)
        .await
        .unwrap();
    assert_claimed_by(&approved.item, owner.user_id);

    let rival_claims = desk.claims.my_claims(&rival).await.unwrap();
    assert_eq!(rival_claims[0].id, theirs.claim.id);
    assert_claim_status(&rival_claims[0], ClaimStatus::Rejected);

    let returned = desk.items.return_item(&owner, item.id).await.unwrap();
    assert_item_status(&returned, ItemStatus::Returned);
    assert!(returned.returned_date.is_some());

    let stats = desk.items.stats().await.unwrap();
    assert_eq!(stats.status_counts.returned, 1);
    assert_eq!(stats.status_counts.lost, 1);
}

#[tokio::test]
async fn test_auto_verify_refuses_wrong_answers() {
    let desk = Desk::in_memory(ClaimMode::AutoVerify);
    let item = desk
        .items
        .report_found(&UserFixtures::finder(), ReportFixtures::found_bottle())
        .await
        .unwrap()
        .item;

    let mut wrong = correct_answers(&item);
    wrong.answers[1].answer = "Dog".to_string();
    let result = desk.claims.submit_claim(&UserFixtures::rival(), item.id, wrong).await;
    assert!(matches!(result, Err(ClaimError::IncorrectAnswers)));
    assert!(desk.claims.claims_for_item(&UserFixtures::finder(), item.id).await.unwrap().is_empty());

    let outcome = desk
        .claims
        .submit_claim(&UserFixtures::owner(), item.id, correct_answers(&item))
        .await
        .unwrap();
    assert_claim_status(&outcome.claim, ClaimStatus::Approved);
    assert_claimed_by(&outcome.item, UserFixtures::owner().user_id);
}

#[tokio::test]
async fn test_file_store_keeps_claims_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lost_found.json");
    let owner = UserFixtures::owner();

    let item_id = {
        let desk = Desk::on_file(JsonFileStore::open(&path).await.unwrap(), ClaimMode::Review);
        let item = desk
            .items
            .report_found(&UserFixtures::finder(), ReportFixtures::found_bottle())
            .await
            .unwrap()
            .item;
        desk.claims.submit_claim(&owner, item.id, correct_answers(&item)).await.unwrap();
        item.id
    };

    let desk = Desk::on_file(JsonFileStore::open(&path).await.unwrap(), ClaimMode::Review);
    let claims = desk.claims.my_claims(&owner).await.unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].item_id, item_id);

    let again = desk
        .claims
        .submit_claim(&owner, item_id, SubmitClaim { answers: claims[0].answers.clone() })
        .await;
    assert!(matches!(again, Err(ClaimError::DuplicateClaim)));

    let admin = UserFixtures::admin();
    let outcome = desk
        .claims
        .review_claim(&admin, item_id, claims[0].id, ReviewDecision::Approve, Some("Pick up at the desk".into()))
        .await
        .unwrap();
    assert_claimed_by(&outcome.item, owner.user_id);
    assert_eq!(outcome.claim.reporter_response.as_deref(), Some("Pick up at the desk"));
}

#[tokio::test]
async fn test_seeded_items_guard_against_strangers() {
    let items = Arc::new(InMemoryItemPort::new());
    let desk = Desk::over(items.clone(), Arc::new(InMemoryClaimPort::new()), ClaimMode::Review);

    let laptop_id = ItemId::new_v7();
    let laptop = TestItemBuilder::found()
        .with_id(laptop_id)
        .with_name("Laptop")
        .with_description("Silver laptop, sticker on lid")
        .with_category("Electronics")
        .with_location("Engineering Hall")
        .with_questions(&[("What brand is it?", "Dell"), ("What is the sticker?", "Rocket")])
        .created_at(DateFixtures::semester_start())
        .build();
    items.insert_item(&laptop).await.unwrap();

    let umbrella = desk
        .items
        .report_lost(&UserFixtures::owner(), ReportFixtures::lost_umbrella())
        .await
        .unwrap();
    assert!(umbrella.potential_matches.is_empty());

    let listed = desk.items.list_items(&ItemQuery::new()).await.unwrap();
    assert_item_ids(&listed, &[umbrella.item.id, laptop_id]);

    let rival = UserFixtures::rival();
    let rename = UpdateItemRequest {
        name: Some("Mine now".to_string()),
        ..Default::default()
    };
    assert_unauthorized(&desk.items.update_item(&rival, umbrella.item.id, rename).await);
    assert_unauthorized(&desk.items.mark_matched(&rival, umbrella.item.id).await);
    assert_eq!(desk.items.get_item(umbrella.item.id).await.unwrap().name, "Umbrella");

    let guess = TestClaimBuilder::for_item(&laptop)
        .with_claimant(&rival)
        .with_answers(&laptop, &["HP", "rocket"])
        .build();
    assert!(!verify_answers(&laptop.questions, &guess.answers));

    let honest = TestClaimBuilder::for_item(&laptop)
        .with_answers(&laptop, &[" dell ", "ROCKET"])
        .build();
    assert!(verify_answers(&laptop.questions, &honest.answers));
}
