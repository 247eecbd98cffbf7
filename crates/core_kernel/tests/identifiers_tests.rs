//! Unit tests for the Identifiers module
//!
//! Tests cover the identifier types, their creation, parsing,
//! conversion, and display formatting.

use core_kernel::{ItemId, ClaimId, QuestionId, UserId};
use proptest::prelude::*;
use uuid::Uuid;

mod item_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = ItemId::new();
        let id2 = ItemId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = ItemId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = ItemId::new_v7();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ItemId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(ItemId::prefix(), "ITM");
    }

    #[test]
    fn test_from_str_with_prefix() {
        let original = ItemId::new();
        let parsed: ItemId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_str_without_prefix() {
        let uuid = Uuid::new_v4();
        let parsed: ItemId = uuid.to_string().parse().unwrap();
        assert_eq!(*parsed.as_uuid(), uuid);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("ITM-not-a-uuid".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_json_serialization() {
        let id = ItemId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}

mod prefix_tests {
    use super::*;

    #[test]
    fn test_prefixes_are_distinct() {
        let prefixes = [
            ItemId::prefix(),
            ClaimId::prefix(),
            QuestionId::prefix(),
            UserId::prefix(),
        ];
        for (i, a) in prefixes.iter().enumerate() {
            for b in prefixes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_display_formats() {
        assert!(ClaimId::new().to_string().starts_with("CLM-"));
        assert!(QuestionId::new().to_string().starts_with("QST-"));
        assert!(UserId::new().to_string().starts_with("USR-"));
    }
}

proptest! {
    #[test]
    fn prop_display_parse_roundtrip(bytes in any::<[u8; 16]>()) {
        let id = UserId::from_uuid(Uuid::from_bytes(bytes));
        let parsed: UserId = id.to_string().parse().unwrap();
        prop_assert_eq!(id, parsed);
    }
}
