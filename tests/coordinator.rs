// ==============================================
// COORDINATOR AND CONFIGURATION TESTS (integration)
// ==============================================
//
// End-to-end write paths: configuration -> admission -> policy -> coordinator.

use evictkit::prelude::*;

fn sized(size: u64) -> Attributes {
    Attributes::new().with_size(size)
}

mod thresholds {
    use super::*;

    #[test]
    fn lru_evicts_four_oldest_down_to_max_size() {
        let mut coordinator = EvictionConfig::builder()
            .max_size(5)
            .build()
            .unwrap()
            .build_coordinator::<u32>()
            .unwrap();
        for i in 0..9 {
            coordinator.policy_mut().add(i, Attributes::default()).unwrap();
        }

        assert!(coordinator.is_size_breached(coordinator.policy().len()));
        let victims = coordinator.evict_to(5, u64::MAX);
        assert_eq!(victims, vec![0, 1, 2, 3]);
        assert_eq!(coordinator.policy().len(), 5);
        assert!(!coordinator.is_size_breached(coordinator.policy().len()));
    }

    #[test]
    fn volume_target_counts_element_sizes() {
        let mut coordinator = EvictionCoordinator::new(FifoPolicy::new());
        coordinator.set_max_volume(Some(10)).unwrap();
        for (value, size) in [('a', 6), ('b', 3), ('c', 4), ('d', 1)] {
            coordinator.policy_mut().add(value, sized(size)).unwrap();
        }
        assert_eq!(coordinator.policy().volume(), 14);

        // Dropping 'a' alone closes the gap of 4.
        assert_eq!(coordinator.enforce(), vec!['a']);
        assert_eq!(coordinator.policy().volume(), 8);
        assert!(coordinator.enforce().is_empty());
    }

    #[test]
    fn enforce_stops_at_preferable_thresholds() {
        let config = EvictionConfig::builder()
            .policy(PolicyKind::Lifo)
            .max_size(4)
            .preferable_size(2)
            .build()
            .unwrap();
        let mut coordinator = config.build_coordinator::<u32>().unwrap();
        for i in 0..4 {
            coordinator.policy_mut().add(i, Attributes::default()).unwrap();
        }
        assert!(coordinator.enforce().is_empty(), "at max is not a breach");

        coordinator.policy_mut().add(4, Attributes::default()).unwrap();
        assert_eq!(coordinator.enforce(), vec![4, 3, 2]);
        assert_eq!(coordinator.policy().len(), 2);
    }

    #[test]
    fn unreachable_target_drains_policy() {
        let mut coordinator = EvictionCoordinator::new(LfuPolicy::new());
        for i in 0..3 {
            coordinator.policy_mut().add(i, sized(10)).unwrap();
        }
        let victims = coordinator.evict_to(0, 0);
        assert_eq!(victims.len(), 3);
        assert!(coordinator.policy().is_empty());
        assert!(coordinator.evict_to(0, 0).is_empty());
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        let thresholds = Thresholds {
            max_size: Some(3),
            preferable_size: Some(4),
            ..Thresholds::default()
        };
        assert!(EvictionCoordinator::try_new(LruPolicy::<u8>::new(), thresholds).is_err());
    }

    #[test]
    fn rejected_setter_keeps_enforcement_live() {
        let mut coordinator = EvictionCoordinator::new(LruPolicy::new());
        coordinator.set_max_size(Some(5)).unwrap();
        assert!(coordinator.set_preferable_size(Some(10)).is_err());
        for i in 0..7 {
            coordinator.policy_mut().add(i, Attributes::default()).unwrap();
        }

        assert_eq!(coordinator.enforce(), vec![0, 1]);
        assert_eq!(coordinator.policy().len(), 5);
        assert!(!coordinator.is_size_breached(coordinator.policy().len()));
    }
}

mod write_path {
    use super::*;

    #[test]
    fn admission_gates_what_reaches_the_policy() {
        let config = EvictionConfig::builder()
            .policy(PolicyKind::Clock)
            .max_size(3)
            .admission(AdmissionSpec::MaxSize(100))
            .build()
            .unwrap();
        let filter = config.admission_filter().unwrap();
        let mut coordinator = config.build_coordinator::<String>().unwrap();

        let mut admitted = 0;
        for (key, size) in [("a", 10), ("huge", 1000), ("b", 20), ("c", 30), ("d", 40)] {
            let attrs = sized(size);
            let value = key.to_string();
            if filter.is_cacheable(&key, &value, &attrs) {
                coordinator.policy_mut().add(value, attrs).unwrap();
                admitted += 1;
            }
        }
        assert_eq!(admitted, 4);
        assert_eq!(coordinator.enforce(), vec!["a".to_string()]);
    }

    #[test]
    fn closure_filter_composes_with_policy() {
        let odd_keys = |key: &u32, _: &u32, _: &Attributes| key % 2 == 1;
        let mut lru = LruPolicy::new();
        for key in 0..10u32 {
            if odd_keys.is_cacheable(&key, &key, &Attributes::default()) {
                lru.add(key, Attributes::default()).unwrap();
            }
        }
        assert_eq!(lru.peek_all(), vec![&1, &3, &5, &7, &9]);
    }

    #[test]
    fn shared_coordinator_under_lock() {
        use std::sync::Arc;
        use std::thread;

        let config = EvictionConfig::builder()
            .policy(PolicyKind::Fifo)
            .max_size(8)
            .build()
            .unwrap();
        let shared = Arc::new(Locked::new(config.build_coordinator::<u32>().unwrap()));

        thread::scope(|s| {
            for t in 0..4u32 {
                let shared = Arc::clone(&shared);
                s.spawn(move || {
                    for i in 0..25 {
                        shared.with(|c| {
                            c.policy_mut().add(t * 100 + i, Attributes::default());
                            let _evicted: Vec<u32> = c.enforce();
                        });
                    }
                });
            }
        });

        assert_eq!(shared.with(|c| c.policy().len()), 8);
    }
}

#[cfg(feature = "serde")]
mod serde_config {
    use super::*;

    #[test]
    fn config_round_trips_through_json() {
        let config = EvictionConfig::builder()
            .policy(PolicyKind::Random)
            .seed(7)
            .slot_limit(64)
            .max_volume(4096)
            .preferable_volume(2048)
            .admission(AdmissionSpec::MinCost(0.5))
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"random\""));
        let decoded: EvictionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, config);
        assert!(decoded.validate().is_ok());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let decoded: EvictionConfig =
            serde_json::from_str(r#"{ "policy": "lfu", "thresholds": { "max_size": 10 } }"#)
                .unwrap();
        assert_eq!(decoded.policy(), PolicyKind::Lfu);
        assert_eq!(decoded.thresholds().max_size, Some(10));
        assert_eq!(decoded.admission(), AdmissionSpec::AcceptAll);
    }

    #[test]
    fn deserialized_config_is_revalidated() {
        let decoded: EvictionConfig = serde_json::from_str(
            r#"{ "thresholds": { "max_size": 1, "preferable_size": 2 } }"#,
        )
        .unwrap();
        assert!(decoded.validate().is_err());
    }
}
