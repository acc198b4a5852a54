use crate::device::{Partition, collect_mig_devices};
use crate::fraction::{FractionRow, FractionTable};
use crate::resources::ResourceName;
use crate::strategy::MigStrategy;
use crate::tests::utils::{
    PROFILE_1G_5GB, PROFILE_2G_10GB, PROFILE_3G_20GB, PROFILE_7G_40GB, TestNode, gpu,
    init_logging, with_profile,
};
use crate::MigError;

fn naming_strategies() -> Vec<MigStrategy> {
    vec![
        MigStrategy::Single,
        MigStrategy::Mixed,
        MigStrategy::MixedMemoryQualified,
        MigStrategy::MixedFractionallyQualified(FractionTable::default()),
    ]
}

fn fractional() -> MigStrategy {
    MigStrategy::MixedFractionallyQualified(FractionTable::default())
}

fn name(strategy: &MigStrategy, node: &TestNode, gpu: u32, mig: u32) -> String {
    strategy
        .resource_name(node, Partition::new(gpu, mig))
        .unwrap()
        .to_string()
}

fn mixed_a100_node() -> TestNode {
    TestNode::new(vec![
        with_profile(
            with_profile(with_profile(gpu(), PROFILE_3G_20GB), PROFILE_2G_10GB),
            PROFILE_1G_5GB,
        ),
        with_profile(with_profile(gpu(), PROFILE_1G_5GB), PROFILE_1G_5GB),
    ])
}

#[test]
fn test_single_resource_name() {
    let node = TestNode::new(vec![gpu().mig(1, 3, 9856)]);
    assert_eq!(name(&MigStrategy::Single, &node, 0, 0), "mig-1c.3g.10gb");
}

#[test]
fn test_mixed_resource_name() {
    let node = TestNode::new(vec![gpu().mig(1, 3, 9856)]);
    assert_eq!(name(&MigStrategy::Mixed, &node, 0, 0), "mig-3g.10gb");
}

#[test]
fn test_memory_qualified_resource_name() {
    let node = TestNode::new(vec![gpu().mig(3, 3, 19968)]);
    assert_eq!(
        name(&MigStrategy::MixedMemoryQualified, &node, 0, 0),
        "mig-20gb"
    );
}

#[test]
fn test_fractional_resource_names() {
    let node = TestNode::new(vec![
        gpu().mig(3, 3, 19968).mig(2, 2, 9856).mig(1, 1, 4864),
    ]);
    let strategy = fractional();
    assert_eq!(name(&strategy, &node, 0, 0), "mig-half");
    assert_eq!(name(&strategy, &node, 0, 1), "mig-quarter");
    assert_eq!(name(&strategy, &node, 0, 2), "mig-eighth");
}

#[test]
fn test_fractional_unsupported_size() {
    let node = TestNode::new(vec![gpu().mig(4, 4, 19968)]);
    let error = fractional()
        .resource_name(&node, Partition::new(0, 0))
        .unwrap_err();
    assert_eq!(
        error,
        MigError::UnsupportedPartitionSize {
            strategy: "mixed-fractionally-qualified".to_string(),
            instance_slices: 4,
            max_partitions: 7,
        }
    );
}

#[test]
fn test_fractional_unknown_max_partitions() {
    let node = TestNode::new(vec![gpu().max_partitions(4).mig(1, 1, 5952)]);
    assert!(matches!(
        fractional().resource_name(&node, Partition::new(0, 0)),
        Err(MigError::UnsupportedPartitionSize {
            instance_slices: 1,
            max_partitions: 4,
            ..
        })
    ));
}

#[test]
fn test_fractional_custom_table() {
    let table = FractionTable::new([FractionRow {
        max_partitions: 4,
        half: 2,
        quarter: 1,
        eighth: 1,
    }]);
    assert!(table.is_err());

    let mut table = FractionTable::default();
    table
        .extend([FractionRow {
            max_partitions: 15,
            half: 7,
            quarter: 4,
            eighth: 2,
        }])
        .unwrap();
    let strategy = fractional().with_fraction_table(table);
    let node = TestNode::new(vec![
        gpu().max_partitions(15).mig(7, 7, 40000).mig(4, 4, 20000),
        gpu().mig(1, 1, 4864),
    ]);
    assert_eq!(name(&strategy, &node, 0, 0), "mig-half");
    assert_eq!(name(&strategy, &node, 0, 1), "mig-quarter");
    assert_eq!(name(&strategy, &node, 1, 0), "mig-eighth");
}

#[test]
fn test_naming_is_deterministic() {
    let node = mixed_a100_node();
    for strategy in naming_strategies() {
        for mig in collect_mig_devices(&node).unwrap() {
            let first = strategy.resource_name(&node, mig).unwrap();
            let second = strategy.resource_name(&node, mig).unwrap();
            assert_eq!(first, second);
        }
    }
}

#[test]
fn test_identical_attributes_identical_names() {
    let node = mixed_a100_node();
    for strategy in naming_strategies() {
        assert_eq!(name(&strategy, &node, 0, 2), name(&strategy, &node, 1, 0));
        assert_eq!(name(&strategy, &node, 1, 0), name(&strategy, &node, 1, 1));
    }
}

#[test]
fn test_matcher_accepts_own_name() {
    let node = mixed_a100_node();
    for strategy in naming_strategies() {
        for mig in collect_mig_devices(&node).unwrap() {
            let resource = strategy.resource_name(&node, mig).unwrap();
            assert!(
                strategy.matches_resource(&node, mig, &resource).unwrap(),
                "{strategy} rejected {mig} for {resource}"
            );
        }
    }
}

#[test]
fn test_matcher_rejects_other_names() {
    let node = mixed_a100_node();
    let migs = collect_mig_devices(&node).unwrap();
    for strategy in [
        MigStrategy::Mixed,
        MigStrategy::MixedMemoryQualified,
        fractional(),
    ] {
        for &mig1 in &migs {
            for &mig2 in &migs {
                let name1 = strategy.resource_name(&node, mig1).unwrap();
                let name2 = strategy.resource_name(&node, mig2).unwrap();
                assert_eq!(
                    strategy.matches_resource(&node, mig1, &name2).unwrap(),
                    name1 == name2
                );
            }
        }
    }
}

#[test]
fn test_single_matcher_accepts_everything() {
    let node = mixed_a100_node();
    let resource = ResourceName::new("gpu").unwrap();
    for mig in collect_mig_devices(&node).unwrap() {
        assert!(
            MigStrategy::Single
                .matches_resource(&node, mig, &resource)
                .unwrap()
        );
    }
}

#[test]
#[should_panic]
fn test_none_matcher_panics() {
    let node = mixed_a100_node();
    let resource = ResourceName::new("gpu").unwrap();
    let _ = MigStrategy::None.matches_resource(&node, Partition::new(0, 0), &resource);
}

#[test]
fn test_resource_sets() {
    init_logging();
    let node = mixed_a100_node();
    let names = |strategy: MigStrategy| -> Vec<String> {
        strategy
            .resource_set(&node)
            .unwrap()
            .into_iter()
            .map(|r| r.to_string())
            .collect()
    };
    assert!(names(MigStrategy::None).is_empty());
    assert_eq!(
        names(MigStrategy::Single),
        vec!["mig-1c.1g.5gb", "mig-2c.2g.10gb", "mig-3c.3g.20gb"]
    );
    assert_eq!(
        names(MigStrategy::Mixed),
        vec!["mig-1g.5gb", "mig-2g.10gb", "mig-3g.20gb"]
    );
    assert_eq!(
        names(MigStrategy::MixedMemoryQualified),
        vec!["mig-10gb", "mig-20gb", "mig-5gb"]
    );
    assert_eq!(
        names(fractional()),
        vec!["mig-eighth", "mig-half", "mig-quarter"]
    );
}

#[test]
fn test_memory_qualified_collapses_shapes() {
    let node = TestNode::new(vec![gpu().mig(1, 2, 9856).mig(2, 2, 9856).mig(1, 1, 9856)]);
    let resources = MigStrategy::MixedMemoryQualified
        .resource_set(&node)
        .unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources.first().unwrap().as_str(), "mig-10gb");
    assert_eq!(MigStrategy::Mixed.resource_set(&node).unwrap().len(), 2);
    assert_eq!(MigStrategy::Single.resource_set(&node).unwrap().len(), 3);
}

#[test]
fn test_resource_set_ignores_enumeration_order() {
    let node = mixed_a100_node();
    for strategy in naming_strategies() {
        assert_eq!(
            strategy.resource_set(&node).unwrap(),
            strategy.resource_set(&node.reversed()).unwrap()
        );
    }
}

#[test]
fn test_resource_set_skips_gpus_without_mig() {
    let node = TestNode::new(vec![
        gpu(),
        with_profile(gpu(), PROFILE_7G_40GB),
        with_profile(gpu(), PROFILE_1G_5GB).mig_enabled(false),
    ]);
    let resources = MigStrategy::Mixed.resource_set(&node).unwrap();
    assert_eq!(
        resources.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
        vec!["mig-7g.40gb"]
    );
}

#[test]
fn test_attribute_query_failure_propagates() {
    let node = mixed_a100_node().break_attributes();
    for strategy in naming_strategies() {
        assert!(matches!(
            strategy.resource_set(&node),
            Err(MigError::AttributeQuery(_))
        ));
    }
}
