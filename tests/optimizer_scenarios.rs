// Integration tests for the optimizer facade on hand-built snapshots
use store_optimizer::error::{GeocodeError, RequestDefect};
use store_optimizer::models::{InfeasibilityReport, StopKind, StoreKey};
use store_optimizer::utils::distance::EARTH_RADIUS_MILES;
use store_optimizer::utils::geocode::GeocodeTable;
use store_optimizer::{
    Dataset, Location, OptimizeError, OptimizeRequest, Optimizer, OptimizerConfig, Origin,
    Outcome, PriceObservation,
};

const HOME: &str = "9201 University City Blvd, Charlotte, NC";

/// A point `miles` north of the origin (0, 0)
fn north(miles: f64) -> Location {
    Location::new(miles / EARTH_RADIUS_MILES * 180.0 / std::f64::consts::PI, 0.0)
}

fn obs(chain: &str, item: &str, price: f64, at: Location) -> PriceObservation {
    PriceObservation::new(
        StoreKey::new(chain, "Main"),
        format!("{} Main St", chain),
        item,
        price,
        at,
    )
}

fn create_geocoder() -> GeocodeTable {
    let mut table = GeocodeTable::new();
    table.insert(HOME, Location::new(0.0, 0.0));
    table
}

// Store X sells milk and bread one mile away, store Y sells cheaper milk three miles away
fn create_milk_bread_dataset() -> Dataset {
    Dataset::new(vec![
        obs("X", "milk", 3.00, north(1.0)),
        obs("X", "bread", 2.00, north(1.0)),
        obs("Y", "milk", 2.50, north(3.0)),
    ])
}

fn home() -> Origin {
    Origin::Address(HOME.to_string())
}

#[test]
fn test_single_store_beats_cheaper_detour() {
    let optimizer = Optimizer::default();
    let request = OptimizeRequest::new(["milk", "bread"], 2, home());

    let outcome = optimizer
        .optimize(&request, &create_milk_bread_dataset(), &create_geocoder())
        .unwrap();
    let result = outcome.result().expect("expected a feasible combination");

    assert_eq!(result.stores, vec![StoreKey::new("X", "Main")]);
    assert!((result.item_subtotal - 5.0).abs() < 1e-9);
    assert!((result.miles_traveled - 2.0).abs() < 1e-9);
    assert!((result.total_cost - 6.2).abs() < 1e-9);

    let kinds: Vec<StopKind> = result.route.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![StopKind::Start, StopKind::Store, StopKind::End]);
    assert_eq!(result.route[0].address, HOME);
    assert_eq!(result.route[1].address, "X Main - X Main St");
    assert_eq!(result.route[2].address, HOME);
}

#[test]
fn test_assigned_items_match_requested_items() {
    let optimizer = Optimizer::default();
    let request = OptimizeRequest::new(["MILK", "bread"], 2, home());

    let outcome = optimizer
        .optimize(&request, &create_milk_bread_dataset(), &create_geocoder())
        .unwrap();
    let result = outcome.result().unwrap();

    for assignment in &result.items {
        let lowered = assignment.item.to_lowercase();
        assert!(lowered.contains("milk") || lowered.contains("bread"));
        assert_eq!(assignment.store, StoreKey::new("X", "Main"));
        assert_eq!(assignment.address, "X Main St");
    }
    assert_eq!(result.items.len(), 2);
}

#[test]
fn test_empty_request_is_rejected_before_search() {
    let optimizer = Optimizer::default();
    let empty: Vec<String> = Vec::new();

    let err = optimizer
        .optimize(
            &OptimizeRequest::new(empty, 2, home()),
            &create_milk_bread_dataset(),
            &create_geocoder(),
        )
        .unwrap_err();
    assert!(matches!(err, OptimizeError::EmptyRequest(RequestDefect::NoItems)));

    let err = optimizer
        .optimize(
            &OptimizeRequest::new(["  ", ""], 2, home()),
            &create_milk_bread_dataset(),
            &create_geocoder(),
        )
        .unwrap_err();
    assert!(matches!(err, OptimizeError::EmptyRequest(RequestDefect::NoItems)));

    let err = optimizer
        .optimize(
            &OptimizeRequest::new(["milk"], 0, home()),
            &create_milk_bread_dataset(),
            &create_geocoder(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        OptimizeError::EmptyRequest(RequestDefect::ZeroMaxStores)
    ));
}

#[test]
fn test_empty_request_never_consults_geocoder() {
    let optimizer = Optimizer::default();
    let empty: Vec<String> = Vec::new();
    let panicking = |_: &str| -> Result<Option<Location>, GeocodeError> {
        panic!("geocoder must not be called for an empty request")
    };

    let err = optimizer
        .optimize(
            &OptimizeRequest::new(empty, 2, home()),
            &create_milk_bread_dataset(),
            &panicking,
        )
        .unwrap_err();
    assert!(matches!(err, OptimizeError::EmptyRequest(_)));
}

#[test]
fn test_unresolvable_address_regardless_of_dataset() {
    let optimizer = Optimizer::default();
    let request = OptimizeRequest::new(
        ["milk"],
        2,
        Origin::Address("1 Nowhere Lane".to_string()),
    );

    for dataset in [create_milk_bread_dataset(), Dataset::default()] {
        let err = optimizer
            .optimize(&request, &dataset, &create_geocoder())
            .unwrap_err();
        assert!(matches!(
            err,
            OptimizeError::UnresolvableAddress { ref address } if address == "1 Nowhere Lane"
        ));
    }
}

#[test]
fn test_geocoder_failure_is_distinct_from_no_result() {
    let optimizer = Optimizer::default();
    let failing = |_: &str| -> Result<Option<Location>, GeocodeError> {
        Err(GeocodeError::new("timed out"))
    };

    let err = optimizer
        .optimize(
            &OptimizeRequest::new(["milk"], 2, home()),
            &create_milk_bread_dataset(),
            &failing,
        )
        .unwrap_err();
    assert!(matches!(err, OptimizeError::Geocoding { .. }));
}

#[test]
fn test_invalid_coordinate_origin() {
    let optimizer = Optimizer::default();
    let request = OptimizeRequest::new(
        ["milk"],
        1,
        Origin::Coordinate(Location::new(f64::NAN, 0.0)),
    );

    let err = optimizer
        .optimize(&request, &create_milk_bread_dataset(), &GeocodeTable::new())
        .unwrap_err();
    assert!(matches!(err, OptimizeError::UnresolvableAddress { .. }));
}

#[test]
fn test_budget_below_cheapest_is_budget_exceeded() {
    let optimizer = Optimizer::default();
    let request = OptimizeRequest::new(["milk", "bread"], 2, home()).with_budget(6.0);

    let outcome = optimizer
        .optimize(&request, &create_milk_bread_dataset(), &create_geocoder())
        .unwrap();

    match outcome {
        Outcome::Infeasible(InfeasibilityReport::BudgetExceeded {
            budget,
            cheapest_total,
        }) => {
            assert_eq!(budget, 6.0);
            assert!((cheapest_total - 6.2).abs() < 1e-9);
        }
        other => panic!("expected BudgetExceeded, got {:?}", other),
    }

    let request = OptimizeRequest::new(["milk", "bread"], 2, home()).with_budget(7.0);
    let outcome = optimizer
        .optimize(&request, &create_milk_bread_dataset(), &create_geocoder())
        .unwrap();
    assert!(outcome.is_optimized());
}

#[test]
fn test_invalid_budget() {
    let optimizer = Optimizer::default();
    let request = OptimizeRequest::new(["milk"], 2, home()).with_budget(-1.0);

    let err = optimizer
        .optimize(&request, &create_milk_bread_dataset(), &create_geocoder())
        .unwrap_err();
    assert!(matches!(err, OptimizeError::InvalidBudget(_)));
}

#[test]
fn test_no_coverage_names_unsold_items() {
    let optimizer = Optimizer::default();
    let request = OptimizeRequest::new(["milk", "saffron"], 3, home());

    let outcome = optimizer
        .optimize(&request, &create_milk_bread_dataset(), &create_geocoder())
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::Infeasible(InfeasibilityReport::NoCoverage {
            uncovered_items: vec!["saffron".to_string()],
            max_stores: 3,
        })
    );
}

#[test]
fn test_no_candidate_stores() {
    let optimizer = Optimizer::default();
    let request = OptimizeRequest::new(["milk", "eggs"], 2, home());

    let outcome = optimizer
        .optimize(&request, &Dataset::default(), &create_geocoder())
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::Infeasible(InfeasibilityReport::NoCoverage {
            uncovered_items: vec!["milk".to_string(), "eggs".to_string()],
            max_stores: 2,
        })
    );
}

#[test]
fn test_items_split_across_stores_need_enough_max_stores() {
    let dataset = Dataset::new(vec![
        obs("A", "milk", 1.0, north(1.0)),
        obs("B", "bread", 1.0, north(2.0)),
    ]);
    let optimizer = Optimizer::default();

    let one = optimizer
        .optimize(
            &OptimizeRequest::new(["milk", "bread"], 1, home()),
            &dataset,
            &create_geocoder(),
        )
        .unwrap();
    assert_eq!(
        one,
        Outcome::Infeasible(InfeasibilityReport::NoCoverage {
            uncovered_items: Vec::new(),
            max_stores: 1,
        })
    );

    let two = optimizer
        .optimize(
            &OptimizeRequest::new(["milk", "bread"], 2, home()),
            &dataset,
            &create_geocoder(),
        )
        .unwrap();
    let result = two.result().unwrap();
    assert_eq!(result.stores, vec![StoreKey::new("A", "Main"), StoreKey::new("B", "Main")]);
    // 1 + 1 + 2 miles back at 0.6 per mile
    assert!((result.total_cost - (2.0 + 4.0 * 0.6)).abs() < 1e-9);
}

#[test]
fn test_search_space_limit() {
    let dataset: Dataset = (0..12)
        .map(|i| obs(&format!("S{}", i), "milk", 1.0 + i as f64, north(1.0 + i as f64)))
        .collect();
    let config = OptimizerConfig {
        max_combinations: 100,
        ..OptimizerConfig::default()
    };
    let optimizer = Optimizer::new(config);

    // C(12,1) + C(12,2) = 78 fits, adding C(12,3) = 220 does not
    assert!(optimizer
        .optimize(
            &OptimizeRequest::new(["milk"], 2, home()),
            &dataset,
            &create_geocoder()
        )
        .is_ok());
    let err = optimizer
        .optimize(
            &OptimizeRequest::new(["milk"], 3, home()),
            &dataset,
            &create_geocoder(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        OptimizeError::SearchSpaceTooLarge {
            combinations: 298,
            limit: 100
        }
    ));
}

#[test]
fn test_cost_per_mile_is_configurable() {
    // With free travel the cheaper milk at Y wins despite the detour
    let config = OptimizerConfig {
        cost_per_mile: 0.0,
        ..OptimizerConfig::default()
    };
    let optimizer = Optimizer::new(config);
    let request = OptimizeRequest::new(["milk", "bread"], 2, home());

    let outcome = optimizer
        .optimize(&request, &create_milk_bread_dataset(), &create_geocoder())
        .unwrap();
    let result = outcome.result().unwrap();
    assert_eq!(result.stores, vec![StoreKey::new("X", "Main"), StoreKey::new("Y", "Main")]);
    assert!((result.total_cost - 4.5).abs() < 1e-9);
}

#[test]
fn test_coordinate_origin_label() {
    let optimizer = Optimizer::default();
    let request = OptimizeRequest::new(
        ["bread"],
        1,
        Origin::Coordinate(Location::new(0.0, 0.0)),
    );

    let outcome = optimizer
        .optimize(&request, &create_milk_bread_dataset(), &GeocodeTable::new())
        .unwrap();
    let result = outcome.result().unwrap();
    assert_eq!(result.route[0].address, "0.000000, 0.000000");
}

#[test]
fn test_repeated_calls_are_identical() {
    let dataset = create_milk_bread_dataset();
    let request = OptimizeRequest::new(["milk", "bread"], 2, home());
    let sequential = Optimizer::default();
    let parallel = Optimizer::new(OptimizerConfig {
        parallel: true,
        ..OptimizerConfig::default()
    });

    let first = sequential.optimize(&request, &dataset, &create_geocoder()).unwrap();
    let second = sequential.optimize(&request, &dataset, &create_geocoder()).unwrap();
    let third = parallel.optimize(&request, &dataset, &create_geocoder()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, third);
    let a = first.result().unwrap();
    let b = second.result().unwrap();
    assert_eq!(a.total_cost.to_bits(), b.total_cost.to_bits());
}

#[test]
fn test_non_finite_price_never_wins() {
    let dataset = Dataset::new(vec![
        obs("A", "milk", f64::NAN, north(0.5)),
        obs("B", "milk", 2.0, north(1.0)),
    ]);
    assert_eq!(dataset.len(), 1);

    for parallel in [false, true] {
        let optimizer = Optimizer::new(OptimizerConfig {
            parallel,
            ..OptimizerConfig::default()
        });
        let outcome = optimizer
            .optimize(
                &OptimizeRequest::new(["milk"], 2, home()),
                &dataset,
                &create_geocoder(),
            )
            .unwrap();
        let result = outcome.result().unwrap();
        assert_eq!(result.stores, vec![StoreKey::new("B", "Main")]);
        assert!((result.total_cost - (2.0 + 2.0 * 0.6)).abs() < 1e-9);
    }
}
