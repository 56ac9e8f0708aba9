//! Integration tests for types

#[cfg(test)]
mod tests {
    use banker_errors::ValidationError;
    use banker_types::*;
    use proptest::prelude::*;

    #[test]
    fn test_scenario_round_trip_through_validation() {
        let scenario = Scenario::from_rows(
            &["0,1,0", "2,0,0", "3,0,2", "2,1,1", "0,0,2"],
            &["7,5,3", "3,2,2", "9,0,2", "2,2,2", "4,3,3"],
            "3,3,2",
        )
        .unwrap();
        let state = scenario.validate().unwrap();
        assert_eq!(state.total_supply(), vec![10, 5, 7]);
    }

    #[test]
    fn test_state_serializes_to_json() {
        let state = AllocationState::validate(1, 1, &[vec![1]], &[vec![2]], &[3]).unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["allocation"], serde_json::json!([[1]]));
        assert_eq!(json["available"], serde_json::json!([3]));
    }

    #[test]
    fn test_output_format_serialization() {
        let json = serde_json::to_string(&OutputFormat::Json).unwrap();
        assert_eq!(json, r#""json""#);
        let color: ColorChoice = serde_json::from_str(r#""never""#).unwrap();
        assert_eq!(color, ColorChoice::Never);
    }

    proptest! {
        #[test]
        fn prop_negative_entries_always_rejected(
            row in 0usize..4,
            col in 0usize..3,
            value in i64::MIN..0,
        ) {
            let mut allocation = vec![vec![0i64; 3]; 4];
            allocation[row][col] = value;
            let max_demand = vec![vec![5i64; 3]; 4];
            let err = AllocationState::validate(4, 3, &allocation, &max_demand, &[1, 1, 1])
                .unwrap_err();
            let is_negative_value = matches!(err, ValidationError::NegativeValue { .. });
            prop_assert!(is_negative_value);
        }

        #[test]
        fn prop_preempt_preserves_supply(
            held in proptest::collection::vec(0i64..5, 3),
            extra in proptest::collection::vec(0i64..5, 3),
            free in proptest::collection::vec(0i64..5, 3),
        ) {
            let max: Vec<i64> = held.iter().zip(&extra).map(|(h, e)| h + e).collect();
            let state = AllocationState::validate(1, 3, &[held], &[max], &free).unwrap();
            let supply = state.total_supply();
            let preempted = state.preempt(0).unwrap();
            prop_assert_eq!(preempted.total_supply(), supply);
            prop_assert!(preempted.allocation()[0].iter().all(|&v| v == 0));
        }
    }
}
