//! Validated resource-allocation state
//!
//! An [`AllocationState`] can only be obtained through
//! [`AllocationState::validate`], so every algorithm downstream may assume
//! rectangular matrices, non-negative counts and `max_demand >= allocation`
//! in every cell.

use banker_errors::{Table, ValidationError};
use serde::Serialize;

/// Snapshot of per-process holdings, declared maximum claims and free units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationState {
    processes: usize,
    resources: usize,
    allocation: Vec<Vec<u64>>,
    max_demand: Vec<Vec<u64>>,
    available: Vec<u64>,
}

impl AllocationState {
    /// Validate raw input and build a state from it
    ///
    /// Checks run in order: shape of every table, then sign of every entry,
    /// then `max_demand >= allocation` per cell. The first violation found is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Shape`] when a table does not match the
    /// declared `processes` x `resources` dimensions,
    /// [`ValidationError::NegativeValue`] for any entry below zero, and
    /// [`ValidationError::InfeasibleDemand`] when a process holds more than it
    /// declared as its maximum.
    pub fn validate(
        processes: usize,
        resources: usize,
        allocation: &[Vec<i64>],
        max_demand: &[Vec<i64>],
        available: &[i64],
    ) -> Result<Self, ValidationError> {
        check_matrix_shape(Table::Allocation, allocation, processes, resources)?;
        check_matrix_shape(Table::MaxDemand, max_demand, processes, resources)?;
        if available.len() != resources {
            return Err(ValidationError::Shape {
                table: Table::Available,
                row: None,
                expected: resources,
                actual: available.len(),
            });
        }

        let allocation = to_unsigned_matrix(Table::Allocation, allocation)?;
        let max_demand = to_unsigned_matrix(Table::MaxDemand, max_demand)?;
        let available = to_unsigned_row(Table::Available, None, available)?;

        for (process, (held, max)) in allocation.iter().zip(&max_demand).enumerate() {
            for (resource, (&held, &max)) in held.iter().zip(max).enumerate() {
                if max < held {
                    return Err(ValidationError::InfeasibleDemand {
                        process,
                        resource,
                        allocation: i64::try_from(held).unwrap_or(i64::MAX),
                        max_demand: i64::try_from(max).unwrap_or(i64::MAX),
                    });
                }
            }
        }

        tracing::debug!(processes, resources, "allocation state validated");

        Ok(Self {
            processes,
            resources,
            allocation,
            max_demand,
            available,
        })
    }

    /// Number of processes
    #[must_use]
    pub fn processes(&self) -> usize {
        self.processes
    }

    /// Number of resource types
    #[must_use]
    pub fn resources(&self) -> usize {
        self.resources
    }

    /// Units of each resource held by each process
    #[must_use]
    pub fn allocation(&self) -> &[Vec<u64>] {
        &self.allocation
    }

    /// Declared maximum claim of each process on each resource
    #[must_use]
    pub fn max_demand(&self) -> &[Vec<u64>] {
        &self.max_demand
    }

    /// Unallocated units of each resource
    #[must_use]
    pub fn available(&self) -> &[u64] {
        &self.available
    }

    /// Remaining claim of one process, or `None` if the index is out of range
    #[must_use]
    pub fn need(&self, process: usize) -> Option<Vec<u64>> {
        let held = self.allocation.get(process)?;
        let max = self.max_demand.get(process)?;
        Some(max.iter().zip(held).map(|(m, a)| m - a).collect())
    }

    /// `max_demand - allocation` for every process
    #[must_use]
    pub fn need_matrix(&self) -> Vec<Vec<u64>> {
        (0..self.processes)
            .filter_map(|process| self.need(process))
            .collect()
    }

    /// Sum of one process's allocation row
    #[must_use]
    pub fn held_by(&self, process: usize) -> u64 {
        self.allocation
            .get(process)
            .map_or(0, |row| row.iter().fold(0, |acc, &v| acc.saturating_add(v)))
    }

    /// Allocated plus available units, per resource
    #[must_use]
    pub fn total_supply(&self) -> Vec<u64> {
        let mut supply = self.available.clone();
        for row in &self.allocation {
            for (total, &held) in supply.iter_mut().zip(row) {
                *total = total.saturating_add(held);
            }
        }
        supply
    }

    /// Return a copy with `process`'s allocation moved back to `available`
    ///
    /// The process's maximum demand is left as it was, so its need grows back
    /// to the full maximum. Returns `None` if the index is out of range.
    #[must_use]
    pub fn preempt(&self, process: usize) -> Option<Self> {
        let mut next = self.clone();
        let row = next.allocation.get_mut(process)?;
        for (free, held) in next.available.iter_mut().zip(row.iter_mut()) {
            *free = free.saturating_add(*held);
            *held = 0;
        }
        Some(next)
    }

    /// Return a copy with `request` moved from `available` to `process`
    ///
    /// Returns `None` if the index is out of range, the request length is
    /// wrong, or the request exceeds either the process's need or what is
    /// available.
    #[must_use]
    pub fn grant(&self, process: usize, request: &[u64]) -> Option<Self> {
        let need = self.need(process)?;
        if request.len() != self.resources
            || !fits_within(request, &need)
            || !fits_within(request, &self.available)
        {
            return None;
        }

        let mut next = self.clone();
        let row = next.allocation.get_mut(process)?;
        for ((free, held), &units) in next.available.iter_mut().zip(row.iter_mut()).zip(request) {
            *free -= units;
            *held += units;
        }
        Some(next)
    }
}

/// Whether `demand[j] <= supply[j]` holds for every resource `j`
#[must_use]
pub fn fits_within(demand: &[u64], supply: &[u64]) -> bool {
    demand.len() == supply.len() && demand.iter().zip(supply).all(|(d, s)| d <= s)
}

fn check_matrix_shape(
    table: Table,
    matrix: &[Vec<i64>],
    rows: usize,
    columns: usize,
) -> Result<(), ValidationError> {
    if matrix.len() != rows {
        return Err(ValidationError::Shape {
            table,
            row: None,
            expected: rows,
            actual: matrix.len(),
        });
    }
    for (index, row) in matrix.iter().enumerate() {
        if row.len() != columns {
            return Err(ValidationError::Shape {
                table,
                row: Some(index),
                expected: columns,
                actual: row.len(),
            });
        }
    }
    Ok(())
}

fn to_unsigned_matrix(table: Table, matrix: &[Vec<i64>]) -> Result<Vec<Vec<u64>>, ValidationError> {
    matrix
        .iter()
        .enumerate()
        .map(|(process, row)| to_unsigned_row(table, Some(process), row))
        .collect()
}

fn to_unsigned_row(
    table: Table,
    process: Option<usize>,
    row: &[i64],
) -> Result<Vec<u64>, ValidationError> {
    row.iter()
        .enumerate()
        .map(|(resource, &value)| {
            u64::try_from(value).map_err(|_| ValidationError::NegativeValue {
                table,
                process,
                resource,
                value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textbook() -> AllocationState {
        AllocationState::validate(
            5,
            3,
            &[
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ],
            &[
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            &[3, 3, 2],
        )
        .unwrap()
    }

    #[test]
    fn test_validate_accepts_textbook_instance() {
        let state = textbook();
        assert_eq!(state.processes(), 5);
        assert_eq!(state.resources(), 3);
        assert_eq!(state.available(), &[3, 3, 2]);
    }

    #[test]
    fn test_need_matrix() {
        let state = textbook();
        assert_eq!(
            state.need_matrix(),
            vec![
                vec![7, 4, 3],
                vec![1, 2, 2],
                vec![6, 0, 0],
                vec![0, 1, 1],
                vec![4, 3, 1],
            ]
        );
        assert_eq!(state.need(5), None);
    }

    #[test]
    fn test_validate_rejects_wrong_row_count() {
        let err = AllocationState::validate(2, 1, &[vec![0]], &[vec![1], vec![1]], &[0])
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Shape {
                table: Table::Allocation,
                row: None,
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_validate_rejects_short_row() {
        let err = AllocationState::validate(
            2,
            2,
            &[vec![0, 0], vec![0, 0]],
            &[vec![1, 1], vec![1]],
            &[0, 0],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Shape {
                table: Table::MaxDemand,
                row: Some(1),
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_validate_rejects_wrong_available_length() {
        let err = AllocationState::validate(1, 2, &[vec![0, 0]], &[vec![1, 1]], &[0, 0, 0])
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Shape {
                table: Table::Available,
                expected: 2,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_negative_entries() {
        let err = AllocationState::validate(1, 2, &[vec![0, -1]], &[vec![1, 1]], &[0, 0])
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeValue {
                table: Table::Allocation,
                process: Some(0),
                resource: 1,
                value: -1,
            }
        );

        let err = AllocationState::validate(1, 1, &[vec![0]], &[vec![1]], &[-3]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeValue {
                table: Table::Available,
                process: None,
                resource: 0,
                value: -3,
            }
        );
    }

    #[test]
    fn test_validate_rejects_infeasible_demand() {
        let err =
            AllocationState::validate(1, 2, &[vec![1, 4]], &[vec![1, 3]], &[0, 0]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InfeasibleDemand {
                process: 0,
                resource: 1,
                allocation: 4,
                max_demand: 3,
            }
        );
    }

    #[test]
    fn test_validate_empty_state() {
        let state = AllocationState::validate(0, 0, &[], &[], &[]).unwrap();
        assert_eq!(state.processes(), 0);
        assert!(state.need_matrix().is_empty());
    }

    #[test]
    fn test_preempt_preserves_supply() {
        let state = textbook();
        let before = state.total_supply();
        let next = state.preempt(2).unwrap();
        assert_eq!(next.allocation()[2], vec![0, 0, 0]);
        assert_eq!(next.available(), &[6, 3, 4]);
        assert_eq!(next.max_demand(), state.max_demand());
        assert_eq!(next.total_supply(), before);
        assert!(state.preempt(9).is_none());
    }

    #[test]
    fn test_grant() {
        let state = textbook();
        let next = state.grant(1, &[1, 0, 2]).unwrap();
        assert_eq!(next.allocation()[1], vec![3, 0, 2]);
        assert_eq!(next.available(), &[2, 3, 0]);
        assert_eq!(next.total_supply(), state.total_supply());

        // exceeds need of process 3
        assert!(state.grant(3, &[1, 0, 0]).is_none());
        // exceeds available
        assert!(state.grant(0, &[4, 0, 0]).is_none());
        // wrong length
        assert!(state.grant(0, &[1, 0]).is_none());
    }

    #[test]
    fn test_held_by() {
        let state = textbook();
        assert_eq!(state.held_by(2), 5);
        assert_eq!(state.held_by(0), 1);
        assert_eq!(state.held_by(42), 0);
    }

    #[test]
    fn test_fits_within() {
        assert!(fits_within(&[1, 2], &[1, 3]));
        assert!(!fits_within(&[2, 2], &[1, 3]));
        assert!(!fits_within(&[1], &[1, 3]));
        assert!(fits_within(&[], &[]));
    }
}
