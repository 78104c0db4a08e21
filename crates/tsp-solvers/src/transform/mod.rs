//! The [CostTransform] family: stateless (or reseedable) rules that turn a base [CostMatrix] into
//! a derived one a length-minimising subsolver can answer, plus the feasibility predicate the
//! oracle uses to accept or reject the tour it returns.
//!
//! Re-architected as a sum type per the design note favouring a closed `Transform` capability set
//! over the base implementation's function-pointer record.

mod shake;

pub use shake::RandomOffsetTable;

use rand::Rng;
use tsp_core::instance::{distance::Distance, node::Node};

use crate::cost::{CostMatrix, ProblemInfo, Tour};

#[derive(Debug, Clone)]
pub enum CostTransform {
    /// `0` if `c <= delta`, else `c`; fixed edges pass through unchanged.
    BtspBasic { delta: Distance },
    /// `c` if `c <= delta`, else `infinity_sentinel`.
    BtspConstrained {
        delta: Distance,
        infinity_sentinel: Distance,
        feasible_length: Distance,
    },
    /// `0` if `c` in `[low, high]`, else `c + R[pos] + 1`.
    BtspShake1 {
        low: Distance,
        high: Distance,
        offsets: RandomOffsetTable,
    },
    /// `c + R[pos]` if `c <= delta`, else `infinity_sentinel`.
    BtspConstrainedShake {
        delta: Distance,
        infinity_sentinel: Distance,
        feasible_length: Distance,
        offsets: RandomOffsetTable,
    },
    /// `0` if `c < 0` (fixed edge); `shift` if `c` in `[low, high]`; else `c + shift`.
    BtspAsymShift {
        shift: Distance,
        low: Distance,
        high: Distance,
        feasible_length: Distance,
    },
    /// `0` if `c` in `[low, high]`, else `c + 1`.
    BalTspBasic { low: Distance, high: Distance },
    /// `high - c` if `c` in `[low, high]`, else `n * (high - low + 1)`.
    BalTspUt { low: Distance, high: Distance },
    /// `0` if `c` in `[low, high]`, else `c + R[pos] + 1`.
    BalTspShake {
        low: Distance,
        high: Distance,
        offsets: RandomOffsetTable,
    },
    /// `c` if `c >= low`, else `n * (high + 1)`.
    BalTspIb { low: Distance, high: Distance },
    /// `(high - c) + R[pos]` if `c` in `[low, high]`, else `m * n + R[pos]`.
    BalTspDt2 {
        low: Distance,
        high: Distance,
        m: i32,
        offsets: RandomOffsetTable,
    },
}

impl CostTransform {
    pub fn apply(&self, base: &CostMatrix, info: &ProblemInfo) -> CostMatrix {
        let n = base.size() as i32;

        match self {
            CostTransform::BtspBasic { delta } => {
                dense_map(base, |c| if c <= *delta { Distance(0) } else { c })
            }
            CostTransform::BtspConstrained {
                delta,
                infinity_sentinel,
                ..
            } => dense_map(base, |c| if c <= *delta { c } else { *infinity_sentinel }),
            CostTransform::BtspShake1 { low, high, offsets } => {
                dense_map_indexed(base, info, |c, pos| {
                    if c >= *low && c <= *high {
                        Distance(0)
                    } else {
                        c + Distance(offsets.get(pos) + 1)
                    }
                })
            }
            CostTransform::BtspConstrainedShake {
                delta,
                infinity_sentinel,
                offsets,
                ..
            } => dense_map_indexed(base, info, |c, pos| {
                if c <= *delta {
                    c + Distance(offsets.get(pos))
                } else {
                    *infinity_sentinel
                }
            }),
            CostTransform::BtspAsymShift {
                shift, low, high, ..
            } => dense_map_zeroing_fixed(base, |c| {
                if c >= *low && c <= *high {
                    *shift
                } else {
                    c + *shift
                }
            }),
            CostTransform::BalTspBasic { low, high } => dense_map(base, |c| {
                if c >= *low && c <= *high {
                    Distance(0)
                } else {
                    c + Distance(1)
                }
            }),
            CostTransform::BalTspUt { low, high } => {
                let sentinel = Distance(n * (high.0 - low.0 + 1));
                dense_map(base, |c| {
                    if c >= *low && c <= *high {
                        *high - c
                    } else {
                        sentinel
                    }
                })
            }
            CostTransform::BalTspShake { low, high, offsets } => {
                dense_map_indexed(base, info, |c, pos| {
                    if c >= *low && c <= *high {
                        Distance(0)
                    } else {
                        c + Distance(offsets.get(pos) + 1)
                    }
                })
            }
            CostTransform::BalTspIb { low, high } => {
                let sentinel = Distance(n * (high.0 + 1));
                dense_map(base, |c| if c >= *low { c } else { sentinel })
            }
            CostTransform::BalTspDt2 {
                low,
                high,
                m,
                offsets,
            } => {
                let sentinel = Distance(*m * n);
                dense_map_indexed(base, info, |c, pos| {
                    if c >= *low && c <= *high {
                        (*high - c) + Distance(offsets.get(pos))
                    } else {
                        sentinel + Distance(offsets.get(pos))
                    }
                })
            }
        }
    }

    pub fn feasible(
        &self,
        base: &CostMatrix,
        info: &ProblemInfo,
        tour: &Tour,
        length: Distance,
    ) -> bool {
        let n = base.size() as i32;

        match self {
            CostTransform::BtspBasic { delta } => {
                length.0 <= 0
                    && all_fixed_edges_used(base, tour)
                    && tour.edges().all(|(i, j)| {
                        let c = base.cost(i, j);
                        base.is_fixed_edge(i, j) || (c >= info.min_cost() && c <= *delta)
                    })
            }
            CostTransform::BtspConstrained { feasible_length, .. } => length <= *feasible_length,
            CostTransform::BtspShake1 { .. } => length.0 <= 0,
            CostTransform::BtspConstrainedShake {
                delta,
                feasible_length,
                ..
            } => {
                length <= *feasible_length
                    && tour.edges().all(|(i, j)| {
                        base.is_fixed_edge(i, j) || base.cost(i, j) <= *delta
                    })
            }
            CostTransform::BtspAsymShift {
                shift,
                feasible_length,
                ..
            } => {
                let actual_length = length - Distance(shift.0 * n);
                actual_length <= *feasible_length && all_fixed_edges_used(base, tour)
            }
            CostTransform::BalTspBasic { .. } => length.0 == 0,
            CostTransform::BalTspUt { low, high } => length < Distance(n * (high.0 - low.0 + 1)),
            CostTransform::BalTspShake { .. } => length.0 == 0,
            CostTransform::BalTspIb { high, .. } => length < Distance(n * (high.0 + 1)),
            CostTransform::BalTspDt2 { m, .. } => length < Distance(*m * n),
        }
    }

    /// Reinitialise the shake transforms' random offset tables. No-op for the deterministic
    /// variants.
    pub fn reseed(&mut self, rng: &mut impl Rng) {
        match self {
            CostTransform::BtspShake1 { offsets, .. }
            | CostTransform::BtspConstrainedShake { offsets, .. }
            | CostTransform::BalTspShake { offsets, .. }
            | CostTransform::BalTspDt2 { offsets, .. } => offsets.reseed(rng),
            _ => {}
        }
    }
}

fn dense_map(base: &CostMatrix, mut f: impl FnMut(Distance) -> Distance) -> CostMatrix {
    let size = base.size();
    let mut data = Vec::with_capacity(size * size);
    for i in 0..size {
        for j in 0..size {
            if i == j {
                data.push(Distance(0));
                continue;
            }
            let c = base.cost(Node(i), Node(j));
            data.push(if is_fixed_passthrough(c) { c } else { f(c) });
        }
    }
    CostMatrix::from_dense_row_major(data, size, base.symmetric())
}

fn dense_map_indexed(
    base: &CostMatrix,
    info: &ProblemInfo,
    mut f: impl FnMut(Distance, usize) -> Distance,
) -> CostMatrix {
    let size = base.size();
    let mut data = Vec::with_capacity(size * size);
    for i in 0..size {
        for j in 0..size {
            if i == j {
                data.push(Distance(0));
                continue;
            }
            let c = base.cost(Node(i), Node(j));
            if is_fixed_passthrough(c) {
                data.push(c);
                continue;
            }
            let pos = info
                .index_of(c)
                .expect("every non-fixed base cost must appear in its ProblemInfo");
            data.push(f(c, pos));
        }
    }
    CostMatrix::from_dense_row_major(data, size, base.symmetric())
}

fn is_fixed_passthrough(c: Distance) -> bool {
    c.0 < 0
}

/// Like [dense_map], but fixed edges are zeroed rather than passed through: used by
/// [CostTransform::BtspAsymShift], whose asymmetric doubling always wants the mandatory
/// ghost-node edges to contribute nothing to the shifted objective.
fn dense_map_zeroing_fixed(base: &CostMatrix, mut f: impl FnMut(Distance) -> Distance) -> CostMatrix {
    let size = base.size();
    let mut data = Vec::with_capacity(size * size);
    for i in 0..size {
        for j in 0..size {
            if i == j {
                data.push(Distance(0));
                continue;
            }
            let c = base.cost(Node(i), Node(j));
            data.push(if is_fixed_passthrough(c) { Distance(0) } else { f(c) });
        }
    }
    CostMatrix::from_dense_row_major(data, size, base.symmetric())
}

fn all_fixed_edges_used(base: &CostMatrix, tour: &Tour) -> bool {
    tour.fixed_edge_count(base) == base.fixed_edge_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tsp_core::instance::node::Node;

    fn diamond() -> CostMatrix {
        let data = vec![
            Distance(0), Distance(1), Distance(3), Distance(2),
            Distance(1), Distance(0), Distance(4), Distance(5),
            Distance(3), Distance(4), Distance(0), Distance(6),
            Distance(2), Distance(5), Distance(6), Distance(0),
        ];
        CostMatrix::from_dense_row_major(data, 4, true)
    }

    #[test]
    fn btsp_basic_zeroes_edges_within_delta() {
        let base = diamond();
        let info = ProblemInfo::build(&base);
        let transform = CostTransform::BtspBasic { delta: Distance(5) };
        let derived = transform.apply(&base, &info);

        assert_eq!(derived.cost(Node(0), Node(1)), Distance(0));
        assert_eq!(derived.cost(Node(2), Node(3)), Distance(6));
    }

    #[test]
    fn btsp_basic_feasible_tour_matches_seed_s1() {
        let base = diamond();
        let info = ProblemInfo::build(&base);
        let transform = CostTransform::BtspBasic { delta: Distance(5) };
        let tour = Tour::new(vec![Node(0), Node(2), Node(1), Node(3)]);
        let derived = transform.apply(&base, &info);
        let length = tour.length(&derived);

        assert!(transform.feasible(&base, &info, &tour, length));
    }

    #[test]
    fn shake_transform_reseed_changes_offsets() {
        let base = diamond();
        let info = ProblemInfo::build(&base);
        let mut transform = CostTransform::BtspShake1 {
            low: Distance(1),
            high: Distance(3),
            offsets: RandomOffsetTable::new(info.len(), 0, 10),
        };
        let mut rng = StdRng::seed_from_u64(42);
        transform.reseed(&mut rng);
        let _ = transform.apply(&base, &info);
    }
}
