use serde::{Deserialize, Serialize};

use super::money::MoneyRounding;

const RATE_TIE_EPSILON: f64 = 1e-9;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapPerson {
    pub headroom: f64,
    pub marginal_rate: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapAllocation {
    pub amounts: Vec<f64>,
    pub total: f64,
}

pub fn allocate_concessional(total: f64, people: &[CapPerson]) -> CapAllocation {
    let units = MoneyRounding::whole_units();
    let headrooms: Vec<f64> = people
        .iter()
        .map(|p| units.truncate(non_negative(p.headroom)))
        .collect();
    let rates: Vec<f64> = people
        .iter()
        .map(|p| if p.marginal_rate.is_nan() { 0.0 } else { p.marginal_rate })
        .collect();

    // Whole units only, and never more than was asked for.
    let capacity: f64 = headrooms.iter().sum();
    let mut remaining = units.truncate(non_negative(total)).min(capacity);
    let mut amounts = vec![0.0; people.len()];

    let mut order: Vec<usize> = (0..people.len()).collect();
    order.sort_by(|&a, &b| {
        rates[b]
            .total_cmp(&rates[a])
            .then(headrooms[b].total_cmp(&headrooms[a]))
            .then(a.cmp(&b))
    });

    let mut start = 0;
    while start < order.len() && remaining > 0.0 {
        let tier_rate = rates[order[start]];
        let mut end = start + 1;
        while end < order.len() && (rates[order[end]] - tier_rate).abs() <= RATE_TIE_EPSILON {
            end += 1;
        }

        let tier = &order[start..end];
        let tier_capacity: f64 = tier.iter().map(|&i| headrooms[i]).sum();
        let give = remaining.min(tier_capacity);
        if give > 0.0 {
            fill_tier(tier, give, tier_capacity, &headrooms, &mut amounts);
        }
        remaining -= give;
        start = end;
    }

    CapAllocation {
        total: amounts.iter().sum(),
        amounts,
    }
}

fn fill_tier(
    tier: &[usize],
    give: f64,
    tier_capacity: f64,
    headrooms: &[f64],
    amounts: &mut [f64],
) {
    let mut remainders = Vec::with_capacity(tier.len());
    let mut assigned = 0.0;
    for (pos, &i) in tier.iter().enumerate() {
        let share = give * headrooms[i] / tier_capacity;
        let floor = (share + 1e-9).floor().min(headrooms[i]);
        amounts[i] = floor;
        assigned += floor;
        remainders.push((share - floor, pos));
    }

    remainders.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    let mut leftover = (give - assigned).round().max(0.0) as usize;
    for (_, pos) in remainders.iter().cycle().take(tier.len() * 2) {
        if leftover == 0 {
            break;
        }
        let i = tier[*pos];
        if amounts[i] + 1.0 <= headrooms[i] {
            amounts[i] += 1.0;
            leftover -= 1;
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use proptest::collection::vec;

    fn person(headroom: f64, marginal_rate: f64) -> CapPerson {
        CapPerson {
            headroom,
            marginal_rate,
        }
    }

    #[test]
    fn highest_marginal_rate_fills_first() {
        let people = [person(30_000.0, 0.47), person(30_000.0, 0.345)];
        let result = allocate_concessional(20_000.0, &people);
        assert_eq!(result.amounts, vec![20_000.0, 0.0]);
        assert_eq!(result.total, 20_000.0);
    }

    #[test]
    fn overflow_spills_to_next_tier() {
        let people = [person(10_000.0, 0.345), person(15_000.0, 0.47)];
        let result = allocate_concessional(20_000.0, &people);
        assert_eq!(result.amounts, vec![5_000.0, 15_000.0]);
    }

    #[test]
    fn equal_rates_split_pro_rata_by_headroom() {
        let people = [person(10_000.0, 0.39), person(30_000.0, 0.39)];
        let result = allocate_concessional(20_000.0, &people);
        assert_eq!(result.amounts, vec![5_000.0, 15_000.0]);
    }

    #[test]
    fn odd_unit_in_a_tie_is_not_lost() {
        let people = [person(30_000.0, 0.39), person(30_000.0, 0.39)];
        let result = allocate_concessional(10_001.0, &people);
        assert_eq!(result.total, 10_001.0);
        let mut sorted = result.amounts.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(sorted, vec![5_000.0, 5_001.0]);
    }

    #[test]
    fn total_is_capped_by_combined_headroom() {
        let people = [person(5_000.0, 0.47), person(-2_000.0, 0.32)];
        let result = allocate_concessional(50_000.0, &people);
        assert_eq!(result.amounts, vec![5_000.0, 0.0]);
        assert_eq!(result.total, 5_000.0);
    }

    #[test]
    fn fractional_request_is_never_rounded_up() {
        let result = allocate_concessional(12_345.67, &[person(30_000.0, 0.47)]);
        assert_eq!(result.amounts, vec![12_345.0]);
        assert_eq!(result.total, 12_345.0);

        let people = [person(20_000.4, 0.39), person(20_000.4, 0.39)];
        let result = allocate_concessional(12_345.67, &people);
        assert_eq!(result.total, 12_345.0);
        let capped = allocate_concessional(90_000.0, &people);
        assert_eq!(capped.amounts, vec![20_000.0, 20_000.0]);
    }

    #[test]
    fn empty_or_negative_requests_allocate_nothing() {
        assert_eq!(allocate_concessional(1_000.0, &[]).total, 0.0);
        let result = allocate_concessional(-10.0, &[person(1_000.0, 0.3)]);
        assert_eq!(result.amounts, vec![0.0]);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(128))]

        #[test]
        fn prop_cap_invariants_hold(
            total in 0u32..150_000,
            members in vec((-10_000i32..40_000, 0usize..4), 0..5)
        ) {
            const RATES: [f64; 4] = [0.0, 0.32, 0.39, 0.47];
            let people: Vec<CapPerson> = members
                .iter()
                .map(|&(h, r)| person(h as f64, RATES[r]))
                .collect();

            let result = allocate_concessional(total as f64, &people);
            let capacity: f64 = people.iter().map(|p| p.headroom.max(0.0)).sum();
            prop_assert_eq!(result.total, (total as f64).min(capacity));
            prop_assert_eq!(result.amounts.len(), people.len());

            for (p, amount) in people.iter().zip(&result.amounts) {
                prop_assert!(*amount >= 0.0);
                prop_assert!(*amount <= p.headroom.max(0.0));
            }

            for (i, p) in people.iter().enumerate() {
                if result.amounts[i] > 0.0 {
                    for (j, q) in people.iter().enumerate() {
                        if q.marginal_rate > p.marginal_rate {
                            prop_assert_eq!(result.amounts[j], q.headroom.max(0.0));
                        }
                    }
                }
            }
        }

        #[test]
        fn prop_fractional_totals_stay_within_request(
            total_cents in 0u64..15_000_000,
            members in vec((0u32..4_000_000, 0usize..3), 0..5)
        ) {
            const RATES: [f64; 3] = [0.32, 0.39, 0.47];
            let total = total_cents as f64 / 100.0;
            let people: Vec<CapPerson> = members
                .iter()
                .map(|&(h, r)| person(h as f64 / 100.0, RATES[r]))
                .collect();

            let result = allocate_concessional(total, &people);
            let whole_capacity: f64 = people.iter().map(|p| p.headroom.floor()).sum();
            prop_assert!(result.total <= total);
            prop_assert_eq!(result.total, total.floor().min(whole_capacity));
            for (p, amount) in people.iter().zip(&result.amounts) {
                prop_assert_eq!(amount.fract(), 0.0);
                prop_assert!(*amount <= p.headroom);
            }
        }

        #[test]
        fn prop_allocation_is_invariant_to_input_order(
            total in 0u32..150_000,
            members in vec((0i32..40_000, 0usize..3), 1..5)
        ) {
            const RATES: [f64; 3] = [0.32, 0.39, 0.47];
            let people: Vec<CapPerson> = members
                .iter()
                .map(|&(h, r)| person(h as f64, RATES[r]))
                .collect();
            let reversed: Vec<CapPerson> = people.iter().rev().copied().collect();

            let forward = allocate_concessional(total as f64, &people);
            let backward = allocate_concessional(total as f64, &reversed);

            let mut a: Vec<(u64, u64, u64)> = people
                .iter()
                .zip(&forward.amounts)
                .map(|(p, x)| (p.headroom.to_bits(), p.marginal_rate.to_bits(), x.to_bits()))
                .collect();
            let mut b: Vec<(u64, u64, u64)> = reversed
                .iter()
                .zip(&backward.amounts)
                .map(|(p, x)| (p.headroom.to_bits(), p.marginal_rate.to_bits(), x.to_bits()))
                .collect();
            a.sort_unstable();
            b.sort_unstable();
            prop_assert_eq!(a, b);
            prop_assert_eq!(forward.total, backward.total);
        }
    }
}
