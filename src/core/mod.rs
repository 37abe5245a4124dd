mod allocator;
mod bands;
mod bridge;
mod engine;
mod money;
mod optimizer;
mod plan;
mod rules;
mod search;
mod solver;
mod types;

pub use allocator::{CapAllocation, CapPerson, allocate_concessional};
pub use bands::{SpendBand, SpendingBands};
pub use bridge::{BridgeAssessment, BridgeTolerance, Constraint, assess_bridge, classify};
pub use engine::{
    Accumulation, ContributionFlow, Decumulation, project_accumulation, simulate_decumulation,
    split_savings,
};
pub use money::{MoneyRounding, round_half_even};
pub use optimizer::{
    CapPolicy, Candidate, Objective, OptimizeResult, SearchResolution, optimize_split,
};
pub use plan::{PlanResult, build_plan};
pub use rules::{JurisdictionRules, TaxBracket};
pub use search::{
    AgeEvaluation, EarliestAge, SweepPoint, age_sweep, earliest_age_for_spend,
    earliest_viable_age, evaluate_age,
};
pub use solver::{SolverLimits, SpendSolution, solve_sustainable_spend, sustainable_spend_from};
pub use types::{
    Balances, CalcSettings, ContributionSplit, FutureInflow, Household, PathPoint, Phase, Pool,
    SplitMode,
};
