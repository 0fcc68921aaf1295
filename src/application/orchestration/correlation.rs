//! Correlation of strategy replies to analysis cycles.
//!
//! Each fan-out opens one entry holding the strategies still owed a reply
//! and a deadline. Replies drain the pending set; the cycle closes when the
//! set is empty or the deadline passes, whichever comes first.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::domain::decision::Vote;
use crate::domain::id::{AssetId, CycleId, StrategyName};
use crate::domain::message::StrategyResponse;

/// One open analysis cycle.
#[derive(Debug, Clone)]
pub struct PendingCycle {
    pub asset_id: AssetId,
    pub timestamp: DateTime<Utc>,
    pub deadline: Instant,
    pending: HashSet<StrategyName>,
    votes: Vec<Vote>,
}

impl PendingCycle {
    /// Strategies that have not replied yet.
    pub fn pending(&self) -> impl Iterator<Item = &StrategyName> {
        self.pending.iter()
    }

    /// Replies collected so far, in arrival order.
    #[must_use]
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    #[must_use]
    pub fn into_votes(self) -> Vec<Vote> {
        self.votes
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

/// What happened to one strategy reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Counted; `complete` once no strategy is outstanding.
    Accepted { complete: bool },
    /// The strategy already replied in this cycle.
    Duplicate,
    /// The cycle is open but the reply does not belong to it.
    Mismatched,
    /// The cycle is closed or was never opened.
    Unknown,
}

/// Map from cycle id to its open state.
#[derive(Debug, Default)]
pub struct CorrelationMap {
    cycles: HashMap<CycleId, PendingCycle>,
}

impl CorrelationMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a cycle expecting one reply from each of `strategies`.
    pub fn open(
        &mut self,
        cycle: CycleId,
        asset_id: AssetId,
        timestamp: DateTime<Utc>,
        strategies: impl IntoIterator<Item = StrategyName>,
        deadline: Instant,
    ) {
        self.cycles.insert(
            cycle,
            PendingCycle {
                asset_id,
                timestamp,
                deadline,
                pending: strategies.into_iter().collect(),
                votes: Vec::new(),
            },
        );
    }

    /// Stop waiting for `strategy` (its request could not be delivered).
    ///
    /// Returns `true` when the cycle has nothing left to wait for.
    pub fn forget(&mut self, cycle: &CycleId, strategy: &StrategyName) -> bool {
        self.cycles.get_mut(cycle).is_some_and(|open| {
            open.pending.remove(strategy);
            open.is_complete()
        })
    }

    /// Record a strategy reply.
    pub fn record(&mut self, response: &StrategyResponse) -> ReplyOutcome {
        let Some(open) = self.cycles.get_mut(&response.cycle) else {
            return ReplyOutcome::Unknown;
        };
        if open.asset_id != response.asset_id || open.timestamp != response.timestamp {
            return ReplyOutcome::Mismatched;
        }
        if open
            .votes
            .iter()
            .any(|vote| vote.strategy == response.strategy_name)
        {
            return ReplyOutcome::Duplicate;
        }
        if !open.pending.remove(&response.strategy_name) {
            return ReplyOutcome::Mismatched;
        }

        open.votes.push(Vote::new(
            response.strategy_name.clone(),
            response.prediction.clone(),
            response.confidence,
        ));
        ReplyOutcome::Accepted {
            complete: open.is_complete(),
        }
    }

    /// Remove and return a cycle.
    pub fn close(&mut self, cycle: &CycleId) -> Option<PendingCycle> {
        self.cycles.remove(cycle)
    }

    /// Cycles whose deadline is at or before `now`.
    #[must_use]
    pub fn expired(&self, now: Instant) -> Vec<CycleId> {
        self.cycles
            .iter()
            .filter(|(_, open)| open.deadline <= now)
            .map(|(cycle, _)| cycle.clone())
            .collect()
    }

    /// Earliest deadline among open cycles.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.cycles.values().map(|open| open.deadline).min()
    }

    #[must_use]
    pub fn get(&self, cycle: &CycleId) -> Option<&PendingCycle> {
        self.cycles.get(cycle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::action::Action;
    use crate::domain::prediction::{Confidence, PredictionPayload};
    use std::time::Duration;

    fn names() -> Vec<StrategyName> {
        vec![StrategyName::new("a"), StrategyName::new("b")]
    }

    fn reply(cycle: &CycleId, strategy: &str, at: DateTime<Utc>) -> StrategyResponse {
        StrategyResponse {
            cycle: cycle.clone(),
            asset_id: AssetId::new("AAPL"),
            timestamp: at,
            strategy_name: StrategyName::new(strategy),
            prediction: PredictionPayload::new(Action::Buy, None),
            confidence: Confidence::clamped(0.6),
            rationale: String::new(),
        }
    }

    #[test]
    fn cycle_completes_when_every_strategy_replied() {
        let mut map = CorrelationMap::new();
        let cycle = CycleId::new();
        let at = Utc::now();
        map.open(cycle.clone(), AssetId::new("AAPL"), at, names(), Instant::now());

        assert_eq!(
            map.record(&reply(&cycle, "a", at)),
            ReplyOutcome::Accepted { complete: false }
        );
        assert_eq!(
            map.record(&reply(&cycle, "b", at)),
            ReplyOutcome::Accepted { complete: true }
        );
        assert_eq!(map.close(&cycle).unwrap().votes().len(), 2);
        assert!(map.is_empty());
    }

    #[test]
    fn duplicate_and_foreign_replies_are_not_counted() {
        let mut map = CorrelationMap::new();
        let cycle = CycleId::new();
        let at = Utc::now();
        map.open(cycle.clone(), AssetId::new("AAPL"), at, names(), Instant::now());

        map.record(&reply(&cycle, "a", at));
        assert_eq!(map.record(&reply(&cycle, "a", at)), ReplyOutcome::Duplicate);
        assert_eq!(map.record(&reply(&cycle, "zzz", at)), ReplyOutcome::Mismatched);
        assert_eq!(
            map.record(&reply(&CycleId::new(), "b", at)),
            ReplyOutcome::Unknown
        );
        assert_eq!(map.get(&cycle).unwrap().votes().len(), 1);
    }

    #[test]
    fn closed_cycle_treats_replies_as_unknown() {
        let mut map = CorrelationMap::new();
        let cycle = CycleId::new();
        let at = Utc::now();
        map.open(cycle.clone(), AssetId::new("AAPL"), at, names(), Instant::now());
        map.close(&cycle);

        assert_eq!(map.record(&reply(&cycle, "a", at)), ReplyOutcome::Unknown);
    }

    #[test]
    fn forget_completes_cycle_without_reply() {
        let mut map = CorrelationMap::new();
        let cycle = CycleId::new();
        map.open(cycle.clone(), AssetId::new("AAPL"), Utc::now(), names(), Instant::now());

        assert!(!map.forget(&cycle, &StrategyName::new("a")));
        assert!(map.forget(&cycle, &StrategyName::new("b")));
    }

    #[test]
    fn deadlines_are_tracked() {
        let mut map = CorrelationMap::new();
        let now = Instant::now();
        let early = CycleId::new();
        let late = CycleId::new();
        map.open(early.clone(), AssetId::new("A"), Utc::now(), names(), now);
        map.open(
            late,
            AssetId::new("B"),
            Utc::now(),
            names(),
            now + Duration::from_secs(5),
        );

        assert_eq!(map.next_deadline(), Some(now));
        assert_eq!(map.expired(now), vec![early]);
    }
}
