//! # Scheduling policies
//!
//! A [`Policy`] decides, each tick the engine asks, which task should be
//! running next. All built-in policies delegate their tie-breaking to the
//! same [`resolve`] oracle, so the only axis of difference between them is
//! which primary metric they rank candidates by and whether they use a
//! quantum.
//!
//! | Policy | uses_quantum | primary metric (minimized) | preemptive |
//! |---|---|---|---|
//! | FIFO | no | arrival_tick | no |
//! | Round-Robin | yes | arrival_tick | yes (quantum) |
//! | SRTF | no | duration - executed_ticks | yes |
//! | Preemptive-Priority | no | -dynamic_priority | yes |
//! | Priority-Aging | no | (-dynamic_priority, -static_priority) | yes |

use rand::RngCore;

/// Read-only view of a task as seen by a policy.
#[derive(Debug, Clone, Copy)]
pub struct TaskView<'a> {
    pub id: &'a str,
    pub arrival_tick: u64,
    pub duration: u64,
    pub executed_ticks: u64,
    pub static_priority: i64,
    pub dynamic_priority: i64,
}

/// Outcome of a dispatch decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Id of the task that should run next tick, if any.
    pub next: Option<String>,
    /// Whether the winner was chosen by the random tiebreak draw.
    pub lottery_used: bool,
}

/// Shared scheduling-policy contract. Implementations must not mutate any
/// task; all the state a policy needs to decide is passed in by the engine
/// each call.
pub trait Policy {
    /// Whether this policy uses a quantum-based preemption hint.
    fn uses_quantum(&self) -> bool {
        false
    }

    /// A per-tick aging increment applied by the engine to every Ready
    /// task's dynamic priority, or `None` if this policy doesn't age.
    fn aging_alpha(&self) -> Option<i64> {
        None
    }

    /// Decides the next task to run.
    ///
    /// `ready` excludes `current`. `current` is the Running task, if any.
    /// `quantum_expired` is true iff the engine observed the current
    /// task's quantum fully consumed this tick.
    fn decide(
        &self,
        ready: &[TaskView<'_>],
        current: Option<TaskView<'_>>,
        quantum_expired: bool,
        rng: &mut dyn RngCore,
    ) -> Decision;
}

/// Draws a uniform real in `[0, 1)` from the injected RNG.
fn draw(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u32() as f64) / (u32::MAX as f64 + 1.0)
}

/// Tuple used for the lexicographic tie-break ordering. Sorted ascending
/// except `duration`, which sorts descending: the longer of two
/// simultaneously-eligible tasks wins, matching the worked examples.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TieKey {
    primary: f64,
    /// A second ranking metric consulted strictly before the fixed
    /// arrival/duration/random tiebreak chain. `0.0` for policies with
    /// only one metric (everything but Priority-Aging, which uses this
    /// for `static_priority`).
    secondary: f64,
    is_current: u8,
    arrival_tick: u64,
    neg_duration: i64,
    random_draw: f64,
}

fn tie_key(metric: f64, secondary: f64, is_current: bool, view: &TaskView<'_>, random_draw: f64) -> TieKey {
    TieKey {
        primary: metric,
        secondary,
        is_current: if is_current { 0 } else { 1 },
        arrival_tick: view.arrival_tick,
        neg_duration: -(view.duration as i64),
        random_draw,
    }
}

fn cmp_tie(a: &TieKey, b: &TieKey) -> std::cmp::Ordering {
    a.primary
        .partial_cmp(&b.primary)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then(
            a.secondary
                .partial_cmp(&b.secondary)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
        .then(a.is_current.cmp(&b.is_current))
        .then(a.arrival_tick.cmp(&b.arrival_tick))
        .then(a.neg_duration.cmp(&b.neg_duration))
        .then(
            a.random_draw
                .partial_cmp(&b.random_draw)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
}

/// Ranks `candidates` by `metric_of`, breaking ties per the oracle in
/// SPEC_FULL.md §4.3, and returns the winner's id plus whether the final
/// random draw was actually needed to separate the top two.
pub fn resolve<'a>(
    candidates: &[TaskView<'a>],
    current_id: Option<&str>,
    metric_of: impl Fn(&TaskView<'a>) -> f64,
    rng: &mut dyn RngCore,
) -> Option<(TaskView<'a>, bool)> {
    resolve_secondary(candidates, current_id, metric_of, |_| 0.0, rng)
}

/// Like [`resolve`], but with an explicit second ranking metric
/// (`secondary_of`) consulted before the fixed arrival/duration/random
/// tiebreak chain -- used by [`PriorityAging`] to rank by
/// `(-dynamic_priority, -static_priority)` without packing both into a
/// single lossy float.
pub fn resolve_secondary<'a>(
    candidates: &[TaskView<'a>],
    current_id: Option<&str>,
    metric_of: impl Fn(&TaskView<'a>) -> f64,
    secondary_of: impl Fn(&TaskView<'a>) -> f64,
    rng: &mut dyn RngCore,
) -> Option<(TaskView<'a>, bool)> {
    if candidates.is_empty() {
        return None;
    }
    let mut keyed: Vec<(TieKey, TaskView<'a>)> = candidates
        .iter()
        .map(|c| {
            let is_current = current_id == Some(c.id);
            let m = metric_of(c);
            let s = secondary_of(c);
            (tie_key(m, s, is_current, c, draw(rng)), *c)
        })
        .collect();
    keyed.sort_by(|a, b| cmp_tie(&a.0, &b.0));

    let lottery_used = if keyed.len() >= 2 {
        let (a, b) = (&keyed[0].0, &keyed[1].0);
        a.primary == b.primary
            && a.secondary == b.secondary
            && a.is_current == b.is_current
            && a.arrival_tick == b.arrival_tick
            && a.neg_duration == b.neg_duration
    } else {
        false
    };
    Some((keyed[0].1, lottery_used))
}

/// Unions `ready` with `current` (if it is eligible to compete), used by
/// the preemptive policies.
fn with_current<'a>(ready: &[TaskView<'a>], current: Option<TaskView<'a>>) -> Vec<TaskView<'a>> {
    let mut all = ready.to_vec();
    if let Some(c) = current {
        all.push(c);
    }
    all
}

/// First-in-first-out: keeps running `current` until it blocks or
/// terminates, otherwise dispatches the earliest (tie-broken) arrival.
pub struct Fifo;

impl Policy for Fifo {
    fn decide(
        &self,
        ready: &[TaskView<'_>],
        current: Option<TaskView<'_>>,
        _quantum_expired: bool,
        rng: &mut dyn RngCore,
    ) -> Decision {
        if let Some(c) = current {
            return Decision {
                next: Some(c.id.to_string()),
                lottery_used: false,
            };
        }
        match resolve(ready, None, |t| t.arrival_tick as f64, rng) {
            Some((winner, lottery_used)) => Decision {
                next: Some(winner.id.to_string()),
                lottery_used,
            },
            None => Decision {
                next: None,
                lottery_used: false,
            },
        }
    }
}

/// Round-robin with a fixed quantum: preempts `current` only once its
/// quantum has expired, and only if another ready candidate exists.
pub struct RoundRobin;

impl Policy for RoundRobin {
    fn uses_quantum(&self) -> bool {
        true
    }

    fn decide(
        &self,
        ready: &[TaskView<'_>],
        current: Option<TaskView<'_>>,
        quantum_expired: bool,
        rng: &mut dyn RngCore,
    ) -> Decision {
        if let Some(c) = current {
            if !quantum_expired {
                return Decision {
                    next: Some(c.id.to_string()),
                    lottery_used: false,
                };
            }
        }
        match resolve(ready, None, |t| t.arrival_tick as f64, rng) {
            Some((winner, lottery_used)) => Decision {
                next: Some(winner.id.to_string()),
                lottery_used,
            },
            None => Decision {
                // No other candidate: keep the current task running rather
                // than forcing the CPU idle.
                next: current.map(|c| c.id.to_string()),
                lottery_used: false,
            },
        }
    }
}

/// Shortest-remaining-time-first: always re-evaluates over ready ∪
/// current, preempting whenever a strictly shorter remaining job exists.
pub struct Srtf;

impl Policy for Srtf {
    fn decide(
        &self,
        ready: &[TaskView<'_>],
        current: Option<TaskView<'_>>,
        _quantum_expired: bool,
        rng: &mut dyn RngCore,
    ) -> Decision {
        let all = with_current(ready, current);
        let current_id = current.map(|c| c.id);
        match resolve(
            &all,
            current_id,
            |t| (t.duration - t.executed_ticks) as f64,
            rng,
        ) {
            Some((winner, lottery_used)) => Decision {
                next: Some(winner.id.to_string()),
                lottery_used,
            },
            None => Decision {
                next: None,
                lottery_used: false,
            },
        }
    }
}

/// Fixed preemptive priority: highest `dynamic_priority` always runs.
pub struct PreemptivePriority;

impl Policy for PreemptivePriority {
    fn decide(
        &self,
        ready: &[TaskView<'_>],
        current: Option<TaskView<'_>>,
        _quantum_expired: bool,
        rng: &mut dyn RngCore,
    ) -> Decision {
        let all = with_current(ready, current);
        let current_id = current.map(|c| c.id);
        match resolve(&all, current_id, |t| -t.dynamic_priority as f64, rng) {
            Some((winner, lottery_used)) => Decision {
                next: Some(winner.id.to_string()),
                lottery_used,
            },
            None => Decision {
                next: None,
                lottery_used: false,
            },
        }
    }
}

/// Preemptive priority with per-tick aging applied to waiting tasks by the
/// engine; the winner's dynamic priority is reset to static on dispatch.
pub struct PriorityAging {
    pub alpha: i64,
}

impl Policy for PriorityAging {
    fn aging_alpha(&self) -> Option<i64> {
        Some(self.alpha)
    }

    fn decide(
        &self,
        ready: &[TaskView<'_>],
        current: Option<TaskView<'_>>,
        _quantum_expired: bool,
        rng: &mut dyn RngCore,
    ) -> Decision {
        let all = with_current(ready, current);
        let current_id = current.map(|c| c.id);
        match resolve_secondary(
            &all,
            current_id,
            |t| -t.dynamic_priority as f64,
            |t| -t.static_priority as f64,
            rng,
        ) {
            Some((winner, lottery_used)) => Decision {
                next: Some(winner.id.to_string()),
                lottery_used,
            },
            None => Decision {
                next: None,
                lottery_used: false,
            },
        }
    }
}

/// Identifies which built-in policy a config line selected, for use by
/// the engine constructor that also needs to know about quantum/alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Fifo,
    RoundRobin,
    Srtf,
    PreemptivePriority,
    PriorityAging,
}

impl PolicyKind {
    pub fn build(self, alpha: i64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Fifo => Box::new(Fifo),
            PolicyKind::RoundRobin => Box::new(RoundRobin),
            PolicyKind::Srtf => Box::new(Srtf),
            PolicyKind::PreemptivePriority => Box::new(PreemptivePriority),
            PolicyKind::PriorityAging => Box::new(PriorityAging { alpha }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn view<'a>(id: &'a str, arrival: u64, duration: u64, executed: u64, prio: i64) -> TaskView<'a> {
        TaskView {
            id,
            arrival_tick: arrival,
            duration,
            executed_ticks: executed,
            static_priority: prio,
            dynamic_priority: prio,
        }
    }

    #[test]
    fn fifo_keeps_running_current() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = Fifo;
        let current = view("T1", 0, 3, 1, 0);
        let d = p.decide(&[], Some(current), false, &mut rng);
        assert_eq!(d.next.as_deref(), Some("T1"));
        assert!(!d.lottery_used);
    }

    #[test]
    fn fifo_duration_tiebreak_favors_longer_job() {
        let mut rng = StdRng::seed_from_u64(7);
        let p = Fifo;
        let t1 = view("T1", 0, 3, 0, 0);
        let t2 = view("T2", 0, 2, 0, 0);
        let d = p.decide(&[t1, t2], None, false, &mut rng);
        assert_eq!(d.next.as_deref(), Some("T1"), "longer duration wins a same-arrival tie");
    }

    #[test]
    fn round_robin_preempts_only_on_quantum_expiry_with_candidate() {
        let mut rng = StdRng::seed_from_u64(2);
        let p = RoundRobin;
        let current = view("T1", 0, 4, 2, 0);
        let other = view("T2", 0, 3, 0, 0);
        let not_expired = p.decide(&[other], Some(current), false, &mut rng);
        assert_eq!(not_expired.next.as_deref(), Some("T1"));
        let expired = p.decide(&[other], Some(current), true, &mut rng);
        assert_eq!(expired.next.as_deref(), Some("T2"));
    }

    #[test]
    fn round_robin_keeps_current_when_no_other_candidate_at_expiry() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = RoundRobin;
        let current = view("T1", 0, 4, 2, 0);
        let d = p.decide(&[], Some(current), true, &mut rng);
        assert_eq!(d.next.as_deref(), Some("T1"));
    }

    #[test]
    fn srtf_prefers_shortest_remaining() {
        let mut rng = StdRng::seed_from_u64(4);
        let p = Srtf;
        let current = view("T1", 0, 5, 3, 0);
        let other = view("T2", 2, 2, 0, 0);
        let d = p.decide(&[other], Some(current), false, &mut rng);
        assert_eq!(d.next.as_deref(), Some("T2"), "2 remaining ticks beats T1's 2 too -- tie broken by arrival");
    }

    #[test]
    fn preemptive_priority_prefers_higher_dynamic_priority() {
        let mut rng = StdRng::seed_from_u64(5);
        let p = PreemptivePriority;
        let current = view("T1", 0, 5, 1, 1);
        let other = view("T2", 0, 5, 0, 9);
        let d = p.decide(&[other], Some(current), false, &mut rng);
        assert_eq!(d.next.as_deref(), Some("T2"));
    }

    #[test]
    fn priority_aging_prefers_higher_dynamic_priority() {
        let mut rng = StdRng::seed_from_u64(8);
        let p = PriorityAging { alpha: 1 };
        let current = view("T_hi", 0, 5, 1, 5);
        let other = view("T_lo", 0, 5, 0, 9);
        let d = p.decide(&[other], Some(current), false, &mut rng);
        assert_eq!(d.next.as_deref(), Some("T_lo"), "higher dynamic priority wins regardless of static priority");
    }

    #[test]
    fn priority_aging_breaks_dynamic_tie_by_higher_static_priority() {
        let mut rng = StdRng::seed_from_u64(9);
        let p = PriorityAging { alpha: 1 };
        let current = view("T1", 0, 5, 1, 5);
        let mut other = view("T2", 0, 5, 0, 5);
        other.static_priority = 9;
        let d = p.decide(&[other], Some(current), false, &mut rng);
        assert_eq!(
            d.next.as_deref(),
            Some("T2"),
            "equal dynamic priority must fall through to static priority, not arrival order"
        );
    }

    #[test]
    fn priority_aging_dynamic_priority_dominates_static_at_large_magnitude() {
        // Regression test: an earlier implementation packed
        // (-dynamic_priority, -static_priority) into one f64 via a
        // `static_priority / 1e6` nudge, which a static-priority spread
        // this large would have overflowed into the dynamic component,
        // letting the lower-dynamic-priority task win.
        let mut rng = StdRng::seed_from_u64(10);
        let p = PriorityAging { alpha: 1 };
        let mut t_hi = view("T_hi", 0, 5, 0, 10);
        t_hi.static_priority = 10;
        let mut t_lo = view("T_lo", 0, 5, 0, 9);
        t_lo.static_priority = 2_000_000;
        let d = p.decide(&[t_hi, t_lo], None, false, &mut rng);
        assert_eq!(
            d.next.as_deref(),
            Some("T_hi"),
            "higher dynamic priority must win no matter how large the static priority spread is"
        );
    }

    #[test]
    fn resolve_returns_none_for_empty_candidates() {
        let mut rng = StdRng::seed_from_u64(6);
        let empty: Vec<TaskView<'_>> = Vec::new();
        assert!(resolve(&empty, None, |_| 0.0, &mut rng).is_none());
    }
}
