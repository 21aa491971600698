//! # tickctl — deterministic tick-driven scheduler simulator
//!
//! A single-CPU discrete-time scheduler simulator. A static (and
//! optionally dynamically grown) workload of tasks is driven forward one
//! logical tick at a time; a pluggable [`policy::Policy`] decides who runs
//! next, a mutex manager applies priority inheritance on contention, an
//! I/O manager blocks and releases tasks on a countdown, and four
//! parallel timeline logs record enough detail to reconstruct a Gantt
//! chart after the fact.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                     Host / CLI demo                      │
//! ├────────────────────────────────────────────────────────┤
//! │                 Engine API (engine.rs)                   │
//! │        new() · tick() · undo() · insert_task()           │
//! ├──────────────┬────────────────────┬───────────────────┤
//! │  Tick Engine │   Policy Interface │  Config Loader    │
//! │  engine.rs   │   policy.rs        │  config.rs        │
//! │  ─ 9-step    │   ─ Fifo/RR/SRTF   │  ─ text format    │
//! │    pipeline  │   ─ Priority(+Aging)│  ─ ConfigError    │
//! │  ─ mutex mgr │   ─ tie-break oracle│                   │
//! │  ─ I/O mgr   │                    │                   │
//! ├──────────────┴────────────────────┴───────────────────┤
//! │              Task Model (task.rs)                       │
//! │    TaskRecord · TaskState · Action · TaskSpec           │
//! ├────────────────────────────────────────────────────────┤
//! │         Timeline Logs (timeline.rs) · Debug Projector   │
//! │         (debug.rs)                                       │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tie-break oracle
//!
//! Every built-in policy that needs to choose among several equally
//! eligible candidates defers to the same procedure: candidates are
//! ordered by `(primary_metric, is_current, arrival_tick, -duration,
//! random_draw)` ascending, with the final `random_draw` only ever
//! breaking a genuine tie on every preceding field. When it does, the
//! decision records `lottery_used = true` so the timeline can surface it.
//!
//! ## Determinism
//!
//! The only source of non-determinism anywhere in the engine is that
//! final random draw. The RNG is always supplied by the caller
//! (`Box<dyn rand::RngCore>`), so a seeded source makes every run,
//! including the tie-break lottery, fully reproducible.
//!
//! ## Snapshotting
//!
//! [`engine::Engine::tick`] pushes a structural clone of its state onto an
//! internal history stack before doing any work; [`engine::Engine::undo`]
//! pops and restores it. The history stack itself, the policy, and the RNG
//! are never part of the snapshot, so undo is O(1) amortized per tick and
//! never recurses into its own history.

pub mod config;
pub mod debug;
pub mod engine;
pub mod error;
pub mod policy;
pub mod task;
pub mod timeline;
