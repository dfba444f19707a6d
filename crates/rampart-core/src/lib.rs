//! Configuration model and change-management logic for the rampart
//! control plane.
//!
//! This crate owns everything between the HTTP surface (`rampart`) and
//! the privileged daemon client (`rampart-rpc`):
//!
//! - **Domain model** ([`model`]) — The declarative configuration
//!   schema: interfaces, zones, policies and their ordered rules, NAT,
//!   routes, IP sets, and per-interface protections.
//!
//! - **[`StagedStore`]** — The operator's in-progress configuration.
//!   Every mutation is validated on a clone before it touches the live
//!   staged document, so readers never observe an invalid state.
//!
//! - **Validation** ([`validate`]) — Whole-document semantic checks
//!   producing field-addressed findings; only `Error`-severity findings
//!   block a change, warnings ride along.
//!
//! - **Synthesis** ([`synthesis`]) — Implicit accept rules derived from
//!   zone service and management settings, merged into the operator's
//!   policies for display and simulation.
//!
//! - **Evaluation** ([`evaluate`]) — First-match-wins packet verdict
//!   simulation over the merged policy view, with a rule-by-rule trace.
//!
//! - **[`ApplyEngine`]** — The backup / apply / probe / commit-or-roll-
//!   back sequence against `rampartd`, serialized so runs never overlap.

pub mod apply;
pub mod diff;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod reorder;
pub mod resolver;
pub mod store;
pub mod synthesis;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use apply::{ApplyEngine, ApplyReport, DEFAULT_PING_TIMEOUT_SECS};
pub use error::Error;
pub use evaluate::{PacketQuery, Verdict, evaluate};
pub use model::Config;
pub use reorder::{Position, ReorderSpec, reorder_policies, reorder_rules};
pub use resolver::resolve_zone;
pub use store::{ChangeEvent, StagedStore};
pub use synthesis::{SyntheticRule, SyntheticRuleId, merged_policies, synthesize_implicit_rules};
pub use validate::{Severity, ValidationError, ValidationErrors};
