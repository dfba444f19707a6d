// ── Policy and rule reordering ──

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::Policy;

/// Where a relative move lands with respect to its anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Before,
    After,
}

/// One reorder request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderSpec {
    /// Complete new canonical order. Identifiers that name nothing in
    /// the live set are silently dropped; live entries missing from
    /// the list fall out of the result.
    Wholesale(Vec<String>),
    /// Move `target` before or after `anchor`. Both must resolve or
    /// the call fails.
    Relative {
        target: String,
        position: Position,
        anchor: String,
    },
}

/// Reorder the policy list in place.
pub fn reorder_policies(policies: &mut Vec<Policy>, spec: &ReorderSpec) -> Result<(), Error> {
    match spec {
        ReorderSpec::Wholesale(order) => {
            wholesale(policies, order, |p, name| p.matches_identity(name));
            Ok(())
        }
        ReorderSpec::Relative {
            target,
            position,
            anchor,
        } => relative_move(
            policies,
            target,
            *position,
            anchor,
            |p, name| p.matches_identity(name),
            "policy",
        ),
    }
}

/// Reorder the rules of one policy in place.
pub fn reorder_rules(policy: &mut Policy, spec: &ReorderSpec) -> Result<(), Error> {
    match spec {
        ReorderSpec::Wholesale(order) => {
            wholesale(&mut policy.rules, order, |r, name| r.matches_identity(name));
            Ok(())
        }
        ReorderSpec::Relative {
            target,
            position,
            anchor,
        } => relative_move(
            &mut policy.rules,
            target,
            *position,
            anchor,
            |r, name| r.matches_identity(name),
            "rule",
        ),
    }
}

fn wholesale<T>(items: &mut Vec<T>, order: &[String], matches: impl Fn(&T, &str) -> bool) {
    let mut remaining: Vec<Option<T>> = items.drain(..).map(Some).collect();
    let mut reordered = Vec::with_capacity(order.len());
    for name in order {
        let slot = remaining
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|item| matches(item, name)));
        if let Some(slot) = slot {
            if let Some(item) = slot.take() {
                reordered.push(item);
            }
        }
    }
    *items = reordered;
}

fn relative_move<T>(
    items: &mut Vec<T>,
    target: &str,
    position: Position,
    anchor: &str,
    matches: impl Fn(&T, &str) -> bool,
    kind: &'static str,
) -> Result<(), Error> {
    let move_idx = items
        .iter()
        .position(|item| matches(item, target))
        .ok_or_else(|| Error::not_found(kind, target))?;
    let mut anchor_idx = items
        .iter()
        .position(|item| matches(item, anchor))
        .ok_or_else(|| Error::not_found(kind, anchor))?;

    let item = items.remove(move_idx);
    // The removal shifted everything after the moved entry left by
    // one; keep the anchor pointing at the same element.
    if move_idx < anchor_idx {
        anchor_idx -= 1;
    }
    let insert_idx = match position {
        Position::Before => anchor_idx,
        Position::After => anchor_idx + 1,
    };
    items.insert(insert_idx.min(items.len()), item);
    Ok(())
}
