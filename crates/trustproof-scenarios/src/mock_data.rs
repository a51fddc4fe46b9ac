//! Simulated payout and agent tool-call data for the reference scenarios.
//!
//! All data in this module is hardcoded and fictional.  It stands in for the
//! payment service and tool runtime a real deployment would record proofs
//! for.

use serde_json::{json, Value};

use trustproof_contracts::claims::{Decision, Policy, Subject};

/// Payouts above this amount (in cents) need a step-up approval.
pub const STEP_UP_THRESHOLD_CENTS: u64 = 500_000;

/// Merchants the payout policy refuses outright.
const BLOCKED_MERCHANTS: [&str; 1] = ["m_blocked"];

// ── Shared actors ─────────────────────────────────────────────────────────────

pub fn payments_agent() -> Subject {
    Subject {
        kind: "agent".to_string(),
        id: "agent_payments_01".to_string(),
    }
}

pub fn payout_policy() -> Policy {
    let constraints = json!({
        "max_amount_usd": STEP_UP_THRESHOLD_CENTS / 100,
        "currency": "USD",
        "blocked_merchants": BLOCKED_MERCHANTS,
    });
    Policy {
        policy_v: "v0".to_string(),
        scopes: vec!["payout:create".to_string(), "payout:read".to_string()],
        constraints: constraints.as_object().cloned().unwrap_or_default(),
    }
}

pub fn tool_policy() -> Policy {
    Policy {
        policy_v: "v0".to_string(),
        scopes: vec!["tool:payout_quote".to_string(), "tool:payout_initiate".to_string()],
        constraints: serde_json::Map::new(),
    }
}

// ── Payout service (mock) ─────────────────────────────────────────────────────

/// One payout request and the policy outcome recorded for it.
#[derive(Debug, Clone)]
pub struct PayoutCase {
    pub name: &'static str,
    pub resource_id: &'static str,
    pub amount_cents: u64,
    pub merchant: &'static str,
    pub timestamp: &'static str,
    pub jti: &'static str,
}

impl PayoutCase {
    /// Request payload as the payout service received it.
    pub fn input(&self) -> Value {
        json!({
            "amount": format_amount(self.amount_cents),
            "currency": "USD",
            "merchant_id": self.merchant,
        })
    }

    /// Policy decision and the reason codes behind it.
    pub fn evaluate(&self) -> (Decision, Vec<String>) {
        if BLOCKED_MERCHANTS.contains(&self.merchant) {
            (Decision::Deny, vec!["merchant_blocked".to_string()])
        } else if self.amount_cents > STEP_UP_THRESHOLD_CENTS {
            (Decision::StepUp, vec!["amount_over_threshold".to_string()])
        } else {
            (Decision::Allow, vec!["within_limit".to_string()])
        }
    }

    /// Response payload the payout service returned.
    pub fn output(&self) -> Value {
        let status = match self.evaluate().0 {
            Decision::Allow => "queued",
            Decision::Deny => "rejected",
            Decision::StepUp => "pending_step_up",
        };
        json!({ "status": status, "payout_id": self.resource_id })
    }
}

pub fn payout_cases() -> Vec<PayoutCase> {
    vec![
        PayoutCase {
            name: "payout_allow",
            resource_id: "po_demo_1",
            amount_cents: 2_500,
            merchant: "m_alpha",
            timestamp: "2026-02-24T12:00:00Z",
            jti: "demo_payout_allow",
        },
        PayoutCase {
            name: "payout_stepup",
            resource_id: "po_demo_2",
            amount_cents: 750_000,
            merchant: "m_alpha",
            timestamp: "2026-02-24T12:00:10Z",
            jti: "demo_payout_stepup",
        },
    ]
}

/// The step-up approval that follows `payout_stepup`.
pub fn step_up_approval() -> (Value, Value) {
    (
        json!({ "step_up_for_jti": "demo_payout_stepup", "factor": "mfa" }),
        json!({ "status": "approved", "approved_by": "user_001" }),
    )
}

fn format_amount(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

// ── Tool runtime (mock) ───────────────────────────────────────────────────────

/// One simulated tool invocation by an agent.
#[derive(Debug, Clone)]
pub struct ToolAction {
    pub name: &'static str,
    pub tool_name: &'static str,
    pub input: Value,
    pub output: Value,
    pub timestamp: &'static str,
    pub jti: &'static str,
}

pub fn tool_actions() -> Vec<ToolAction> {
    vec![
        ToolAction {
            name: "agent_tool_quote",
            tool_name: "payout_quote",
            input: json!({ "amount": "120.00", "currency": "USD", "merchant_id": "m_beta" }),
            output: json!({ "fee": "1.20", "eta_minutes": 15 }),
            timestamp: "2026-02-24T12:01:00Z",
            jti: "demo_agent_tool_quote",
        },
        ToolAction {
            name: "agent_tool_initiate",
            tool_name: "payout_initiate",
            input: json!({ "amount": "120.00", "currency": "USD", "merchant_id": "m_beta", "quote_fee": "1.20" }),
            output: json!({ "status": "queued", "payout_id": "po_demo_3" }),
            timestamp: "2026-02-24T12:01:05Z",
            jti: "demo_agent_tool_initiate",
        },
    ]
}
