//! Metrics collection.
//!
//! # Metrics
//! - `wallet_session_transitions_total` (counter): state entered, by `state`
//! - `wallet_chain_suggestions_total` (counter): by `outcome`
//! - `contract_queries_total` (counter): by `outcome`
//! - `contract_executes_total` (counter): by `kind`, `outcome`
//! - `lcd_requests_total` (counter): by `outcome`
//!
//! Recorded through the `metrics` facade; the host decides whether a
//! recorder is installed.

use ::metrics::counter;

pub fn record_session_transition(state: &'static str) {
    counter!("wallet_session_transitions_total", "state" => state).increment(1);
}

pub fn record_chain_suggestion(outcome: &'static str) {
    counter!("wallet_chain_suggestions_total", "outcome" => outcome).increment(1);
}

pub fn record_query(outcome: &'static str) {
    counter!("contract_queries_total", "outcome" => outcome).increment(1);
}

pub fn record_execute(kind: &'static str, outcome: &'static str) {
    counter!("contract_executes_total", "kind" => kind, "outcome" => outcome).increment(1);
}

pub fn record_lcd_request(outcome: &'static str) {
    counter!("lcd_requests_total", "outcome" => outcome).increment(1);
}
