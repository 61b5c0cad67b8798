// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder (Prometheus, statsd, etc.)
//! can collect these metrics. Without an installed recorder every call is a
//! no-op.

use metrics::describe_counter;

/// Register all Bazaar metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!("bazaar_listings_created_total", "Listings created");
    describe_counter!(
        "bazaar_purchases_total",
        "Purchase attempts by outcome (success, already_sold, self_purchase)"
    );
    describe_counter!("bazaar_likes_toggled_total", "Like toggles by resulting state");
    describe_counter!("bazaar_messages_sent_total", "Direct messages sent");
    describe_counter!(
        "bazaar_ai_generations_total",
        "AI description generations by input kind"
    );
}

/// Outcome label of a purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Success,
    AlreadySold,
    SelfPurchase,
}

impl PurchaseOutcome {
    fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::AlreadySold => "already_sold",
            Self::SelfPurchase => "self_purchase",
        }
    }
}

pub fn record_listing_created() {
    metrics::counter!("bazaar_listings_created_total").increment(1);
}

/// Record a purchase attempt that reached a decision.
pub fn record_purchase(outcome: PurchaseOutcome) {
    metrics::counter!("bazaar_purchases_total", "outcome" => outcome.as_str()).increment(1);
}

/// Record a like toggle; `liked` is the state after the toggle.
pub fn record_like_toggled(liked: bool) {
    let state = if liked { "on" } else { "off" };
    metrics::counter!("bazaar_likes_toggled_total", "state" => state).increment(1);
}

pub fn record_message_sent() {
    metrics::counter!("bazaar_messages_sent_total").increment(1);
}

/// Record a successful AI generation. `kind` is `text` or `image`.
pub fn record_ai_generation(kind: &'static str) {
    metrics::counter!("bazaar_ai_generations_total", "kind" => kind).increment(1);
}
