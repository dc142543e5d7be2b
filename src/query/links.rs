// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Resolution of free-text call expressions to dataset keys.
//!
//! Call expressions come straight from function bodies (`uc.cartService.GetCart`), so they rarely
//! equal a key. A query matches a record when, for any of the record's candidate patterns
//! (short name, `Receiver.Name`, full key), the two are equal or either contains the other.
//!
//! The first matching record in dataset order wins. Short names shared by several records are a
//! known source of wrong hits (`ValidateCreateOrder` contains `CreateOrder`); use
//! [`LinkResolver::candidates`] to surface every match when that matters.

use std::fmt;

use crate::model::{Dataset, FunctionKey, FunctionRecord};

const SUGGESTION_MIN_RATIO: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedLink {
    pub query: String,
}

impl fmt::Display for UnresolvedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no documented function matches {:?}", self.query)
    }
}

impl std::error::Error for UnresolvedLink {}

#[derive(Debug, Clone, Copy)]
pub struct LinkResolver<'a> {
    dataset: &'a Dataset,
}

impl<'a> LinkResolver<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Forward resolution: the first record (dataset order) matched by `query`.
    pub fn resolve(&self, query: &str) -> Result<&'a FunctionKey, UnresolvedLink> {
        let query = query.trim();
        self.dataset
            .iter()
            .find(|record| record_matches(record, query))
            .map(FunctionRecord::key)
            .ok_or_else(|| UnresolvedLink { query: query.to_owned() })
    }

    /// Every record matched by `query`, in dataset order.
    pub fn candidates(&self, query: &str) -> Vec<&'a FunctionKey> {
        let query = query.trim();
        self.dataset
            .iter()
            .filter(|record| record_matches(record, query))
            .map(FunctionRecord::key)
            .collect()
    }

    /// Reverse resolution: records whose call list references `target` under the same rule.
    ///
    /// Scans every call of every record; cost grows with records × calls.
    pub fn find_callers(&self, target: &str) -> Vec<&'a FunctionKey> {
        let Some(target) = self.dataset.get(target) else {
            return Vec::new();
        };
        let patterns = target.candidate_patterns();

        self.dataset
            .iter()
            .filter(|record| {
                record.called_functions().iter().any(|call| {
                    let call = call.trim();
                    !call.is_empty()
                        && patterns.iter().any(|pattern| loosely_matches(call, pattern))
                })
            })
            .map(FunctionRecord::key)
            .collect()
    }

    /// Closest display name by normalized similarity, for "did you mean" hints.
    pub fn suggest(&self, query: &str) -> Option<&'a FunctionRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let mut best: Option<(f64, &'a FunctionRecord)> = None;
        for record in self.dataset.iter() {
            let haystack = record.display_name().to_lowercase();
            let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
            if ratio < SUGGESTION_MIN_RATIO {
                continue;
            }
            if best.map_or(true, |(best_ratio, _)| ratio > best_ratio) {
                best = Some((ratio, record));
            }
        }
        best.map(|(_, record)| record)
    }
}

fn record_matches(record: &FunctionRecord, query: &str) -> bool {
    !query.is_empty()
        && record.candidate_patterns().iter().any(|pattern| loosely_matches(query, pattern))
}

/// Equality or containment in either direction.
pub(crate) fn loosely_matches(query: &str, pattern: &str) -> bool {
    !pattern.is_empty() && (query == pattern || query.contains(pattern) || pattern.contains(query))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{loosely_matches, LinkResolver, UnresolvedLink};
    use crate::model::fixtures::cart_service_dataset;
    use crate::model::{Dataset, FunctionKey, FunctionRecord};

    fn record(key: &str, receiver: Option<&str>, name: &str, calls: &[&str]) -> FunctionRecord {
        FunctionRecord::new(FunctionKey::new(key).expect("key"), name, "pkg", "pkg/file.go")
            .with_receiver_type(receiver)
            .with_called_functions(calls.iter().copied())
    }

    #[test]
    fn resolves_receiver_qualified_call() {
        let dataset = Dataset::from_records([
            record("service.PricingService.Calculate", Some("PricingService"), "Calculate", &[]),
            record("service.CartService.GetCart", Some("CartService"), "GetCart", &[]),
        ])
        .expect("dataset");
        let resolver = LinkResolver::new(&dataset);

        assert_eq!(
            resolver.resolve("CartService.GetCart").map(FunctionKey::as_str),
            Ok("service.CartService.GetCart")
        );
    }

    #[test]
    fn unmatched_call_is_recoverable() {
        let dataset = cart_service_dataset();
        let resolver = LinkResolver::new(&dataset);

        assert_eq!(
            resolver.resolve("foo.Bar"),
            Err(UnresolvedLink { query: "foo.Bar".to_owned() })
        );
    }

    #[rstest]
    #[case::call_contains_short_name("uc.cartService.GetCart", "service.CartService.GetCart")]
    #[case::call_contains_short_name_2("cart.IsEmpty", "entity.Cart.IsEmpty")]
    #[case::exact_key("service.CartService.ClearCart", "service.CartService.ClearCart")]
    #[case::pattern_contains_query("CartService.Clear", "service.CartService.ClearCart")]
    #[case::surrounding_whitespace(
        "  uc.inventoryService.ReserveStock ",
        "service.InventoryService.ReserveStock"
    )]
    fn forward_resolution(#[case] query: &str, #[case] expected: &str) {
        let dataset = cart_service_dataset();
        let resolver = LinkResolver::new(&dataset);
        assert_eq!(resolver.resolve(query).map(FunctionKey::as_str), Ok(expected));
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    #[case::repository_call("s.cartRepo.GetByID")]
    #[case::stdlib_call("time.Now")]
    fn forward_resolution_fails(#[case] query: &str) {
        let dataset = cart_service_dataset();
        assert!(LinkResolver::new(&dataset).resolve(query).is_err());
    }

    #[test]
    fn first_match_in_dataset_order_wins_for_ambiguous_names() {
        let dataset = Dataset::from_records([
            record(
                "usecase.OrderCreateUseCase.CreateOrder",
                Some("OrderCreateUseCase"),
                "CreateOrder",
                &[],
            ),
            record(
                "validator.OrderValidator.ValidateCreateOrder",
                Some("OrderValidator"),
                "ValidateCreateOrder",
                &[],
            ),
        ])
        .expect("dataset");
        let resolver = LinkResolver::new(&dataset);

        assert_eq!(
            resolver.resolve("uc.orderValidator.ValidateCreateOrder").map(FunctionKey::as_str),
            Ok("usecase.OrderCreateUseCase.CreateOrder")
        );
        let candidates = resolver
            .candidates("uc.orderValidator.ValidateCreateOrder")
            .into_iter()
            .map(FunctionKey::as_str)
            .collect::<Vec<_>>();
        assert_eq!(
            candidates,
            vec![
                "usecase.OrderCreateUseCase.CreateOrder",
                "validator.OrderValidator.ValidateCreateOrder"
            ]
        );
    }

    #[test]
    fn finds_callers_through_loose_call_expressions() {
        let dataset = cart_service_dataset();
        let resolver = LinkResolver::new(&dataset);

        let callers = |key: &str| {
            resolver.find_callers(key).into_iter().map(FunctionKey::as_str).collect::<Vec<_>>()
        };
        assert_eq!(
            callers("service.CartService.GetCart"),
            vec!["usecase.OrderCreateUseCase.CreateOrder"]
        );
        assert_eq!(callers("entity.Cart.IsEmpty"), vec!["service.CartService.GetCart"]);
        assert!(callers("usecase.OrderCreateUseCase.CreateOrder").is_empty());
        assert!(callers("missing.Key").is_empty());
    }

    #[test]
    fn empty_call_entries_never_match() {
        let dataset = Dataset::from_records([
            record("a.Target", None, "Target", &[]),
            record("a.Caller", None, "Caller", &["", "  "]),
        ])
        .expect("dataset");

        assert!(LinkResolver::new(&dataset).find_callers("a.Target").is_empty());
    }

    #[test]
    fn recursive_functions_are_their_own_callers() {
        let dataset =
            Dataset::from_records([record("a.Walk", None, "Walk", &["Walk"])]).expect("dataset");
        let callers = LinkResolver::new(&dataset).find_callers("a.Walk");
        assert_eq!(callers.len(), 1);
    }

    #[test]
    fn suggests_close_display_names() {
        let dataset = cart_service_dataset();
        let resolver = LinkResolver::new(&dataset);

        let suggestion =
            resolver.suggest("CartService.GetCrat").map(|record| record.key().as_str());
        assert_eq!(suggestion, Some("service.CartService.GetCart"));
        assert!(resolver.suggest("zzzzzzzz").is_none());
        assert!(resolver.suggest("").is_none());
    }

    #[test]
    fn loose_match_is_symmetric_containment() {
        assert!(loosely_matches("x.GetCart", "GetCart"));
        assert!(loosely_matches("GetCart", "service.CartService.GetCart"));
        assert!(!loosely_matches("GetCart", "ClearCart"));
        assert!(!loosely_matches("GetCart", ""));
    }
}
