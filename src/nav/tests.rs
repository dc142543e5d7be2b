// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::{
    Breadcrumb, Effect, FragmentChannel, MemoryFragment, NavError, NavState, Navigator,
    RenderTicket, Severity, Zoom, ZOOM_MAX, ZOOM_MIN,
};
use crate::model::fixtures::cart_service_dataset;

const CREATE_ORDER: &str = "usecase.OrderCreateUseCase.CreateOrder";
const GET_CART: &str = "service.CartService.GetCart";
const CLEAR_CART: &str = "service.CartService.ClearCart";
const IS_EMPTY: &str = "entity.Cart.IsEmpty";

#[fixture]
fn nav() -> Navigator {
    Navigator::in_memory(Arc::new(cart_service_dataset()))
}

fn current(nav: &Navigator) -> Option<&str> {
    nav.current().map(|key| key.as_str())
}

fn last_ticket(nav: &mut Navigator) -> RenderTicket {
    nav.drain_effects()
        .into_iter()
        .rev()
        .find_map(|effect| match effect {
            Effect::RenderRequested(request) => Some(request.ticket),
            _ => None,
        })
        .expect("render requested")
}

fn notices(effects: &[Effect]) -> Vec<(Severity, &str)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Notice(notice) => Some((notice.severity, notice.message.as_str())),
            _ => None,
        })
        .collect()
}

#[rstest]
fn select_sets_current_and_stack_top_for_every_key(mut nav: Navigator) {
    let keys = nav.dataset().keys().map(|key| key.as_str().to_owned()).collect::<Vec<_>>();
    for key in keys {
        nav.select(&key, true).expect("select");
        assert_eq!(current(&nav), Some(key.as_str()));
        assert_eq!(nav.history().top().map(|entry| entry.key().as_str()), Some(key.as_str()));
        assert_eq!(nav.state(), NavState::Viewing(nav.current().expect("current")));
    }
}

#[rstest]
fn select_emits_one_render_request_and_panels(mut nav: Navigator) {
    nav.select(CREATE_ORDER, true).expect("select");
    let effects = nav.drain_effects();

    let renders =
        effects.iter().filter(|effect| matches!(effect, Effect::RenderRequested(_))).count();
    assert_eq!(renders, 1);
    assert!(effects.iter().any(|effect| matches!(
        effect,
        Effect::InfoPanel(panel) if panel.title == "OrderCreateUseCase.CreateOrder"
            && panel.package_name == "usecase"
    )));
    assert!(effects.contains(&Effect::Breadcrumb(Breadcrumb::Function {
        package_name: "usecase".to_owned(),
        display_name: "OrderCreateUseCase.CreateOrder".to_owned(),
    })));

    let relations = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::CallRelations(relations) => Some(relations),
            _ => None,
        })
        .expect("call relations");
    let callees = relations
        .callees
        .iter()
        .map(|callee| {
            (callee.expression.as_str(), callee.resolved.as_ref().map(|key| key.as_str()))
        })
        .collect::<Vec<_>>();
    assert_eq!(
        callees,
        vec![
            ("uc.cartService.GetCart", Some(GET_CART)),
            ("uc.inventoryService.ReserveStock", Some("service.InventoryService.ReserveStock")),
            ("uc.orderRepo.Create", None),
            ("uc.cartService.ClearCart", Some(CLEAR_CART)),
        ]
    );
    assert!(relations.callers.is_empty());
}

#[rstest]
fn unknown_key_is_reported_without_state_change(mut nav: Navigator) {
    nav.select(GET_CART, true).expect("select");
    nav.drain_effects();

    let err = nav.select("missing.Key", true).expect_err("unknown");
    assert_eq!(err, NavError::UnknownKey { key: "missing.Key".to_owned() });
    assert_eq!(current(&nav), Some(GET_CART));
    assert_eq!(nav.history().len(), 1);

    let effects = nav.drain_effects();
    assert_eq!(notices(&effects).first().map(|(severity, _)| *severity), Some(Severity::Error));
    assert!(!effects.iter().any(|effect| matches!(effect, Effect::RenderRequested(_))));
}

#[rstest]
fn back_walks_the_stack_until_no_history(mut nav: Navigator) {
    nav.select(CREATE_ORDER, true).expect("a");
    nav.select(GET_CART, true).expect("b");
    nav.select(CLEAR_CART, true).expect("c");
    nav.drain_effects();

    nav.back().expect("back to b");
    assert_eq!(current(&nav), Some(GET_CART));
    nav.back().expect("back to a");
    assert_eq!(current(&nav), Some(CREATE_ORDER));

    nav.drain_effects();
    assert_eq!(nav.back(), Err(NavError::NoHistory));
    assert_eq!(current(&nav), Some(CREATE_ORDER));
    assert_eq!(nav.history().len(), 1);
    assert_eq!(
        notices(&nav.drain_effects()),
        vec![(Severity::Info, "No previous function in history")]
    );
}

#[rstest]
fn back_restores_the_zoom_active_when_superseded(mut nav: Navigator) {
    nav.select(CREATE_ORDER, true).expect("a");
    nav.zoom_in();
    nav.select(GET_CART, true).expect("b");
    nav.zoom_out();
    nav.zoom_out();
    assert_ne!(nav.zoom(), Zoom::default().zoomed_in());

    nav.back().expect("back");
    assert_eq!(current(&nav), Some(CREATE_ORDER));
    assert_eq!(nav.zoom(), Zoom::default().zoomed_in());
    assert!(notices(&nav.drain_effects())
        .contains(&(Severity::Success, "Returned to previous function")));
}

#[rstest]
fn back_on_fresh_navigator_reports_no_history(mut nav: Navigator) {
    assert_eq!(nav.back(), Err(NavError::NoHistory));
    assert_eq!(nav.state(), NavState::Welcome);
}

#[rstest]
fn zoom_is_clamped_and_only_rescales(mut nav: Navigator) {
    nav.select(GET_CART, true).expect("select");
    nav.drain_effects();

    nav.zoom_in();
    nav.zoom_out();
    assert_eq!(nav.zoom().factor(), 1.0);

    for _ in 0..20 {
        nav.zoom_in();
    }
    assert_eq!(nav.zoom().factor(), ZOOM_MAX);
    for _ in 0..40 {
        nav.zoom_out();
    }
    assert_eq!(nav.zoom().factor(), ZOOM_MIN);
    nav.reset_zoom();
    assert_eq!(nav.zoom(), Zoom::default());

    let effects = nav.drain_effects();
    assert!(effects.iter().all(|effect| matches!(effect, Effect::Rescale(_))));
    assert_eq!(nav.history().len(), 1);
}

#[rstest]
fn clear_returns_to_welcome_but_keeps_history(mut nav: Navigator) {
    nav.select(CREATE_ORDER, true).expect("a");
    nav.select(GET_CART, true).expect("b");
    nav.drain_effects();

    nav.clear();
    assert_eq!(nav.state(), NavState::Welcome);
    assert_eq!(nav.history().len(), 2);
    assert_eq!(nav.location().channel().read(), "");

    let effects = nav.drain_effects();
    assert!(effects.contains(&Effect::ShowWelcome));
    assert!(effects.contains(&Effect::Breadcrumb(Breadcrumb::Welcome)));
    assert!(effects.contains(&Effect::ActiveItem(None)));
}

#[rstest]
fn select_writes_fragment_only_when_it_differs(mut nav: Navigator) {
    nav.select(GET_CART, true).expect("select");
    assert_eq!(nav.location().channel().read(), GET_CART);
    assert_eq!(nav.location().channel().writes(), 1);

    nav.select(GET_CART, false).expect("reselect");
    assert_eq!(nav.location().channel().writes(), 1);
}

#[rstest]
fn external_fragment_change_selects_without_history(mut nav: Navigator) {
    nav.select(CREATE_ORDER, true).expect("a");
    nav.location_mut().channel_mut().set_external(&format!("#{GET_CART}"));

    nav.fragment_changed();
    assert_eq!(current(&nav), Some(GET_CART));
    assert_eq!(nav.history().len(), 1);
    assert_eq!(nav.location().channel().writes(), 1);
}

#[rstest]
#[case::unknown_key("#missing.Key")]
#[case::malformed("#%FF")]
fn unrecognized_fragment_is_ignored(mut nav: Navigator, #[case] fragment: &str) {
    nav.select(GET_CART, true).expect("select");
    nav.drain_effects();
    nav.location_mut().channel_mut().set_external(fragment);

    nav.fragment_changed();
    assert_eq!(current(&nav), Some(GET_CART));
    assert!(nav.drain_effects().is_empty());
}

#[rstest]
fn empty_fragment_clears_selection(mut nav: Navigator) {
    nav.select(GET_CART, true).expect("select");
    nav.location_mut().channel_mut().set_external("");

    nav.fragment_changed();
    assert_eq!(nav.state(), NavState::Welcome);
    assert_eq!(nav.history().len(), 1);
}

#[rstest]
fn empty_fragment_on_welcome_shows_welcome_again(mut nav: Navigator) {
    nav.location_mut().channel_mut().set_external("");

    nav.fragment_changed();
    let effects = nav.drain_effects();
    assert_eq!(nav.state(), NavState::Welcome);
    assert!(effects.iter().any(|effect| matches!(effect, Effect::ShowWelcome)));
    assert!(effects.iter().all(|effect| !matches!(effect, Effect::RenderRequested(_))));
    assert!(nav.history().is_empty());
    assert_eq!(nav.location().channel().writes(), 0);
}

#[test]
fn initial_fragment_is_recorded_in_history() {
    let fragment = MemoryFragment::new(format!("#{}", "service.CartService.ClearCart"));
    let mut nav = Navigator::new(Arc::new(cart_service_dataset()), fragment);

    assert!(nav.open_initial_fragment());
    assert_eq!(current(&nav), Some(CLEAR_CART));
    assert_eq!(nav.history().len(), 1);
    assert_eq!(nav.location().channel().writes(), 0);
}

#[test]
fn unknown_initial_fragment_stays_on_welcome() {
    let mut nav =
        Navigator::new(Arc::new(cart_service_dataset()), MemoryFragment::new("#nope.Nope"));
    assert!(!nav.open_initial_fragment());
    assert_eq!(nav.state(), NavState::Welcome);
}

#[rstest]
fn stale_render_completion_is_dropped(mut nav: Navigator) {
    nav.select(CREATE_ORDER, true).expect("a");
    let first = last_ticket(&mut nav);
    nav.select(GET_CART, true).expect("b");
    let second = last_ticket(&mut nav);

    assert!(!nav.render_completed(&first, ["uc.cartService.GetCart"]));
    assert!(nav.links().is_empty());
    assert!(nav.drain_effects().is_empty());

    assert!(nav.render_completed(&second, ["cart.IsEmpty"]));
    assert_eq!(nav.links().len(), 1);
    assert_eq!(nav.links()[0].target.as_str(), IS_EMPTY);
}

#[rstest]
fn completion_after_clear_is_dropped(mut nav: Navigator) {
    nav.select(GET_CART, true).expect("select");
    let ticket = last_ticket(&mut nav);
    nav.clear();

    assert!(!nav.render_completed(&ticket, ["cart.IsEmpty"]));
    assert!(!nav.render_failed(&ticket, "late"));
}

#[rstest]
fn rendered_labels_become_navigation_links(mut nav: Navigator) {
    nav.select(CREATE_ORDER, true).expect("select");
    let ticket = last_ticket(&mut nav);

    let labels =
        ["OrderCreateUseCase.CreateOrder", "uc.orderRepo.Create", "uc.cartService.GetCart"];
    assert!(nav.render_completed(&ticket, labels));
    let targets = nav.links().iter().map(|link| link.target.as_str()).collect::<Vec<_>>();
    assert_eq!(targets, vec![CREATE_ORDER, GET_CART]);

    nav.activate_link(1).expect("follow");
    assert_eq!(current(&nav), Some(GET_CART));
    assert_eq!(nav.history().len(), 2);
    assert!(nav.links().is_empty());
}

#[rstest]
fn render_failure_is_contained(mut nav: Navigator) {
    nav.select(GET_CART, true).expect("select");
    let ticket = last_ticket(&mut nav);

    assert!(nav.render_failed(&ticket, "unsupported syntax on line 2"));
    let effects = nav.drain_effects();
    assert!(effects.iter().any(|effect| matches!(effect, Effect::RenderFailed { .. })));
    assert_eq!(notices(&effects).first().map(|(severity, _)| *severity), Some(Severity::Error));
    assert_eq!(current(&nav), Some(GET_CART));

    nav.select(CLEAR_CART, true).expect("navigation continues");
    assert_eq!(current(&nav), Some(CLEAR_CART));
}

#[rstest]
fn back_restores_scroll_when_its_render_completes(mut nav: Navigator) {
    nav.select(CREATE_ORDER, true).expect("a");
    nav.set_scroll_offset(40);
    nav.select(GET_CART, true).expect("b");
    nav.set_scroll_offset(7);
    nav.drain_effects();

    nav.back().expect("back");
    assert_eq!(nav.scroll_offset(), 0);
    let ticket = last_ticket(&mut nav);

    assert!(nav.render_completed(&ticket, std::iter::empty()));
    assert_eq!(nav.scroll_offset(), 40);
    assert!(nav.drain_effects().contains(&Effect::RestoreScroll(40)));
}

#[rstest]
fn superseded_back_never_restores_scroll(mut nav: Navigator) {
    nav.select(CREATE_ORDER, true).expect("a");
    nav.set_scroll_offset(40);
    nav.select(GET_CART, true).expect("b");
    nav.back().expect("back");
    nav.select(CLEAR_CART, true).expect("c");
    let ticket = last_ticket(&mut nav);

    assert!(nav.render_completed(&ticket, std::iter::empty()));
    assert_eq!(nav.scroll_offset(), 0);
    assert!(!nav.drain_effects().contains(&Effect::RestoreScroll(40)));
}

#[rstest]
fn following_an_unresolved_call_warns_and_stays(mut nav: Navigator) {
    nav.select(CREATE_ORDER, true).expect("select");
    nav.drain_effects();

    let err = nav.follow_call("uc.orderRepo.Create").expect_err("unresolved");
    assert!(matches!(err, NavError::UnresolvedLink(_)));
    assert_eq!(current(&nav), Some(CREATE_ORDER));

    let effects = nav.drain_effects();
    let notices = notices(&effects);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].0, Severity::Warning);
    assert!(notices[0].1.contains("uc.orderRepo.Create"));
}

#[rstest]
fn following_a_call_records_history(mut nav: Navigator) {
    nav.select(CREATE_ORDER, true).expect("select");
    nav.follow_call("uc.cartService.ClearCart").expect("follow");
    assert_eq!(current(&nav), Some(CLEAR_CART));
    assert_eq!(nav.history().len(), 2);
}

#[rstest]
#[case::exact(&["service.CartService.GetCart", "CreateOrder"], GET_CART)]
#[case::partial(&["Main", "CreateOrder"], CREATE_ORDER)]
fn entry_point_selection(mut nav: Navigator, #[case] names: &[&str], #[case] expected: &str) {
    nav.select_entry_point(names).expect("entry point");
    assert_eq!(current(&nav), Some(expected));
}

#[rstest]
fn missing_entry_point_warns(mut nav: Navigator) {
    let err = nav.select_entry_point(&["MakeConversion"]).expect_err("none");
    assert_eq!(err, NavError::NoEntryPoint { names: vec!["MakeConversion".to_owned()] });
    assert_eq!(notices(&nav.drain_effects())[0].0, Severity::Warning);
}

#[rstest]
fn search_never_touches_navigation(mut nav: Navigator) {
    nav.select(GET_CART, true).expect("select");
    nav.drain_effects();

    nav.search("stock");
    let visible = nav.visible_keys().into_iter().map(|key| key.as_str()).collect::<Vec<_>>();
    assert_eq!(visible, vec!["service.InventoryService.ReserveStock"]);
    nav.search("no such thing");
    assert!(nav.visible_keys().is_empty());
    nav.search("");
    assert_eq!(nav.visible_keys().len(), nav.dataset().len());

    assert_eq!(current(&nav), Some(GET_CART));
    assert_eq!(nav.history().len(), 1);
    assert!(nav.drain_effects().is_empty());
}
