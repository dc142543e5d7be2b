// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::sync::Arc;

use super::effects::{
    Breadcrumb, CallRelations, CalleeLink, Effect, InfoPanel, LabelLink, Notice, RenderRequest,
    RenderTicket, Severity,
};
use super::history::{History, NavigationEntry};
use super::location::{FragmentChannel, FragmentTarget, LocationSync, MemoryFragment};
use super::zoom::Zoom;
use crate::model::{Dataset, FunctionKey, FunctionRecord};
use crate::query::{visible_keys, LinkResolver, UnresolvedLink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    UnknownKey { key: String },
    NoHistory,
    UnresolvedLink(UnresolvedLink),
    NoEntryPoint { names: Vec<String> },
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey { key } => write!(f, "unknown function key: {key}"),
            Self::NoHistory => f.write_str("no previous function in history"),
            Self::UnresolvedLink(err) => write!(f, "{err}"),
            Self::NoEntryPoint { names } => {
                write!(f, "no entry point found (tried {})", names.join(", "))
            }
        }
    }
}

impl std::error::Error for NavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnresolvedLink(err) => Some(err),
            Self::UnknownKey { .. } | Self::NoHistory | Self::NoEntryPoint { .. } => None,
        }
    }
}

impl From<UnresolvedLink> for NavError {
    fn from(err: UnresolvedLink) -> Self {
        Self::UnresolvedLink(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState<'a> {
    Welcome,
    Viewing(&'a FunctionKey),
}

/// Navigation state machine over a read-only [`Dataset`].
///
/// Every operation runs to completion and queues [`Effect`]s for the host; call
/// [`Navigator::drain_effects`] after each event. Errors are also reported as notices, so a
/// host may ignore the returned `Result`.
#[derive(Debug)]
pub struct Navigator<C = MemoryFragment> {
    dataset: Arc<Dataset>,
    location: LocationSync<C>,
    current: Option<FunctionKey>,
    history: History,
    zoom: Zoom,
    scroll_offset: u32,
    search_query: String,
    render_seq: u64,
    awaited_render: Option<RenderTicket>,
    scroll_restore: Option<(RenderTicket, u32)>,
    links: Vec<LabelLink>,
    effects: Vec<Effect>,
}

impl Navigator<MemoryFragment> {
    pub fn in_memory(dataset: Arc<Dataset>) -> Self {
        Self::new(dataset, MemoryFragment::default())
    }
}

impl<C: FragmentChannel> Navigator<C> {
    pub fn new(dataset: Arc<Dataset>, channel: C) -> Self {
        Self {
            dataset,
            location: LocationSync::new(channel),
            current: None,
            history: History::default(),
            zoom: Zoom::default(),
            scroll_offset: 0,
            search_query: String::new(),
            render_seq: 0,
            awaited_render: None,
            scroll_restore: None,
            links: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn state(&self) -> NavState<'_> {
        match &self.current {
            Some(key) => NavState::Viewing(key),
            None => NavState::Welcome,
        }
    }

    pub fn current(&self) -> Option<&FunctionKey> {
        self.current.as_ref()
    }

    pub fn current_record(&self) -> Option<&FunctionRecord> {
        self.current.as_ref().and_then(|key| self.dataset.get(key.as_str()))
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Links registered by the last accepted render completion.
    pub fn links(&self) -> &[LabelLink] {
        &self.links
    }

    pub fn location(&self) -> &LocationSync<C> {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut LocationSync<C> {
        &mut self.location
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn select(&mut self, key: &str, record_history: bool) -> Result<(), NavError> {
        let dataset = Arc::clone(&self.dataset);
        let Some(record) = dataset.get(key) else {
            tracing::debug!(key, "select: unknown key");
            self.notify(format!("Function {key:?} is not in the catalogue"), Severity::Error);
            return Err(NavError::UnknownKey { key: key.to_owned() });
        };
        let key = record.key().clone();

        if record_history && self.current.as_ref().is_some_and(|current| *current != key) {
            self.save_view_state();
        }

        self.current = Some(key.clone());
        self.scroll_offset = 0;
        self.links.clear();
        self.scroll_restore = None;
        if record_history {
            self.history.push(NavigationEntry::new(key.clone(), self.zoom));
        }
        let wrote_fragment = self.location.publish(&key);
        tracing::debug!(
            %key,
            record_history,
            depth = self.history.len(),
            wrote_fragment,
            "select"
        );

        let ticket = self.issue_render_ticket(key.clone());
        self.effects.push(Effect::RenderRequested(RenderRequest {
            ticket,
            description: record.diagram_description().to_owned(),
        }));
        self.effects.push(Effect::InfoPanel(InfoPanel::for_record(record)));
        self.effects.push(Effect::CallRelations(call_relations(&dataset, record)));
        self.effects.push(Effect::Breadcrumb(Breadcrumb::Function {
            package_name: record.package_name().to_owned(),
            display_name: record.display_name(),
        }));
        self.effects.push(Effect::ActiveItem(Some(key)));
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), NavError> {
        if self.history.len() < 2 {
            tracing::debug!(depth = self.history.len(), "back: nothing to return to");
            self.notify("No previous function in history", Severity::Info);
            return Err(NavError::NoHistory);
        }

        self.save_view_state();
        self.history.pop();
        let Some(previous) = self.history.top().cloned() else {
            return Err(NavError::NoHistory);
        };

        self.zoom = previous.zoom();
        self.select(previous.key().as_str(), false)?;
        if let Some(ticket) = self.awaited_render.clone() {
            self.scroll_restore = Some((ticket, previous.scroll_offset()));
        }
        self.notify("Returned to previous function", Severity::Success);
        Ok(())
    }

    /// Captures scroll offset and zoom into the top history frame when it is the current one.
    pub fn save_view_state(&mut self) {
        if let Some(current) = &self.current {
            self.history.save_view_state(current, self.scroll_offset, self.zoom);
        }
    }

    /// Returns to the welcome view. History is kept.
    pub fn clear(&mut self) {
        tracing::debug!(previous = ?self.current, "clear");
        self.current = None;
        self.scroll_offset = 0;
        self.links.clear();
        self.awaited_render = None;
        self.scroll_restore = None;
        self.location.clear();

        self.effects.push(Effect::ShowWelcome);
        self.effects.push(Effect::Breadcrumb(Breadcrumb::Welcome));
        self.effects.push(Effect::ActiveItem(None));
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom.zoomed_in());
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom.zoomed_out());
    }

    pub fn reset_zoom(&mut self) {
        self.set_zoom(Zoom::default());
    }

    fn set_zoom(&mut self, zoom: Zoom) {
        self.zoom = zoom;
        self.effects.push(Effect::Rescale(zoom));
    }

    pub fn set_scroll_offset(&mut self, offset: u32) {
        self.scroll_offset = offset;
    }

    pub fn search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Keys passing the current search query, in dataset order.
    pub fn visible_keys(&self) -> Vec<&FunctionKey> {
        visible_keys(&self.dataset, &self.search_query)
    }

    /// Reacts to a fragment change made outside the navigator.
    ///
    /// Unknown or malformed fragments are ignored.
    pub fn fragment_changed(&mut self) {
        match self.location.target() {
            FragmentTarget::Empty => self.clear(),
            FragmentTarget::Key(key) => {
                if self.current.as_ref().is_some_and(|current| *current == key.as_str()) {
                    return;
                }
                if self.dataset.contains(&key) {
                    let _ = self.select(&key, false);
                } else {
                    tracing::debug!(key, "fragment names an unknown key; ignored");
                }
            }
            FragmentTarget::Malformed => {
                tracing::debug!("fragment is not valid percent-encoded UTF-8; ignored");
            }
        }
    }

    /// Opens the key named by the fragment at startup, recording it in history.
    pub fn open_initial_fragment(&mut self) -> bool {
        let FragmentTarget::Key(key) = self.location.target() else {
            return false;
        };
        self.dataset.contains(&key) && self.select(&key, true).is_ok()
    }

    /// Navigates to the record a call expression resolves to.
    pub fn follow_call(&mut self, expression: &str) -> Result<(), NavError> {
        let dataset = Arc::clone(&self.dataset);
        let resolver = LinkResolver::new(&dataset);
        match resolver.resolve(expression) {
            Ok(key) => self.select(key.as_str(), true),
            Err(err) => {
                tracing::warn!(expression, "call expression does not resolve");
                let message = match resolver.suggest(expression) {
                    Some(record) => format!(
                        "Function {:?} is not documented (closest: {})",
                        err.query,
                        record.display_name()
                    ),
                    None => format!("Function {:?} is not documented", err.query),
                };
                self.notify(message, Severity::Warning);
                Err(err.into())
            }
        }
    }

    /// Selects the first entry point found: an exact key first, otherwise the first key
    /// containing one of `names`.
    pub fn select_entry_point<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), NavError> {
        let dataset = Arc::clone(&self.dataset);
        let exact = names.iter().map(AsRef::as_ref).find(|name| dataset.contains(name));
        let found = exact.and_then(|name| dataset.key(name)).or_else(|| {
            dataset.keys().find(|key| {
                names
                    .iter()
                    .map(AsRef::as_ref)
                    .any(|name| !name.is_empty() && key.as_str().contains(name))
            })
        });

        match found {
            Some(key) => self.select(key.as_str(), true),
            None => {
                let names = names.iter().map(|name| name.as_ref().to_owned()).collect::<Vec<_>>();
                let message = format!(
                    "No entry point found ({}); pick a function from the list",
                    names.join(", ")
                );
                self.notify(message, Severity::Warning);
                Err(NavError::NoEntryPoint { names })
            }
        }
    }

    /// Follows a link registered by the last render completion.
    pub fn activate_link(&mut self, index: usize) -> Result<(), NavError> {
        let Some(link) = self.links.get(index) else {
            return Err(NavError::UnknownKey { key: format!("link #{index}") });
        };
        let target = link.target.clone();
        self.select(target.as_str(), true)
    }

    /// Accepts a render completion and wires its labels to navigation targets.
    ///
    /// Returns `false` for stale tickets, which leave all state untouched.
    pub fn render_completed<'l>(
        &mut self,
        ticket: &RenderTicket,
        labels: impl IntoIterator<Item = &'l str>,
    ) -> bool {
        if !self.accepts(ticket) {
            tracing::debug!(
                key = %ticket.key(),
                seq = ticket.seq(),
                "stale render completion dropped"
            );
            return false;
        }
        self.awaited_render = None;

        let resolver = LinkResolver::new(&self.dataset);
        let mut links = Vec::new();
        for label in labels {
            if let Ok(target) = resolver.resolve(label) {
                links.push(LabelLink { label: label.to_owned(), target: target.clone() });
            }
        }
        tracing::debug!(key = %ticket.key(), links = links.len(), "render completed");
        self.links = links.clone();
        self.effects.push(Effect::LinksWired(links));

        if let Some((armed, offset)) = self.scroll_restore.take() {
            if armed == *ticket {
                self.scroll_offset = offset;
                self.effects.push(Effect::RestoreScroll(offset));
            }
        }
        true
    }

    /// Accepts a render failure. Navigation stays available.
    pub fn render_failed(&mut self, ticket: &RenderTicket, message: impl Into<String>) -> bool {
        if !self.accepts(ticket) {
            tracing::debug!(
                key = %ticket.key(),
                seq = ticket.seq(),
                "stale render failure dropped"
            );
            return false;
        }
        let message = message.into();
        tracing::warn!(key = %ticket.key(), %message, "render failed");
        self.awaited_render = None;
        self.scroll_restore = None;
        self.effects
            .push(Effect::RenderFailed { key: ticket.key().clone(), message: message.clone() });
        self.notify(format!("Diagram rendering failed: {message}"), Severity::Error);
        true
    }

    fn accepts(&self, ticket: &RenderTicket) -> bool {
        self.awaited_render.as_ref() == Some(ticket)
            && self.current.as_ref() == Some(ticket.key())
    }

    fn issue_render_ticket(&mut self, key: FunctionKey) -> RenderTicket {
        self.render_seq = self.render_seq.wrapping_add(1);
        let ticket = RenderTicket::new(key, self.render_seq);
        self.awaited_render = Some(ticket.clone());
        ticket
    }

    fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.effects.push(Effect::Notice(Notice::new(message, severity)));
    }
}

fn call_relations(dataset: &Dataset, record: &FunctionRecord) -> CallRelations {
    let resolver = LinkResolver::new(dataset);
    let callees = record
        .called_functions()
        .iter()
        .map(|expression| CalleeLink {
            expression: expression.clone(),
            resolved: resolver.resolve(expression).ok().cloned(),
        })
        .collect();
    let callers = resolver.find_callers(record.key().as_str()).into_iter().cloned().collect();
    CallRelations { callees, callers }
}
