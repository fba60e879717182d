//! The play session.

use std::path::Path;

use cb_core::{Address, Casebook, Consequences, Letter};
use serde::Serialize;

use crate::composer::{self, Composition};
use crate::config::EngineConfig;
use crate::directory::{DistrictGroup, build_directory};
use crate::error::{EngineError, EngineResult, Rejection};
use crate::gates::{ActionSet, LEAVE_ACTION_ID};
use crate::markup::{render_prompt, render_text, strip_citations};
use crate::policy::{self, LeadOutcome};
use crate::present::{
    ActionSection, ActionView, ContentBlock, Notification, RenderMode, RenderResult,
};
use crate::resolver::{self, ResolveContext};
use crate::state::GameState;

/// What the end-of-case screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseSummaryView {
    /// Case title.
    pub title: Option<String>,
    /// The solution narrative.
    pub outro: Vec<ContentBlock>,
    /// Description of the canonical solution.
    pub description: String,
    /// Leads of the canonical solution.
    pub canonical_leads: Vec<String>,
    /// Lead count of the canonical solution.
    pub benchmark: u32,
    /// Leads the player followed.
    pub leads_followed: u32,
}

impl CaseSummaryView {
    /// Whether the player did at least as well as the canonical solution.
    pub fn matched_benchmark(&self) -> bool {
        self.leads_followed <= self.benchmark
    }
}

/// A single play-through of a case.
///
/// Every visit and action runs against a copy of the state that is only
/// kept when the call succeeds.
#[derive(Debug, Clone)]
pub struct Session {
    book: Casebook,
    config: EngineConfig,
    state: GameState,
    display: Vec<ContentBlock>,
    actions: ActionSet,
}

impl Session {
    /// Start a session on a loaded casebook.
    pub fn new(book: Casebook, config: EngineConfig) -> Self {
        Self {
            book,
            config,
            state: GameState::new(),
            display: Vec::new(),
            actions: ActionSet::new(),
        }
    }

    /// Start a session with the configuration file at `config`, or the
    /// defaults when there is none.
    pub fn configured(book: Casebook, config: Option<&Path>) -> EngineResult<Self> {
        let config = match config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        Ok(Self::new(book, config))
    }

    /// The case data.
    pub fn casebook(&self) -> &Casebook {
        &self.book
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The player's progress.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Everything currently displayed.
    pub fn display(&self) -> &[ContentBlock] {
        &self.display
    }

    /// The actions currently on offer.
    pub fn actions(&self) -> &[ActionView] {
        self.actions.views()
    }

    /// Show the case introduction and leave the current location.
    pub fn introduction(&mut self) -> RenderResult {
        self.state.set_current(None);
        let case = self.book.case();
        let mut blocks = Vec::new();
        if let Some(title) = &case.title {
            blocks.push(ContentBlock::heading(strip_citations(title)));
        }
        if let Some(date) = &case.date {
            blocks.push(ContentBlock::paragraph(strip_citations(date)));
        }
        blocks.extend(render_text(&case.intro, &self.config.substitutions));
        self.present(RenderMode::Replace, blocks, ActionSet::new(), Vec::new())
    }

    /// Travel to an address.
    pub fn visit(&mut self, address: &str) -> EngineResult<RenderResult> {
        log::debug!("visit {address}");
        let mut draft = self.state.clone();
        let composition = enter(&self.book, &self.config, &mut draft, address)?;
        self.state = draft;
        Ok(self.present(
            RenderMode::Replace,
            composition.blocks,
            composition.actions,
            composition.notifications,
        ))
    }

    /// Fire an action that is currently on offer.
    pub fn act(&mut self, action_id: &str) -> EngineResult<RenderResult> {
        if action_id == LEAVE_ACTION_ID && self.actions.offers_leave() {
            return Ok(self.introduction());
        }
        let (consequences, reason) = self
            .actions
            .lookup(action_id)
            .ok_or_else(|| EngineError::ActionUnavailable(action_id.to_string()))?;
        if let Some(reason) = reason {
            return Err(Rejection::ActionDisabled {
                id: action_id.to_string(),
                reason: reason.to_string(),
            }
            .into());
        }
        let consequences = consequences.clone();
        self.act_with(action_id, &consequences)
    }

    /// Fire an action with explicit consequences.
    ///
    /// Unlike [`Session::act`], the id does not need to be on offer.
    pub fn act_with(
        &mut self,
        action_id: &str,
        consequences: &Consequences,
    ) -> EngineResult<RenderResult> {
        log::debug!("act {action_id}");
        if let Some(letter) = policy::hint_letter(action_id) {
            return self.take_hint(letter);
        }

        let mut draft = self.state.clone();
        let location = draft
            .current()
            .and_then(|address| self.book.location(address.as_str()));
        let ctx = ResolveContext {
            action_id,
            consequences,
            location,
            config: &self.config,
        };
        let resolution = resolver::resolve(&ctx, &mut draft)?;
        let mut blocks = resolution.blocks;
        let mut notifications = resolution.notifications;

        if let Some(sequence) = resolution.sequence {
            notifications.extend(sequence.notifications);
            if resolution.state_changed {
                match self.reenter(&mut draft) {
                    Ok(composition) => {
                        notifications.extend(composition.notifications);
                        let mut blocks = composition.blocks;
                        blocks.extend(sequence.blocks);
                        self.state = draft;
                        return Ok(self.present(
                            RenderMode::Replace,
                            blocks,
                            composition.actions,
                            notifications,
                        ));
                    }
                    Err(EngineError::Rejected(rejection)) => {
                        log::warn!("re-entry after sequence refused: {rejection}");
                        notifications.push(Notification::warning(rejection.to_string()));
                    }
                    Err(err) => return Err(err),
                }
            }
            blocks.extend(sequence.blocks);
            self.state = draft;
            return Ok(self.present(RenderMode::Append, blocks, sequence.actions, notifications));
        }

        let actions = if resolution.ends_interaction {
            if resolution.added_text {
                ActionSet::new()
            } else {
                ActionSet::leave(&self.config.leave_label)
            }
        } else if resolution.state_changed {
            self.flat_actions(&draft)
        } else {
            self.actions.clone()
        };
        self.state = draft;
        Ok(self.present(RenderMode::Append, blocks, actions, notifications))
    }

    /// Locations grouped by district.
    pub fn directory(&self) -> Vec<DistrictGroup> {
        build_directory(&self.book, &self.state, &self.config.district_order)
    }

    /// The end-of-case summary.
    pub fn summary(&self) -> CaseSummaryView {
        let case = self.book.case();
        let canonical = case.case_summary.clone().unwrap_or_default();
        CaseSummaryView {
            title: case.title.clone(),
            outro: render_text(&case.outro, &self.config.substitutions),
            description: strip_citations(&canonical.description()),
            canonical_leads: canonical.leads.iter().map(|l| l.name.clone()).collect(),
            benchmark: canonical.benchmark(),
            leads_followed: self.state.leads(),
        }
    }

    fn take_hint(&mut self, letter: Letter) -> EngineResult<RenderResult> {
        let mut draft = self.state.clone();
        let text = policy::take_hint(letter, &mut draft, &self.config)?;
        let mut blocks = vec![ContentBlock::Separator];
        blocks.extend(render_prompt(&text, None, &self.config.substitutions));
        let notifications = vec![Notification::info(format!(
            "Hint {letter} taken. Lead count increased."
        ))];
        let actions = self.flat_actions(&draft);
        self.state = draft;
        Ok(self.present(RenderMode::Append, blocks, actions, notifications))
    }

    fn reenter(&self, draft: &mut GameState) -> EngineResult<Composition> {
        let current = draft.current().cloned().ok_or(EngineError::NoCurrentLocation)?;
        enter(&self.book, &self.config, draft, current.as_str())
    }

    fn flat_actions(&self, state: &GameState) -> ActionSet {
        state
            .current()
            .and_then(|address| self.book.location(address.as_str()))
            .map(|location| {
                ActionSet::from_actions(&location.actions, ActionSection::Location, state)
            })
            .unwrap_or_default()
    }

    fn present(
        &mut self,
        mode: RenderMode,
        blocks: Vec<ContentBlock>,
        actions: ActionSet,
        notifications: Vec<Notification>,
    ) -> RenderResult {
        match mode {
            RenderMode::Replace => self.display = blocks.clone(),
            RenderMode::Append => self.display.extend(blocks.iter().cloned()),
        }
        self.actions = actions;
        RenderResult {
            mode,
            blocks,
            actions: self.actions.views().to_vec(),
            notifications,
        }
    }
}

/// Move to a location: check its lock, count the lead and compose it.
fn enter(
    book: &Casebook,
    config: &EngineConfig,
    state: &mut GameState,
    address: &str,
) -> EngineResult<Composition> {
    let address = address.trim();
    if state.is_locked(address) {
        return Err(Rejection::LocationLocked(Address::new(address)).into());
    }
    let (key, location) = book
        .location_entry(address)
        .ok_or_else(|| EngineError::NotFound(Address::new(address)))?;
    state.set_current(Some(key.clone()));
    let outcome = policy::record_visit(key, state, config);
    let mut composition = composer::compose(key, location, state, config);
    if outcome == LeadOutcome::Free {
        composition
            .notifications
            .insert(0, Notification::info(format!("{key} is a free lead.")));
    }
    Ok(composition)
}
