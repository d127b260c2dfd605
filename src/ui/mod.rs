//! Terminal storefront wizard
//!
//! This module is organized into submodules:
//! - `screens` - Frame layout and widget rendering for the wizard
//!
//! [`WizardApp`] owns one [`ShoppingSession`] and translates key presses into
//! engine calls. Rendering never mutates the session.

pub mod screens;

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};

use crate::components::keybindings::{KeyAction, KeybindingContext};
use crate::config::EngineConfig;
use crate::model::Product;
use crate::pricing::Quote;
use crate::types::{BundleId, StepId};
use crate::wizard::ShoppingSession;

/// Poll interval for terminal events
const TICK: Duration = Duration::from_millis(50);

/// How a wizard run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    /// The shopper added the bundle to the cart
    CheckedOut(CartLine),
    /// The shopper quit before checkout
    Abandoned,
}

/// The configured bundle handed to the cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub bundle: BundleId,
    pub bundle_name: String,
    pub items: Vec<(StepId, Product)>,
    pub quote: Quote,
}

/// Feedback line shown above the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Warning(String),
}

/// Interactive wizard state
pub struct WizardApp {
    session: ShoppingSession,
    config: EngineConfig,
    keybindings: KeybindingContext,
    /// Highlighted row in the current step's product list
    highlighted: usize,
    status: Option<StatusMessage>,
}

impl WizardApp {
    pub fn new(session: ShoppingSession, config: EngineConfig) -> Self {
        Self {
            session,
            config,
            keybindings: KeybindingContext::new(),
            highlighted: 0,
            status: None,
        }
    }

    pub fn session(&self) -> &ShoppingSession {
        &self.session
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn keybindings(&self) -> &KeybindingContext {
        &self.keybindings
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Drive the wizard until the shopper checks out or quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<WizardOutcome> {
        loop {
            terminal.draw(|f| screens::render_wizard(f, self))?;

            if !event::poll(TICK)? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(outcome) = self.handle_key_event(key) {
                    return Ok(outcome);
                }
            }
        }
    }

    /// Handle a key press. Returns the outcome once the wizard is finished.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<WizardOutcome> {
        let action = self.keybindings.action_for(&key)?;
        self.handle_action(action)
    }

    /// Apply one wizard action
    pub fn handle_action(&mut self, action: KeyAction) -> Option<WizardOutcome> {
        self.status = None;
        let rows = self.session.current_step().products.len();

        match action {
            KeyAction::NavigateUp => {
                self.highlighted = self.highlighted.saturating_sub(1);
            }
            KeyAction::NavigateDown => {
                if self.highlighted + 1 < rows {
                    self.highlighted += 1;
                }
            }
            KeyAction::Toggle => self.toggle_highlighted(),
            KeyAction::NextStep => {
                if self.session.is_last_step() {
                    self.status = Some(StatusMessage::Info(
                        "Last step reached. Press C to add the bundle to your cart".to_string(),
                    ));
                } else if self.session.next() {
                    self.highlighted = 0;
                } else {
                    self.status = Some(StatusMessage::Warning(format!(
                        "'{}' needs a selection before you can continue",
                        self.session.current_step().title
                    )));
                }
            }
            KeyAction::PreviousStep => {
                if self.session.back() {
                    self.highlighted = 0;
                }
            }
            KeyAction::Checkout => return self.checkout(),
            KeyAction::Quit => {
                tracing::info!(bundle = %self.session.bundle().id, "wizard abandoned");
                return Some(WizardOutcome::Abandoned);
            }
        }
        None
    }

    fn toggle_highlighted(&mut self) {
        let Some(product) = self
            .session
            .current_step()
            .products
            .get(self.highlighted)
            .map(|p| p.id)
        else {
            return;
        };

        if let Err(e) = self.session.toggle(product) {
            tracing::warn!(error = %e, "toggle rejected");
            self.status = Some(StatusMessage::Warning(e.to_string()));
        }
    }

    fn checkout(&mut self) -> Option<WizardOutcome> {
        let missing: Vec<String> = self
            .session
            .missing_required_steps()
            .iter()
            .map(|s| s.title.clone())
            .collect();
        if !missing.is_empty() {
            self.status = Some(StatusMessage::Warning(format!(
                "Still required: {}",
                missing.join(", ")
            )));
            return None;
        }

        let bundle = self.session.bundle();
        let line = CartLine {
            bundle: bundle.id,
            bundle_name: bundle.name.clone(),
            items: self
                .session
                .summary()
                .into_iter()
                .flat_map(|(step, picks)| picks.iter().map(move |p| (step.id, p.clone())))
                .collect(),
            quote: self.session.quote(&self.config.pricing),
        };
        tracing::info!(
            bundle = %line.bundle,
            items = line.items.len(),
            total = %line.quote.final_price,
            "bundle added to cart"
        );
        Some(WizardOutcome::CheckedOut(line))
    }
}
