use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::flash::{Banner, BannerKind, FlashStack};
use crate::form::{self, LineItemForm};
use crate::relay::{self, EventSink, HandlerReply, LineItemParams, LineItemRelay};

/// Which control currently has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Description,
    Quantity,
    Amount,
    AddButton,
}

impl Section {
    /// Field name behind this control, None for the Add button
    pub fn field_name(self) -> Option<&'static str> {
        match self {
            Section::Description => Some(form::DESCRIPTION),
            Section::Quantity => Some(form::QUANTITY),
            Section::Amount => Some(form::AMOUNT),
            Section::AddButton => None,
        }
    }

    fn next(self) -> Self {
        match self {
            Section::Description => Section::Quantity,
            Section::Quantity => Section::Amount,
            Section::Amount => Section::AddButton,
            Section::AddButton => Section::Description,
        }
    }

    fn prev(self) -> Self {
        match self {
            Section::Description => Section::AddButton,
            Section::Quantity => Section::Description,
            Section::Amount => Section::Quantity,
            Section::AddButton => Section::Amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

pub struct App {
    pub section: Section,
    pub popup: Popup,

    // Form state
    pub form: LineItemForm,
    pub relay: LineItemRelay,

    // Line items the handler has acknowledged (memory only, never persisted)
    pub drafts: Vec<LineItemParams>,

    // Flash banners
    pub flashes: FlashStack,

    // Config
    pub config: AppConfig,

    // Handler replies, drained on tick
    reply_rx: mpsc::UnboundedReceiver<HandlerReply>,

    pub should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let (sink, replies) = relay::spawn_handler();
        Self::with_handler(config, sink, replies)
    }

    /// Wire the app to an explicit handler channel pair
    pub fn with_handler(
        config: AppConfig,
        sink: EventSink,
        replies: mpsc::UnboundedReceiver<HandlerReply>,
    ) -> Self {
        let mut relay = LineItemRelay::new();
        relay.attach(sink);

        let mut app = Self {
            section: Section::Description,
            popup: Popup::None,

            form: LineItemForm::new(),
            relay,

            drafts: Vec::new(),
            flashes: FlashStack::new(),

            config,
            reply_rx: replies,

            should_quit: false,
        };

        app.flash(BannerKind::Info, "Draft pad ready: Tab moves, Enter adds");
        app
    }

    /// Show a banner wired with the configured dismissal timing
    pub fn flash(&mut self, kind: BannerKind, msg: impl Into<String>) {
        let banner = Banner::new(msg, kind, self.config.dismiss_strategy)
            .with_timing(self.config.dismiss_delay(), self.config.fade_duration());
        self.flashes.push(banner, Instant::now());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        self.handle_normal_key(key)
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            // Escape dismisses the oldest banner first; with none left it quits
            KeyCode::Esc => {
                if self.flashes.is_empty() {
                    self.should_quit = true;
                } else {
                    self.flashes.dismiss_front();
                }
            }

            // Focus movement between the three inputs and the Add button
            KeyCode::Tab => self.section = self.section.next(),
            KeyCode::BackTab => self.section = self.section.prev(),

            KeyCode::Enter => {
                match self.section {
                    // Enter on the Add button submits; its default meaning
                    // (moving focus) is suppressed
                    Section::AddButton => self.submit(),
                    _ => self.section = self.section.next(),
                }
            }

            KeyCode::Backspace => {
                if let Some(name) = self.section.field_name() {
                    if let Some(field) = self.form.field_mut(name) {
                        field.backspace();
                    }
                }
            }

            KeyCode::F(1) => self.popup = Popup::Help,

            KeyCode::Char(' ') if self.section == Section::AddButton => self.submit(),

            KeyCode::Char(c) => self.handle_char(c),

            _ => {}
        }
        Ok(())
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
                Ok(())
            }
            Popup::None => Ok(()),
        }
    }

    fn handle_char(&mut self, c: char) {
        let accepted = match self.section {
            Section::Description => true,
            // Quantity takes whole numbers only
            Section::Quantity => c.is_ascii_digit(),
            // Amount takes a decimal figure
            Section::Amount => c.is_ascii_digit() || c == '.',
            Section::AddButton => false,
        };

        if !accepted {
            return;
        }

        if let Some(name) = self.section.field_name() {
            if let Some(field) = self.form.field_mut(name) {
                field.push_char(c);
            }
        }
    }

    /// Activation of the Add control: forward the container's current
    /// values to the handler. Blank and missing fields go through as
    /// empty strings; that leniency is the contract, not an oversight.
    fn submit(&mut self) {
        if let Err(e) = self.relay.activate(&self.form) {
            tracing::debug!("line item dispatch skipped: {}", e);
        }
    }

    pub fn tick(&mut self) -> Result<()> {
        let now = Instant::now();

        // Drain handler replies
        while let Ok(reply) = self.reply_rx.try_recv() {
            match reply {
                HandlerReply::TempLineItemAdded(params) => self.accept_line_item(params),
            }
        }

        self.flashes.tick(now);
        Ok(())
    }

    fn accept_line_item(&mut self, params: LineItemParams) {
        let label = if params.description.is_empty() {
            "(blank)".to_string()
        } else {
            params.description.clone()
        };

        self.flash(BannerKind::Success, format!("Added line item: {}", label));

        if self.config.notifications {
            if let Err(e) = crate::notify("linepad", &format!("Added {}", label)) {
                tracing::debug!("desktop notification failed: {}", e);
            }
        }

        self.drafts.push(params);
        self.form.clear();
    }

    /// Release everything the app holds onto: the relay's binding and
    /// every pending banner timer. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.relay.detach();
        self.flashes.detach_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::{OutboundEvent, ADD_TEMP_LINE_ITEM};
    use crossterm::event::{KeyEvent, KeyModifiers};

    type ReplyTx = mpsc::UnboundedSender<HandlerReply>;

    fn test_app() -> (App, mpsc::UnboundedReceiver<OutboundEvent>, ReplyTx) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let app = App::with_handler(AppConfig::default(), event_tx, reply_rx);
        (app, event_rx, reply_tx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_lands_in_the_focused_field() {
        let (mut app, _events, _replies) = test_app();

        app.handle_key(key(KeyCode::Char('a'))).unwrap();
        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::Char('2'))).unwrap();

        assert_eq!(app.form.value_of(form::DESCRIPTION), Some("a"));
        assert_eq!(app.form.value_of(form::QUANTITY), Some("2"));
    }

    #[test]
    fn test_quantity_rejects_non_digits() {
        let (mut app, _events, _replies) = test_app();
        app.section = Section::Quantity;

        app.handle_key(key(KeyCode::Char('x'))).unwrap();
        app.handle_key(key(KeyCode::Char('7'))).unwrap();
        app.handle_key(key(KeyCode::Char('.'))).unwrap();

        assert_eq!(app.form.value_of(form::QUANTITY), Some("7"));
    }

    #[test]
    fn test_enter_on_add_button_dispatches_one_event() {
        let (mut app, mut events, _replies) = test_app();

        for c in "Consulting".chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        app.section = Section::AddButton;
        app.handle_key(key(KeyCode::Enter)).unwrap();

        let event = events.try_recv().unwrap();
        assert_eq!(event.name, ADD_TEMP_LINE_ITEM);
        assert_eq!(event.params.description, "Consulting");
        assert!(events.try_recv().is_err(), "exactly one event per activation");
    }

    #[test]
    fn test_enter_on_a_field_moves_focus_instead() {
        let (mut app, mut events, _replies) = test_app();

        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.section, Section::Quantity);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_handler_reply_appends_draft_and_flashes() {
        let (mut app, _events, replies) = test_app();
        let before = app.flashes.len();

        replies
            .send(HandlerReply::TempLineItemAdded(LineItemParams {
                description: "Travel".into(),
                quantity: "".into(),
                amount: "".into(),
            }))
            .unwrap();
        app.tick().unwrap();

        assert_eq!(app.drafts.len(), 1);
        assert_eq!(app.drafts[0].description, "Travel");
        assert_eq!(app.flashes.len(), before + 1);
        assert_eq!(
            app.form.value_of(form::DESCRIPTION),
            Some(""),
            "accepted input clears the form"
        );
    }

    #[test]
    fn test_escape_dismisses_banners_before_quitting() {
        let (mut app, _events, _replies) = test_app();
        // The ready banner is still up
        assert!(!app.flashes.is_empty());

        app.handle_key(key(KeyCode::Esc)).unwrap();
        app.tick().unwrap();
        assert!(app.flashes.is_empty());
        assert!(!app.should_quit);

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_teardown_is_idempotent_and_silences_dispatch() {
        let (mut app, mut events, _replies) = test_app();

        app.teardown();
        app.teardown();

        app.section = Section::AddButton;
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(events.try_recv().is_err(), "detached relay must stay quiet");
    }
}
