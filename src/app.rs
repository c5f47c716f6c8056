//! Live Translate window — egui/eframe front end.
//!
//! [`TranslateApp`] renders a [`TranslationSession`] snapshot every frame and
//! forwards edits, language picks, swap, copy and speak back into the
//! session.  It holds no translation state of its own.
//!
//! # Layout
//!
//! ```text
//! ┌ source selector ┐        ┌ target selector ┐
//! │ source text     │  [⇄]   │ result text   ◌ │
//! │                 │        │ [Copy] [Speak]  │
//! └─────────────────┘        └─────────────────┘
//! ```
//!
//! The swap button is disabled while the source is auto-detected.

use std::time::{Duration, Instant};

use eframe::egui;

use crate::config::AppConfig;
use crate::language::{Language, SourceLanguage};
use crate::pipeline::{TranslationSession, TranslationState};

/// Extra time after the debounce period during which the UI keeps polling for
/// a freshly dispatched request.
const REPAINT_GRACE: Duration = Duration::from_millis(500);

/// Repaint interval while something may change in the background.
const POLL_INTERVAL: Duration = Duration::from_millis(80);

/// Which side of the window a widget belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    From,
    To,
}

impl Section {
    fn placeholder(self) -> &'static str {
        match self {
            Section::From => "Enter text",
            Section::To => "Translation",
        }
    }
}

// ---------------------------------------------------------------------------
// TranslateApp
// ---------------------------------------------------------------------------

/// eframe application — the translator window.
pub struct TranslateApp {
    session: TranslationSession,
    speech_enabled: bool,
    /// Background work may still land until this instant.
    poll_until: Option<Instant>,
    poll_window: Duration,
}

impl TranslateApp {
    pub fn new(session: TranslationSession, config: &AppConfig) -> Self {
        Self {
            session,
            speech_enabled: config.speech.enabled,
            poll_until: None,
            poll_window: config.session.debounce() + REPAINT_GRACE,
        }
    }

    fn touch(&mut self) {
        self.poll_until = Some(Instant::now() + self.poll_window);
    }

    fn needs_polling(&self, state: &TranslationState) -> bool {
        state.loading || self.poll_until.is_some_and(|t| Instant::now() < t)
    }

    // ── Source column ────────────────────────────────────────────────────

    fn draw_source(&mut self, ui: &mut egui::Ui, state: &TranslationState) {
        let mut selected = state.from_language;
        egui::ComboBox::from_id_salt("from_language")
            .selected_text(selected.name())
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                ui.selectable_value(
                    &mut selected,
                    SourceLanguage::Auto,
                    SourceLanguage::Auto.name(),
                );
                for lang in Language::ALL {
                    ui.selectable_value(&mut selected, SourceLanguage::Language(lang), lang.name());
                }
            });
        if selected != state.from_language {
            self.session.set_from_language(selected);
            self.touch();
        }

        let mut text = state.from_text.clone();
        let response = ui.add(text_area(&mut text, Section::From));
        if response.changed() {
            self.session.set_from_text(text);
            self.touch();
        }
    }

    // ── Swap column ──────────────────────────────────────────────────────

    fn draw_swap(&mut self, ui: &mut egui::Ui, state: &TranslationState) {
        ui.add_space(4.0);
        let swap = ui
            .add_enabled(state.can_interchange(), egui::Button::new("⇄").frame(false))
            .on_hover_text("Swap languages");
        if swap.clicked() {
            if let Err(e) = self.session.interchange_languages() {
                log::debug!("ui: swap rejected: {e}");
            }
            self.touch();
        }
    }

    // ── Target column ────────────────────────────────────────────────────

    fn draw_target(&mut self, ui: &mut egui::Ui, state: &TranslationState) {
        let mut selected = state.to_language;
        egui::ComboBox::from_id_salt("to_language")
            .selected_text(selected.name())
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for lang in Language::ALL {
                    ui.selectable_value(&mut selected, lang, lang.name());
                }
            });
        if selected != state.to_language {
            self.session.set_to_language(selected);
            self.touch();
        }

        let mut result = state.result.clone();
        let response = ui.add(text_area(&mut result, Section::To));
        if response.changed() {
            self.session.set_result(result);
        }

        ui.horizontal(|ui| {
            if ui.button("Copy").clicked() {
                self.session.copy_result();
            }
            if self.speech_enabled && ui.button("Speak").clicked() {
                self.session.speak_result();
            }
            if state.loading {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.spinner();
                });
            }
        });
    }
}

fn text_area(text: &mut String, section: Section) -> egui::TextEdit<'_> {
    egui::TextEdit::multiline(text)
        .hint_text(section.placeholder())
        .desired_rows(10)
        .desired_width(f32::INFINITY)
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for TranslateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = self.session.snapshot();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Live Translate");
            ui.add_space(6.0);

            ui.columns(3, |cols| {
                self.draw_source(&mut cols[0], &state);
                cols[1].vertical_centered(|ui| self.draw_swap(ui, &state));
                self.draw_target(&mut cols[2], &state);
            });
        });

        // The orchestrator writes from another thread; keep repainting while
        // a result may still arrive.
        if self.needs_polling(&state) {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}
