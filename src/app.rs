use crate::event::{AppEvent, Effect};
use crate::podcast_form::{MAX_ARTICLE_COUNT, MIN_ARTICLE_COUNT, PodcastForm, RequestPhase};
use crate::script_generator::ScriptGenerator;
use crate::widgets::scrollable_paragraph::ScrollableParagraphState;
use crate::widgets::text_field::TextField;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::Backend};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

pub const GENERATION_FAILED_ALERT: &str = "エラーが発生しました。もう一度お試しください。";

/// Controls in tab order.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum FocusedField {
    #[default]
    Topic, // Focus starts here
    ArticleCount,
    ListenerMessage,
    GenerateButton,
    Script, // Only reachable once a script is on screen
}

impl FocusedField {
    const ORDER: [FocusedField; 5] = [
        FocusedField::Topic,
        FocusedField::ArticleCount,
        FocusedField::ListenerMessage,
        FocusedField::GenerateButton,
        FocusedField::Script,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }
}

pub struct App {
    pub should_quit: bool,
    pub form: PodcastForm, // Source of truth for what gets submitted
    pub focused_field: FocusedField,
    // Editing buffers; each keystroke is synced into `form`
    pub topic_input: TextField,
    pub article_count_input: TextField, // Raw text, may be empty or out of range
    pub listener_message_input: TextField,
    pub script_state: ScrollableParagraphState, // Scroll position of the result panel
    /// Blocking failure notice; swallows input until dismissed.
    pub alert: Option<&'static str>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> App {
        let form = PodcastForm::new();
        let count_text = form.article_count().map(|n| n.to_string()).unwrap_or_default();
        App {
            should_quit: false,
            topic_input: TextField::new(form.topic()),
            article_count_input: TextField::new(&count_text),
            listener_message_input: TextField::multiline(form.listener_message()),
            form,
            focused_field: FocusedField::default(),
            script_state: ScrollableParagraphState::default(), // Content arrives with the first script
            alert: None,
        }
    }

    /// Whether the result panel is on screen; an empty script is not shown.
    pub fn has_script(&self) -> bool {
        self.form.script().is_some_and(|s| !s.is_empty())
    }

    // ======================================= Focus ===============================================

    pub fn focus_next_field(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_prev_field(&mut self) {
        self.step_focus(FocusedField::ORDER.len() - 1);
    }

    fn step_focus(&mut self, step: usize) {
        let len = FocusedField::ORDER.len();
        let mut index = self.focused_field.index();
        loop {
            index = (index + step) % len;
            let candidate = FocusedField::ORDER[index];
            // The script panel only takes focus while it is visible.
            if candidate != FocusedField::Script || self.has_script() {
                self.focused_field = candidate;
                return;
            }
        }
    }

    // ====================================== Editing ==============================================

    fn focused_input(&mut self) -> Option<&mut TextField> {
        match self.focused_field {
            FocusedField::Topic => Some(&mut self.topic_input),
            FocusedField::ArticleCount => Some(&mut self.article_count_input),
            FocusedField::ListenerMessage => Some(&mut self.listener_message_input),
            FocusedField::GenerateButton | FocusedField::Script => None,
        }
    }

    /// Pushes the focused input's text into the form.
    fn sync_focused_field(&mut self) {
        match self.focused_field {
            FocusedField::Topic => self.form.set_topic(self.topic_input.text()),
            FocusedField::ArticleCount => {
                self.form.set_article_count(parse_article_count(self.article_count_input.text()))
            }
            FocusedField::ListenerMessage => {
                self.form.set_listener_message(self.listener_message_input.text())
            }
            FocusedField::GenerateButton | FocusedField::Script => {}
        }
    }

    fn edit_focused(&mut self, key: KeyCode) {
        let numeric_only = self.focused_field == FocusedField::ArticleCount;
        let accepts = |ch: char| !numeric_only || ch.is_ascii_digit() || ch == '-';
        let Some(input) = self.focused_input() else {
            return;
        };
        match key {
            KeyCode::Char(ch) if accepts(ch) => input.insert(ch),
            KeyCode::Backspace => {
                input.backspace();
            }
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            _ => return,
        }
        self.sync_focused_field();
    }

    /// Native number-spinner behavior: one step, held inside [1, 5].
    pub fn step_article_count(&mut self, delta: i64) {
        let next = match self.form.article_count() {
            Some(n) => n.saturating_add(delta).clamp(MIN_ARTICLE_COUNT, MAX_ARTICLE_COUNT),
            None => MIN_ARTICLE_COUNT,
        };
        self.article_count_input.set_text(&next.to_string());
        self.form.set_article_count(Some(next));
    }

    // ===================================== Requests ==============================================

    /// Requests a generation. `None` while the submit control is disabled.
    pub fn submit(&mut self) -> Option<Effect> {
        self.form.begin_generate().map(Effect::SubmitRequest)
    }

    /// Single boundary where request outcomes reach the UI.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ScriptGenerated(result) => match self.form.finish_generate(result) {
                RequestPhase::Succeeded => {
                    let script = self.form.script().unwrap_or_default().to_string();
                    self.script_state.set_content(&script);
                }
                RequestPhase::Failed => self.alert = Some(GENERATION_FAILED_ALERT), // Previous script stays
                RequestPhase::Idle | RequestPhase::Requesting => {} // Stray completion, already logged
            },
        }
    }

    // --- Key Handler ---
    pub fn on_key(&mut self, key: KeyEvent) -> Option<Effect> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        // Alert is modal
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('g') => return self.submit(), // Works from any field
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return None;
            }
            KeyCode::Tab => {
                self.focus_next_field();
                return None;
            }
            KeyCode::BackTab => {
                self.focus_prev_field();
                return None;
            }
            _ => {}
        }

        match self.focused_field {
            FocusedField::Topic => match key.code {
                KeyCode::Enter => self.focus_next_field(), // Single line: Enter moves on
                code => self.edit_focused(code),
            },
            FocusedField::ArticleCount => match key.code {
                KeyCode::Up => self.step_article_count(1),
                KeyCode::Down => self.step_article_count(-1),
                KeyCode::Enter => self.focus_next_field(),
                code => self.edit_focused(code),
            },
            FocusedField::ListenerMessage => match key.code {
                // Multiline: Enter is a line break, Tab leaves the field
                KeyCode::Enter => self.edit_focused(KeyCode::Char('\n')),
                code => self.edit_focused(code),
            },
            FocusedField::GenerateButton => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => return self.submit(), // None while loading
                _ => {}
            },
            FocusedField::Script => match key.code {
                KeyCode::Down => self.script_state.scroll_down(1),
                KeyCode::Up => self.script_state.scroll_up(1),
                KeyCode::PageDown => self.script_state.scroll_down(5), // Capped at the last wrapped row
                KeyCode::PageUp => self.script_state.scroll_up(5),
                _ => {}
            },
        }
        None
    }
}

/// Count field text to the submitted value. Anything that is not an integer is `None`.
pub fn parse_article_count(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Runs an effect off the UI thread and reports back through `event_tx`.
pub fn run_effect(
    effect: Effect,
    generator: Arc<dyn ScriptGenerator>,
    event_tx: UnboundedSender<AppEvent>,
) {
    match effect {
        Effect::SubmitRequest(request) => {
            tokio::spawn(async move {
                let result = generator.generate(&request).await;
                if event_tx.send(AppEvent::ScriptGenerated(result)).is_err() {
                    info!("run_effect: UI closed before the script arrived");
                }
            });
        }
    }
}

pub fn start_ui(mut app: App, generator: Arc<dyn ScriptGenerator>) -> Result<()> {
    // Set up the terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app_loop(&mut terminal, &mut app, generator);

    // Restore the terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        error!("UI loop failed: {}", e);
    }
    res
}

pub fn run_app_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    generator: Arc<dyn ScriptGenerator>,
) -> Result<()> {
    let (event_tx, mut event_rx) = unbounded_channel::<AppEvent>();

    while !app.should_quit {
        let frame_size = terminal.size()?;
        crate::ui::prepare_ui_layout(app, frame_size);
        terminal.draw(|f| crate::ui::ui(f, app))?;

        // Short poll so finished requests show up without a keypress
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key_event) = event::read()? {
                if let Some(effect) = app.on_key(key_event) {
                    run_effect(effect, generator.clone(), event_tx.clone());
                }
            }
        }

        // Drain everything that finished since the last frame
        while let Ok(app_event) = event_rx.try_recv() {
            app.handle_event(app_event);
        }
    }

    Ok(())
}
