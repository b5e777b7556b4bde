//! Terminal application loop

use crate::runtime::{StoreHandle, StoreUpdate};
use crate::store::{Composer, Event, StoreState};
use crate::tui::view;
use crossterm::event::{
    Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Chat,
    Documents,
}

/// View-owned state: the latest store snapshot plus the router's echo and
/// the composer.
pub struct App {
    pub state: StoreState,
    pub composer: Composer,
    pub panel: Panel,
    pub document_index: usize,
    pub last_error: Option<String>,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        Self {
            state: StoreState::default(),
            composer: Composer::new(),
            panel: Panel::Chat,
            document_index: 0,
            last_error: None,
            should_quit: false,
        }
    }

    async fn handle_update(&mut self, update: StoreUpdate, handle: &StoreHandle) {
        match update {
            StoreUpdate::State(state) => self.state = state,
            StoreUpdate::NavigationRequested { conversation_id } => {
                // The router echo: accept the store's navigation request
                // and feed the new "URL" back in.
                navigate(Some(conversation_id), handle).await;
            }
            StoreUpdate::Error { message } => self.last_error = Some(message),
        }
    }

    async fn handle_key(&mut self, key: KeyEvent, handle: &StoreHandle) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Global bindings
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('n') => handle.send(Event::CreateConversation).await,
                _ => {}
            }
            return;
        }
        if key.code == KeyCode::Tab {
            self.panel = match self.panel {
                Panel::Chat => Panel::Documents,
                Panel::Documents => Panel::Chat,
            };
            return;
        }

        match self.panel {
            Panel::Chat => self.handle_chat_key(key, handle).await,
            Panel::Documents => self.handle_documents_key(key, handle).await,
        }
    }

    async fn handle_chat_key(&mut self, key: KeyEvent, handle: &StoreHandle) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => {
                // Same path as an explicit send action: the composer
                // clears at dispatch, the store validates the prompt.
                let prompt = self.composer.submit();
                handle.send(Event::SubmitMessage { prompt }).await;
            }
            KeyCode::Backspace => self.composer.backspace(),
            KeyCode::Up => self.switch_conversation(-1, handle).await,
            KeyCode::Down => self.switch_conversation(1, handle).await,
            KeyCode::Char(c) => self.composer.push_char(c),
            _ => {}
        }
    }

    async fn handle_documents_key(&mut self, key: KeyEvent, handle: &StoreHandle) {
        let count = self.state.documents.as_ref().map_or(0, Vec::len);
        match key.code {
            KeyCode::Esc => self.panel = Panel::Chat,
            KeyCode::Up => self.document_index = self.document_index.saturating_sub(1),
            KeyCode::Down if count > 0 => {
                self.document_index = (self.document_index + 1).min(count - 1);
            }
            KeyCode::Char('r') => handle.send(Event::LoadDocuments).await,
            _ => {}
        }
    }

    /// Move the selection up or down the conversation list by navigating,
    /// exactly like clicking a sidebar entry.
    async fn switch_conversation(&mut self, step: isize, handle: &StoreHandle) {
        let Some(conversations) = self.state.conversations.as_ref() else {
            return;
        };
        if conversations.is_empty() {
            return;
        }

        let selected = self.state.selection();
        let current = conversations
            .iter()
            .position(|c| Some(&c.conversation_id) == selected.as_ref())
            .unwrap_or(0);
        let target = current
            .saturating_add_signed(step)
            .min(conversations.len() - 1);
        let conversation_id = conversations[target].conversation_id.clone();

        if Some(&conversation_id) != selected.as_ref() {
            navigate(Some(conversation_id), handle).await;
        }
    }
}

/// The router boundary: a navigation is just the conversation id changing,
/// observed by the store as an external input.
async fn navigate(conversation_id: Option<String>, handle: &StoreHandle) {
    handle.send(Event::RouteChanged { conversation_id }).await;
}

/// Run the terminal UI until the user quits.
pub async fn run(handle: StoreHandle, initial_route: Option<String>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut update_rx = handle.subscribe();
    let mut app = App::new();

    // Startup: apply the entry route and load everything, as on mount.
    navigate(initial_route, &handle).await;
    handle.send(Event::LoadConversations).await;
    handle.send(Event::LoadDocuments).await;

    let result = run_loop(&mut terminal, &mut app, &handle, &mut update_rx).await;

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    handle: &StoreHandle,
    update_rx: &mut broadcast::Receiver<StoreUpdate>,
) -> io::Result<()> {
    let mut term_events = EventStream::new();

    loop {
        terminal.draw(|frame| view::draw(frame, app))?;

        tokio::select! {
            maybe_event = term_events.next() => {
                match maybe_event {
                    Some(Ok(TermEvent::Key(key))) => app.handle_key(key, handle).await,
                    Some(Ok(_)) => {} // resize etc.: redraw on next pass
                    Some(Err(e)) => return Err(e),
                    None => return Ok(()),
                }
            }
            update = update_rx.recv() => {
                match update {
                    Ok(update) => app.handle_update(update, handle).await,
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => return Ok(()),
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
