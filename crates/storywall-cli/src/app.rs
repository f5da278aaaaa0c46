//! Event dispatcher around [`AppState`].
//!
//! Keyboard events become `AppState` updates. The two slow operations, the
//! entry load and place lookups, run as tokio tasks and report back over
//! channels that [`App::poll_background`] drains once per frame.

use std::{collections::HashMap, time::Duration};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use storywall_core::{
  entry::Entry,
  photo::PhotoPayload,
  place::{PlaceCandidate, PlaceField, PlaceResolver},
  sink::LogSink,
  state::{AppState, QueryTicket, View},
  store::{EntrySource, EntryStore},
};
use tokio::{
  sync::{mpsc, oneshot},
  task::JoinHandle,
};

use crate::client::NominatimClient;

// ─── Form focus ───────────────────────────────────────────────────────────────

/// The form field receiving keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Name,
  BirthName,
  From,
  Now,
  Message,
  Photo,
}

impl Focus {
  pub const ALL: [Focus; 6] = [
    Focus::Name,
    Focus::BirthName,
    Focus::From,
    Focus::Now,
    Focus::Message,
    Focus::Photo,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Focus::Name => "Name",
      Focus::BirthName => "Birth name",
      Focus::From => "From",
      Focus::Now => "Now",
      Focus::Message => "Message",
      Focus::Photo => "Photo file",
    }
  }

  pub fn place_field(self) -> Option<PlaceField> {
    match self {
      Focus::From => Some(PlaceField::From),
      Focus::Now => Some(PlaceField::Now),
      _ => None,
    }
  }

  fn index(self) -> usize { Self::ALL.iter().position(|f| *f == self).unwrap_or(0) }

  fn next(self) -> Self { Self::ALL[(self.index() + 1) % Self::ALL.len()] }

  fn prev(self) -> Self { Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()] }
}

// ─── App ──────────────────────────────────────────────────────────────────────

type LookupResult = (QueryTicket, Vec<PlaceCandidate>);

/// Top-level application state.
pub struct App {
  /// Everything the wall shows and the draft being written.
  pub state: AppState,

  /// Where `Esc` returns to from the form.
  pub previous_view: View,

  /// Focused form field.
  pub focus: Focus,

  /// Highlighted row in the focused place field's suggestion list.
  pub suggestion_cursor: usize,

  /// Path typed into the photo field.
  pub photo_path: String,

  /// Path the current photo preview was read from.
  pub preview_path: Option<String>,

  /// Cursor position within the *filtered* gallery.
  pub gallery_cursor: usize,

  /// Current fuzzy-filter string for the gallery.
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  resolver:   PlaceResolver<NominatimClient>,
  debounce:   Duration,
  sink:       LogSink,
  lookups:    HashMap<PlaceField, JoinHandle<()>>,
  results_tx: mpsc::UnboundedSender<LookupResult>,
  results_rx: mpsc::UnboundedReceiver<LookupResult>,
  entries_rx: Option<oneshot::Receiver<EntryStore>>,
}

impl App {
  pub fn new(resolver: PlaceResolver<NominatimClient>, debounce: Duration) -> Self {
    let (results_tx, results_rx) = mpsc::unbounded_channel();
    Self {
      state: AppState::default(),
      previous_view: View::Map,
      focus: Focus::Name,
      suggestion_cursor: 0,
      photo_path: String::new(),
      preview_path: None,
      gallery_cursor: 0,
      filter: String::new(),
      filter_active: false,
      status_msg: String::new(),
      resolver,
      debounce,
      sink: LogSink,
      lookups: HashMap::new(),
      results_tx,
      results_rx,
      entries_rx: None,
    }
  }

  // ── Background work ───────────────────────────────────────────────────────

  /// Start loading entries. The interface keeps running meanwhile.
  pub fn spawn_entry_load<S>(&mut self, source: S)
  where
    S: EntrySource + 'static,
  {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let store = EntryStore::load(&source).await;
      // The receiver is gone only if the app already quit.
      let _ = tx.send(store);
    });
    self.entries_rx = Some(rx);
    self.status_msg = "Loading stories…".into();
  }

  pub fn is_loading(&self) -> bool { self.entries_rx.is_some() }

  /// Apply whatever background tasks have finished since the last frame.
  pub fn poll_background(&mut self) {
    if let Some(rx) = &mut self.entries_rx {
      match rx.try_recv() {
        Ok(store) => {
          self.status_msg = format!("{} stories on the wall", store.len());
          self.state.set_entries(store);
          self.gallery_cursor = 0;
          self.entries_rx = None;
        }
        Err(oneshot::error::TryRecvError::Empty) => {}
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_msg.clear();
          self.entries_rx = None;
        }
      }
    }

    while let Ok((ticket, candidates)) = self.results_rx.try_recv() {
      if self.state.apply_suggestions(ticket, candidates) {
        self.suggestion_cursor = 0;
      }
    }
  }

  /// Issue a lookup for `ticket`, cancelling the field's previous one.
  fn query_place(&mut self, ticket: QueryTicket, query: String) {
    if let Some(handle) = self.lookups.remove(&ticket.field) {
      handle.abort();
    }
    self.suggestion_cursor = 0;

    if query.trim().is_empty() {
      self.state.apply_suggestions(ticket, Vec::new());
      return;
    }

    let resolver = self.resolver.clone();
    let tx = self.results_tx.clone();
    let debounce = self.debounce;
    let handle = tokio::spawn(async move {
      tokio::time::sleep(debounce).await;
      let candidates = resolver.resolve(&query).await;
      let _ = tx.send((ticket, candidates));
    });
    self.lookups.insert(ticket.field, handle);
  }

  fn cancel_lookups(&mut self) {
    for (_, handle) in self.lookups.drain() {
      handle.abort();
    }
  }

  // ── Gallery ───────────────────────────────────────────────────────────────

  /// Gallery entries matching the current filter query.
  pub fn filtered_entries(&self) -> Vec<&Entry> {
    let gallery = self.state.entries.gallery();
    if self.filter.is_empty() {
      return gallery.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    gallery
      .iter()
      .filter(|e| {
        [
          Some(e.name.as_str()),
          e.birth_name.as_deref(),
          Some(e.from.as_str()),
          Some(e.now.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|text| matcher.fuzzy_match(text, &self.filter).is_some())
      })
      .collect()
  }

  /// The entry under the gallery cursor, if any.
  pub fn cursor_entry(&self) -> Option<&Entry> {
    self.filtered_entries().get(self.gallery_cursor).copied()
  }

  /// Suggestions for the focused field, if it is a place field.
  pub fn focused_suggestions(&self) -> &[PlaceCandidate] {
    match self.focus.place_field() {
      Some(field) => self.state.suggestions.field(field).candidates(),
      None => &[],
    }
  }

  // ── View switching ────────────────────────────────────────────────────────

  fn switch_view(&mut self, view: View) {
    if self.state.view != View::Form {
      self.previous_view = self.state.view;
    }
    self.filter_active = false;
    self.state.set_view(view);
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      self.cancel_lookups();
      return Ok(false);
    }

    match key.code {
      KeyCode::F(1) => self.switch_view(View::Map),
      KeyCode::F(2) => self.switch_view(View::Gallery),
      KeyCode::F(3) => self.switch_view(View::Form),
      KeyCode::F(5) => self.state.toggle_theme(),
      _ => {
        if self.filter_active {
          self.handle_filter_key(key);
          return Ok(true);
        }
        return match self.state.view {
          View::Map => Ok(self.handle_browse_key(key)),
          View::Gallery => Ok(self.handle_gallery_key(key)),
          View::Form => {
            self.handle_form_key(key).await;
            Ok(true)
          }
        };
      }
    }
    Ok(true)
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
      }
      KeyCode::Enter => self.filter_active = false,
      KeyCode::Backspace => {
        self.filter.pop();
      }
      KeyCode::Char(c) => self.filter.push(c),
      _ => return,
    }
    self.gallery_cursor = 0;
  }

  /// Keys shared by the map and gallery views. Returns `false` to quit.
  fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => {
        self.cancel_lookups();
        return false;
      }
      KeyCode::Char('1') => self.switch_view(View::Map),
      KeyCode::Char('2') => self.switch_view(View::Gallery),
      KeyCode::Char('3') | KeyCode::Char('n') => self.switch_view(View::Form),
      KeyCode::Char('t') => self.state.toggle_theme(),
      _ => {}
    }
    true
  }

  fn handle_gallery_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_entries().len();
        if self.gallery_cursor + 1 < len {
          self.gallery_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.gallery_cursor = self.gallery_cursor.saturating_sub(1);
      }
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.gallery_cursor = 0;
      }
      KeyCode::Esc if !self.filter.is_empty() => {
        self.filter.clear();
        self.gallery_cursor = 0;
      }
      _ => return self.handle_browse_key(key),
    }
    true
  }

  async fn handle_form_key(&mut self, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
      if key.code == KeyCode::Char('s') {
        self.submit().await;
      }
      return;
    }

    let suggestions = self.focused_suggestions().len();
    match key.code {
      KeyCode::Esc => match self.focus.place_field() {
        Some(field) if suggestions > 0 => self.state.dismiss_suggestions(field),
        _ => self.switch_view(self.previous_view),
      },
      KeyCode::Tab => self.move_focus(self.focus.next()),
      KeyCode::BackTab => self.move_focus(self.focus.prev()),
      KeyCode::Down if suggestions > 0 => {
        if self.suggestion_cursor + 1 < suggestions {
          self.suggestion_cursor += 1;
        }
      }
      KeyCode::Up if suggestions > 0 => {
        self.suggestion_cursor = self.suggestion_cursor.saturating_sub(1);
      }
      KeyCode::Down => self.move_focus(self.focus.next()),
      KeyCode::Up => self.move_focus(self.focus.prev()),
      KeyCode::Enter => self.handle_form_enter().await,
      KeyCode::Backspace => self.edit_focused(|text| {
        text.pop();
      }),
      KeyCode::Char(c) => self.edit_focused(|text| text.push(c)),
      _ => {}
    }
  }

  fn move_focus(&mut self, focus: Focus) {
    self.focus = focus;
    self.suggestion_cursor = 0;
  }

  async fn handle_form_enter(&mut self) {
    if let Some(field) = self.focus.place_field() {
      let chosen = self
        .state
        .suggestions
        .field(field)
        .candidates()
        .get(self.suggestion_cursor)
        .cloned();
      if let Some(candidate) = chosen {
        if let Some(handle) = self.lookups.remove(&field) {
          handle.abort();
        }
        self.state.select_place(field, &candidate);
        self.suggestion_cursor = 0;
        self.move_focus(self.focus.next());
        return;
      }
    }

    match self.focus {
      Focus::Photo => self.load_or_confirm_photo().await,
      focus => self.move_focus(focus.next()),
    }
  }

  /// Apply `edit` to the focused field's text.
  fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
    let draft = &self.state.draft;
    let mut text = match self.focus {
      Focus::Name => draft.name.clone(),
      Focus::BirthName => draft.birth_name.clone(),
      Focus::From => draft.from.clone(),
      Focus::Now => draft.now.clone(),
      Focus::Message => draft.message.clone(),
      Focus::Photo => self.photo_path.clone(),
    };
    edit(&mut text);

    match self.focus {
      Focus::Name => self.state.draft.set_name(text),
      Focus::BirthName => self.state.draft.set_birth_name(text),
      Focus::Message => self.state.draft.set_message(&text),
      Focus::Photo => self.photo_path = text,
      Focus::From | Focus::Now => {
        if let Some(field) = self.focus.place_field() {
          let ticket = self.state.set_place_text(field, text.clone());
          self.query_place(ticket, text);
        }
      }
    }
  }

  // ── Photo & submission ────────────────────────────────────────────────────

  /// First `Enter` previews the typed file; a second one on the same path
  /// confirms it into the draft.
  async fn load_or_confirm_photo(&mut self) {
    let path = self.photo_path.trim().to_owned();
    if path.is_empty() {
      self.status_msg = "Type the path of a JPEG or PNG to attach.".into();
      return;
    }

    if self.preview_path.as_deref() == Some(path.as_str()) && self.state.confirm_photo() {
      self.status_msg = "Photo attached.".into();
      return;
    }

    match PhotoPayload::read(&path).await {
      Ok(photo) => {
        self.status_msg = format!(
          "Previewing {} ({} KiB). Press Enter again to attach.",
          photo.media_type(),
          photo.size().div_ceil(1024)
        );
        self.state.load_photo(photo);
        self.preview_path = Some(path);
      }
      Err(e) => {
        tracing::warn!(path = %path, error = %e, "could not load photo");
        self.status_msg = format!("Photo: {e}");
      }
    }
  }

  async fn submit(&mut self) {
    match self.state.submit(&self.sink).await {
      Ok(submission) => {
        self.cancel_lookups();
        self.photo_path.clear();
        self.preview_path = None;
        self.focus = Focus::Name;
        self.suggestion_cursor = 0;
        self.status_msg = format!(
          "Thank you, {}! Your story was sent for review.",
          submission.entry.name
        );
      }
      Err(e) => self.status_msg = format!("Cannot submit: {e}"),
    }
  }
}
