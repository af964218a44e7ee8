// SPDX-License-Identifier: MIT
//
// tilde: a small terminal text editor.
//
// This is the main binary that wires together the two crates:
//
//   tilde-term   → raw mode, key decoding, frame buffer, event loop
//   tilde-editor → document, highlighting, viewport, search, rendering
//
// The Editor struct implements tilde-term's App trait and is the single
// context object every operation runs against. Each keypress flows through:
//
//   stdin → decoder → on_key → prompt or key dispatch → document/cursor
//   paint → viewport.scroll → render::draw → diff renderer → terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← rows - 2
//   ├──────────────────────────────┤
//   │ status bar (INVERSE)         │  ← 1 row
//   ├──────────────────────────────┤
//   │ message / prompt line        │  ← 1 row
//   └──────────────────────────────┘

use std::env;
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use tilde_editor::config::Config;
use tilde_editor::cursor::{Cursor, Direction};
use tilde_editor::document::Document;
use tilde_editor::message::StatusMessage;
use tilde_editor::prompt::{Prompt, PromptMode, PromptOutcome};
use tilde_editor::render::{self, Scene};
use tilde_editor::search::{SearchKey, SearchSession};
use tilde_editor::viewport::Viewport;

use tilde_term::event_loop::{Action, App, EventLoop, LoopConfig};
use tilde_term::frame::FrameBuffer;
use tilde_term::input::{KeyCode, KeyEvent, Modifiers};
use tilde_term::terminal::Size;

use tracing_subscriber::EnvFilter;

/// Shown in the message bar at startup.
const HELP_MESSAGE: &str = "Ctrl-Q = Quit :: Ctrl-S = Save :: Ctrl-F = Find";

/// Environment variable that overrides the configured log filter.
const LOG_ENV: &str = "TILDE_LOG";

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The editor application state.
///
/// Owns the document and everything that describes how it is being viewed
/// and edited. No state lives outside this struct.
struct Editor {
    doc: Document,
    cursor: Cursor,
    viewport: Viewport,
    status: StatusMessage,
    prompt: Prompt,
    search: SearchSession,
    config: Config,

    /// Ctrl-Q presses still needed to quit a dirty document. Reset by any
    /// other key.
    quit_remaining: u32,

    /// Screen position of the cursor from the last paint.
    cursor_screen: Option<(u16, u16)>,

    /// Whether the last paint showed a message, so `on_tick` knows to
    /// repaint once it expires.
    message_shown: bool,
}

impl Editor {
    /// An editor on an empty document for a terminal of `size`.
    fn new(config: Config, size: Size) -> Self {
        let mut status = StatusMessage::new();
        status.set(HELP_MESSAGE);
        Self {
            doc: Document::new(),
            cursor: Cursor::default(),
            viewport: Viewport::new(usize::from(size.rows), usize::from(size.cols)),
            status,
            prompt: Prompt::new(),
            search: SearchSession::new(),
            quit_remaining: config.quit_times,
            config,
            cursor_screen: None,
            message_shown: false,
        }
    }

    /// Replace the document and put the cursor at the top.
    fn set_document(&mut self, doc: Document) {
        self.doc = doc;
        self.cursor = Cursor::default();
        self.viewport.rowoff = 0;
        self.viewport.coloff = 0;
    }

    // ── Key dispatch ──────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if self.prompt.is_open() {
            self.handle_prompt(&key);
            self.quit_remaining = self.config.quit_times;
            return Action::Continue;
        }

        if key.is_ctrl('q') {
            return self.quit();
        }

        match key.code {
            KeyCode::Char('s') if key.is_ctrl('s') => self.save(),
            KeyCode::Char('f') if key.is_ctrl('f') => self.find(),
            KeyCode::Char('h') if key.is_ctrl('h') => self.delete_before(),
            KeyCode::Char('l') if key.is_ctrl('l') => {}
            KeyCode::Escape => {}

            KeyCode::Enter => self.insert_newline(),
            KeyCode::Backspace => self.delete_before(),
            KeyCode::Delete => {
                self.cursor.step(Direction::Right, &self.doc);
                self.delete_before();
            }

            KeyCode::Left => self.cursor.step(Direction::Left, &self.doc),
            KeyCode::Right => self.cursor.step(Direction::Right, &self.doc),
            KeyCode::Up => self.cursor.step(Direction::Up, &self.doc),
            KeyCode::Down => self.cursor.step(Direction::Down, &self.doc),
            KeyCode::Home => self.cursor.home(),
            KeyCode::End => self.cursor.end(&self.doc),
            KeyCode::PageUp => {
                self.cursor
                    .page_up(&self.doc, self.viewport.rowoff, self.viewport.screenrows);
            }
            KeyCode::PageDown => {
                self.cursor
                    .page_down(&self.doc, self.viewport.rowoff, self.viewport.screenrows);
            }

            KeyCode::Tab => self.insert_bytes(b"\t"),
            KeyCode::Char(c) if key.modifiers.contains(Modifiers::CTRL) => {
                // Unbound Ctrl combinations insert their control byte.
                if let Some(byte) = control_byte(c) {
                    self.insert_bytes(&[byte]);
                }
            }
            KeyCode::Char(c) => {
                let mut utf8 = [0; 4];
                self.insert_bytes(c.encode_utf8(&mut utf8).as_bytes());
            }
        }

        self.quit_remaining = self.config.quit_times;
        Action::Continue
    }

    /// Ctrl-Q: quit, unless the document is dirty and the guard has
    /// presses left.
    fn quit(&mut self) -> Action {
        if self.doc.is_dirty() && self.quit_remaining > 0 {
            self.status.set(format!(
                "WARNING: file has unsaved changes. Press Ctrl-Q {} more times to quit.",
                self.quit_remaining
            ));
            self.quit_remaining -= 1;
            return Action::Continue;
        }
        tracing::info!(dirty = self.doc.dirty(), "quit");
        Action::Quit
    }

    // ── Editing ───────────────────────────────────────────────────────

    fn insert_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.doc.insert_char(self.cursor.cy, self.cursor.cx, b);
            self.cursor.cx += 1;
        }
    }

    fn insert_newline(&mut self) {
        self.doc.split_line(self.cursor.cy, self.cursor.cx);
        self.cursor.cy += 1;
        self.cursor.cx = 0;
    }

    fn delete_before(&mut self) {
        if let Some((cy, cx)) = self.doc.delete_before(self.cursor.cy, self.cursor.cx) {
            self.cursor = Cursor::new(cy, cx);
        }
    }

    // ── Save ──────────────────────────────────────────────────────────

    /// Ctrl-S: write the file, or ask for a name first.
    fn save(&mut self) {
        if self.doc.filename().is_none() {
            self.open_prompt(PromptMode::SaveAs);
            return;
        }
        self.write_file();
    }

    fn write_file(&mut self) {
        match self.doc.save() {
            Ok(bytes) => self.status.set(format!("{bytes} bytes written to disk")),
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                self.status.set(format!("Can't save! I/O error: {e}"));
            }
        }
    }

    // ── Search ────────────────────────────────────────────────────────

    /// Ctrl-F: start an incremental search.
    fn find(&mut self) {
        self.search.begin(self.cursor, &self.viewport);
        self.open_prompt(PromptMode::Search);
    }

    // ── Prompt ────────────────────────────────────────────────────────

    fn open_prompt(&mut self, mode: PromptMode) {
        self.prompt.open(mode);
        self.status.set(self.prompt.message());
    }

    /// Route a key to the open prompt, and in search mode to the search
    /// session as well.
    fn handle_prompt(&mut self, key: &KeyEvent) {
        let mode = self.prompt.mode();
        let outcome = self.prompt.handle_key(key);

        if mode == PromptMode::Search {
            let query = match &outcome {
                PromptOutcome::Accepted(input) => input.as_str(),
                _ => self.prompt.input(),
            };
            self.search.step(
                query,
                SearchKey::from_key(key),
                &self.doc,
                &mut self.cursor,
                &mut self.viewport,
            );
        }

        match (mode, outcome) {
            (_, PromptOutcome::Pending) => self.status.set(self.prompt.message()),
            (PromptMode::SaveAs, PromptOutcome::Accepted(name)) => {
                self.status.set("");
                self.doc.set_filename(PathBuf::from(name));
                self.write_file();
            }
            (PromptMode::SaveAs, PromptOutcome::Cancelled) => self.status.set("Save aborted!"),
            (PromptMode::Search, outcome) => {
                self.status.set("");
                let accepted = matches!(outcome, PromptOutcome::Accepted(_));
                self.search.end(accepted, &mut self.cursor, &mut self.viewport);
            }
            (PromptMode::None, _) => {}
        }
    }
}

/// The byte a terminal sends for Ctrl + `c`.
fn control_byte(c: char) -> Option<u8> {
    u8::try_from(c)
        .ok()
        .filter(|b| (b'@'..=b'_').contains(&b.to_ascii_uppercase()))
        .map(|b| b.to_ascii_uppercase() & 0x1f)
}

#[allow(clippy::cast_possible_truncation)]
const fn to_u16(n: usize) -> u16 {
    if n > u16::MAX as usize { u16::MAX } else { n as u16 }
}

// ─── App implementation ─────────────────────────────────────────────────────

impl App for Editor {
    fn on_key(&mut self, key: KeyEvent) -> Action {
        self.handle_key(key)
    }

    fn on_resize(&mut self, size: Size) {
        self.viewport
            .resize(usize::from(size.rows), usize::from(size.cols));
    }

    fn on_tick(&mut self) -> bool {
        // Repaint once so an expired message disappears.
        self.message_shown && self.status.visible(self.config.message_timeout()).is_none()
    }

    fn paint(&mut self, frame: &mut FrameBuffer) {
        let rx = self.viewport.scroll(&self.cursor, &self.doc);
        let message = self.status.visible(self.config.message_timeout());
        self.message_shown = message.is_some();

        render::draw(
            frame,
            &Scene {
                doc: &self.doc,
                cursor: &self.cursor,
                viewport: &self.viewport,
                overlay: self.search.overlay(),
                message,
            },
        );

        self.cursor_screen = self
            .viewport
            .screen_position(self.cursor.cy, rx)
            .map(|(x, y)| (to_u16(x), to_u16(y)));
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor_screen
    }
}

// ─── Startup ────────────────────────────────────────────────────────────────

/// Send `tracing` output to the log file. Logging stays off if the file
/// can't be opened; the terminal is never written to.
fn init_logging(config: &Config) {
    let Some(path) = config.log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// Print `tilde: <context>: <err>` and exit with status 1.
fn fatal(context: &str, err: &dyn Display) -> ! {
    eprintln!("tilde: {context}: {err}");
    process::exit(1);
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(&config);
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "using default config");
    }

    let path = env::args_os().nth(1).map(PathBuf::from);

    let mut event_loop = EventLoop::with_config(LoopConfig {
        poll_timeout_ms: config.poll_timeout_ms,
    })
    .unwrap_or_else(|e| fatal("failed to initialize terminal", &e));

    if let Err(e) = event_loop.enter() {
        let _ = event_loop.leave();
        fatal("failed to initialize terminal", &e);
    }

    let mut editor = Editor::new(config, event_loop.size());
    if let Some(path) = path {
        match Document::open(&path) {
            Ok(doc) => editor.set_document(doc),
            Err(e) => {
                let _ = event_loop.leave();
                fatal(&path.display().to_string(), &e);
            }
        }
    }

    if let Err(e) = event_loop.run(&mut editor) {
        fatal("terminal", &e);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Helpers ───────────────────────────────────────────────────────────

    const SIZE: Size = Size { cols: 80, rows: 24 };

    fn press(ch: char) -> KeyEvent {
        KeyEvent::plain(KeyCode::Char(ch))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::ctrl(ch)
    }

    fn enter() -> KeyEvent {
        key(KeyCode::Enter)
    }

    fn esc() -> KeyEvent {
        key(KeyCode::Escape)
    }

    fn feed(editor: &mut Editor, keys: &[KeyEvent]) {
        for &k in keys {
            editor.on_key(k);
        }
    }

    fn type_text(editor: &mut Editor, text: &str) {
        for ch in text.chars() {
            editor.on_key(press(ch));
        }
    }

    fn editor_with(lines: &[&str]) -> Editor {
        let mut e = Editor::new(Config::default(), SIZE);
        e.set_document(Document::from_lines(lines.iter().map(|s| s.as_bytes().to_vec())));
        e
    }

    fn lines(editor: &Editor) -> Vec<String> {
        editor
            .doc
            .rows()
            .iter()
            .map(|r| String::from_utf8_lossy(r.chars()).into_owned())
            .collect()
    }

    fn message(editor: &Editor) -> &str {
        editor.status.text()
    }

    fn paint(editor: &mut Editor) -> FrameBuffer {
        let mut frame = FrameBuffer::new(SIZE.cols, SIZE.rows);
        editor.paint(&mut frame);
        frame
    }

    fn row_chars(frame: &FrameBuffer, y: u16) -> String {
        frame
            .row(y)
            .unwrap()
            .iter()
            .map(|c| c.character().unwrap_or(' '))
            .collect()
    }

    // ── Startup ───────────────────────────────────────────────────────────

    #[test]
    fn starts_with_help_message() {
        let e = Editor::new(Config::default(), SIZE);
        assert_eq!(message(&e), HELP_MESSAGE);
        assert_eq!(e.viewport.screenrows, 22);
        assert_eq!(e.viewport.screencols, 80);
    }

    #[test]
    fn first_paint_shows_welcome_and_help() {
        let mut e = Editor::new(Config::default(), SIZE);
        let f = paint(&mut e);
        assert!(row_chars(&f, 7).contains("Tilde editor -- version"));
        assert!(row_chars(&f, 22).starts_with("[No Name] - 0 lines"));
        assert!(row_chars(&f, 23).starts_with(HELP_MESSAGE));
        assert_eq!(e.cursor(), Some((0, 0)));
    }

    // ── Typing ────────────────────────────────────────────────────────────

    #[test]
    fn typing_into_empty_document() {
        let mut e = Editor::new(Config::default(), SIZE);
        type_text(&mut e, "hi");
        assert_eq!(lines(&e), vec!["hi"]);
        assert_eq!(e.cursor, Cursor::new(0, 2));
        assert!(e.doc.is_dirty());
    }

    #[test]
    fn tab_inserts_tab_byte() {
        let mut e = editor_with(&["x"]);
        e.on_key(key(KeyCode::Tab));
        assert_eq!(lines(&e), vec!["\tx"]);
        paint(&mut e);
        assert_eq!(e.cursor(), Some((8, 0)));
    }

    #[test]
    fn utf8_char_inserts_its_bytes() {
        let mut e = editor_with(&[""]);
        e.on_key(press('é'));
        assert_eq!(e.doc.row(0).unwrap().chars(), "é".as_bytes());
        assert_eq!(e.cursor.cx, 2);
    }

    #[test]
    fn unbound_ctrl_key_inserts_control_byte() {
        let mut e = editor_with(&[""]);
        e.on_key(ctrl('a'));
        assert_eq!(e.doc.row(0).unwrap().chars(), &[0x01]);
    }

    #[test]
    fn ctrl_l_and_escape_are_ignored() {
        let mut e = editor_with(&["a"]);
        feed(&mut e, &[ctrl('l'), esc()]);
        assert_eq!(lines(&e), vec!["a"]);
        assert!(!e.doc.is_dirty());
    }

    #[test]
    fn control_byte_mapping() {
        assert_eq!(control_byte('a'), Some(0x01));
        assert_eq!(control_byte('Z'), Some(0x1a));
        assert_eq!(control_byte('@'), Some(0x00));
        assert_eq!(control_byte('\\'), Some(0x1c));
        assert_eq!(control_byte('1'), None);
        assert_eq!(control_byte('é'), None);
    }

    // ── Enter / Backspace / Delete ────────────────────────────────────────

    #[test]
    fn enter_splits_line() {
        let mut e = editor_with(&["hello world"]);
        e.cursor = Cursor::new(0, 5);
        e.on_key(enter());
        assert_eq!(lines(&e), vec!["hello", " world"]);
        assert_eq!(e.cursor, Cursor::new(1, 0));
    }

    #[test]
    fn enter_at_line_start_inserts_above() {
        let mut e = editor_with(&["abc"]);
        e.on_key(enter());
        assert_eq!(lines(&e), vec!["", "abc"]);
        assert_eq!(e.cursor, Cursor::new(1, 0));
    }

    #[test]
    fn backspace_at_line_start_joins() {
        let mut e = editor_with(&["ab", "cd"]);
        e.cursor = Cursor::new(1, 0);
        e.on_key(key(KeyCode::Backspace));
        assert_eq!(lines(&e), vec!["abcd"]);
        assert_eq!(e.cursor, Cursor::new(0, 2));
    }

    #[test]
    fn ctrl_h_is_backspace() {
        let mut e = editor_with(&["abc"]);
        e.cursor = Cursor::new(0, 3);
        e.on_key(ctrl('h'));
        assert_eq!(lines(&e), vec!["ab"]);
    }

    #[test]
    fn backspace_at_origin_does_nothing() {
        let mut e = editor_with(&["abc"]);
        e.on_key(key(KeyCode::Backspace));
        assert_eq!(lines(&e), vec!["abc"]);
        assert!(!e.doc.is_dirty());
    }

    #[test]
    fn delete_removes_char_under_cursor() {
        let mut e = editor_with(&["abc"]);
        e.cursor = Cursor::new(0, 1);
        e.on_key(key(KeyCode::Delete));
        assert_eq!(lines(&e), vec!["ac"]);
        assert_eq!(e.cursor, Cursor::new(0, 1));
    }

    #[test]
    fn delete_at_end_of_line_joins_next() {
        let mut e = editor_with(&["ab", "cd"]);
        e.cursor = Cursor::new(0, 2);
        e.on_key(key(KeyCode::Delete));
        assert_eq!(lines(&e), vec!["abcd"]);
        assert_eq!(e.cursor, Cursor::new(0, 2));
    }

    // ── Movement ──────────────────────────────────────────────────────────

    #[test]
    fn arrows_wrap_across_lines() {
        let mut e = editor_with(&["ab", "c"]);
        feed(&mut e, &[key(KeyCode::End), key(KeyCode::Right)]);
        assert_eq!(e.cursor, Cursor::new(1, 0));
        e.on_key(key(KeyCode::Left));
        assert_eq!(e.cursor, Cursor::new(0, 2));
    }

    #[test]
    fn page_down_scrolls_a_screen() {
        let text: Vec<String> = (0..100).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = text.iter().map(String::as_str).collect();
        let mut e = editor_with(&refs);
        e.on_key(key(KeyCode::PageDown));
        assert_eq!(e.cursor.cy, 43);
        paint(&mut e);
        assert_eq!(e.viewport.rowoff, 22);
        e.on_key(key(KeyCode::PageUp));
        assert_eq!(e.cursor.cy, 0);
    }

    // ── Quit guard ────────────────────────────────────────────────────────

    #[test]
    fn clean_document_quits_immediately() {
        let mut e = editor_with(&["a"]);
        assert_eq!(e.on_key(ctrl('q')), Action::Quit);
    }

    #[test]
    fn dirty_document_needs_extra_presses() {
        let mut e = editor_with(&["a"]);
        type_text(&mut e, "x");

        for n in [3, 2, 1] {
            assert_eq!(e.on_key(ctrl('q')), Action::Continue);
            assert_eq!(
                message(&e),
                format!("WARNING: file has unsaved changes. Press Ctrl-Q {n} more times to quit.")
            );
        }
        assert_eq!(e.on_key(ctrl('q')), Action::Quit);
    }

    #[test]
    fn other_key_resets_quit_guard() {
        let mut e = editor_with(&["a"]);
        type_text(&mut e, "x");
        feed(&mut e, &[ctrl('q'), ctrl('q')]);
        e.on_key(key(KeyCode::Left));
        assert_eq!(e.on_key(ctrl('q')), Action::Continue);
        assert!(message(&e).contains("Press Ctrl-Q 3 more times"));
    }

    // ── Save ──────────────────────────────────────────────────────────────

    #[test]
    fn save_to_existing_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let mut e = editor_with(&["hello"]);
        e.doc.set_filename(path.clone());
        type_text(&mut e, "x");

        e.on_key(ctrl('s'));
        assert_eq!(message(&e), "7 bytes written to disk");
        assert!(!e.doc.is_dirty());
        assert_eq!(fs::read(&path).unwrap(), b"xhello\n");
    }

    #[test]
    fn save_as_prompt_names_file_and_selects_syntax() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog.c");
        let mut e = editor_with(&["int x;"]);

        e.on_key(ctrl('s'));
        assert_eq!(e.prompt.mode(), PromptMode::SaveAs);
        assert_eq!(message(&e), "Save as:  (ESC to cancel)");

        type_text(&mut e, path.to_str().unwrap());
        e.on_key(enter());

        assert!(!e.prompt.is_open());
        assert_eq!(message(&e), "7 bytes written to disk");
        assert_eq!(e.doc.filetype(), "c");
        assert_eq!(fs::read(&path).unwrap(), b"int x;\n");
    }

    #[test]
    fn save_as_escape_aborts() {
        let mut e = editor_with(&["a"]);
        feed(&mut e, &[ctrl('s'), press('n'), esc()]);
        assert_eq!(message(&e), "Save aborted!");
        assert_eq!(e.doc.filename(), None);
        assert!(!e.prompt.is_open());
    }

    #[test]
    fn save_failure_reports_and_stays_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = editor_with(&["a"]);
        e.doc.set_filename(dir.path().join("missing").join("f.txt"));
        type_text(&mut e, "x");

        e.on_key(ctrl('s'));
        assert!(message(&e).starts_with("Can't save! I/O error: "));
        assert!(e.doc.is_dirty());
    }

    // ── Search ────────────────────────────────────────────────────────────

    #[test]
    fn search_moves_cursor_incrementally() {
        let mut e = editor_with(&["alpha", "beta", "gamma beta"]);
        e.on_key(ctrl('f'));
        assert_eq!(
            message(&e),
            "Search:  (ESC/Enter to cancel, Arrows to navigate)"
        );

        type_text(&mut e, "be");
        assert_eq!(e.cursor, Cursor::new(1, 0));
        assert_eq!(message(&e), "Search: be (ESC/Enter to cancel, Arrows to navigate)");

        e.on_key(key(KeyCode::Down));
        assert_eq!(e.cursor, Cursor::new(2, 6));
        e.on_key(key(KeyCode::Down));
        assert_eq!(e.cursor, Cursor::new(1, 0));
        e.on_key(key(KeyCode::Up));
        assert_eq!(e.cursor, Cursor::new(2, 6));
    }

    #[test]
    fn search_enter_keeps_match() {
        let mut e = editor_with(&["a", "needle"]);
        e.on_key(ctrl('f'));
        type_text(&mut e, "needle");
        e.on_key(enter());
        assert_eq!(e.cursor, Cursor::new(1, 0));
        assert!(!e.prompt.is_open());
        assert_eq!(e.search.overlay(), None);
        assert_eq!(message(&e), "");
    }

    #[test]
    fn search_escape_restores_cursor() {
        let mut e = editor_with(&["abc", "x", "needle"]);
        e.cursor = Cursor::new(0, 2);
        e.on_key(ctrl('f'));
        type_text(&mut e, "needle");
        assert_eq!(e.cursor.cy, 2);
        e.on_key(esc());
        assert_eq!(e.cursor, Cursor::new(0, 2));
        assert_eq!(e.viewport.rowoff, 0);
    }

    #[test]
    fn search_match_is_painted_and_scrolled_to_top() {
        let text: Vec<String> = (0..60).map(|i| format!("row {i}")).collect();
        let refs: Vec<&str> = text.iter().map(String::as_str).collect();
        let mut e = editor_with(&refs);
        e.on_key(ctrl('f'));
        type_text(&mut e, "row 40");

        let f = paint(&mut e);
        assert_eq!(e.viewport.rowoff, 40);
        assert!(row_chars(&f, 0).starts_with("row 40"));
        let match_fg = tilde_editor::syntax::Highlight::Match.color();
        assert_eq!(f.get(0, 0).unwrap().style.fg, match_fg);
        assert_eq!(e.cursor(), Some((0, 0)));
    }

    #[test]
    fn search_without_match_leaves_cursor() {
        let mut e = editor_with(&["abc"]);
        e.cursor = Cursor::new(0, 1);
        e.on_key(ctrl('f'));
        type_text(&mut e, "zzz");
        assert_eq!(e.cursor, Cursor::new(0, 1));
    }

    // ── Status message ────────────────────────────────────────────────────

    #[test]
    fn tick_repaints_once_message_expires() {
        let mut e = editor_with(&["a"]);
        paint(&mut e);
        assert!(e.message_shown);
        assert!(!e.on_tick());

        e.config.message_timeout_secs = 0;
        assert!(e.on_tick());
        let f = paint(&mut e);
        assert!(!e.message_shown);
        assert_eq!(row_chars(&f, 23).trim_end(), "");
        assert!(!e.on_tick());
    }

    #[test]
    fn status_bar_reflects_document() {
        let mut e = editor_with(&["a", "b"]);
        e.doc.set_filename(PathBuf::from("main.c"));
        e.cursor = Cursor::new(1, 0);
        type_text(&mut e, "x");
        let f = paint(&mut e);
        let bar = row_chars(&f, 22);
        assert!(bar.starts_with("main.c - 2 lines (modified)"));
        assert!(bar.trim_end().ends_with("c | 2/2"));
    }

    // ── Resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_updates_viewport() {
        let mut e = editor_with(&["a"]);
        e.on_resize(Size { cols: 40, rows: 10 });
        assert_eq!(e.viewport.screenrows, 8);
        assert_eq!(e.viewport.screencols, 40);
    }
}
