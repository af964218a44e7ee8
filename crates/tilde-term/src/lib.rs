// SPDX-License-Identifier: MIT
//
// tilde-term: the terminal layer under the tilde editor.
//
// Raw mode, window size, key decoding, and a differential renderer that
// turns a grid of styled cells into the smallest ANSI stream that brings
// the screen up to date. The editor paints a FrameBuffer; this crate
// worries about bytes.
//
// No TUI framework underneath: termios and escape sequences directly,
// one write() per frame.

pub mod ansi;
pub mod cell;
pub mod color;
pub mod diff;
pub mod event_loop;
pub mod frame;
pub mod input;
pub mod reader;
pub mod terminal;
