//! Low-level output: indicators, indentation and the scalar writers.
//!
//! Every write goes through [`Emitter::write_str`] so that `column` is always
//! the number of characters on the current line.

use super::analysis::{is_break, is_printable};
use super::Emitter;
use crate::error::Error;
use std::borrow::Cow;
use std::io::Write;

/// Width of the word starting at `from`, up to the next space or break.
fn word_width(chars: &[char], from: usize) -> usize {
    chars[from..]
        .iter()
        .take_while(|&&ch| ch != ' ' && !is_break(ch))
        .count()
}

fn escape(ch: char, allow_unicode: bool) -> Cow<'static, str> {
    let short = match ch {
        '\0' => "\\0",
        '\u{7}' => "\\a",
        '\u{8}' => "\\b",
        '\t' => "\\t",
        '\n' => "\\n",
        '\u{B}' => "\\v",
        '\u{C}' => "\\f",
        '\r' => "\\r",
        '\u{1B}' => "\\e",
        '"' => "\\\"",
        '\\' => "\\\\",
        '\u{85}' => "\\N",
        '\u{A0}' => "\\_",
        '\u{2028}' => "\\L",
        '\u{2029}' => "\\P",
        _ => "",
    };
    if !short.is_empty() {
        return Cow::Borrowed(short);
    }
    let code = ch as u32;
    if allow_unicode && ch != '\u{FEFF}' && is_printable(ch) {
        Cow::Owned(ch.to_string())
    } else if code <= 0xFF {
        Cow::Owned(format!("\\x{:02X}", code))
    } else if code <= 0xFFFF {
        Cow::Owned(format!("\\u{:04X}", code))
    } else {
        Cow::Owned(format!("\\U{:08X}", code))
    }
}

fn needs_escape(ch: char) -> bool {
    matches!(ch, '"' | '\\') || !('\u{20}'..='\u{7E}').contains(&ch)
}

fn escaped_width(chars: &[char], allow_unicode: bool) -> usize {
    chars
        .iter()
        .take_while(|&&ch| ch != ' ')
        .map(|&ch| {
            if needs_escape(ch) {
                escape(ch, allow_unicode).chars().count()
            } else {
                1
            }
        })
        .sum()
}

impl<W: Write> Emitter<W> {
    pub(super) fn write_str(&mut self, data: &str) -> Result<(), Error> {
        self.column += data.chars().count();
        self.writer.write_all(data.as_bytes())?;
        Ok(())
    }

    fn write_chars(&mut self, chars: &[char]) -> Result<(), Error> {
        if chars.is_empty() {
            return Ok(());
        }
        let data: String = chars.iter().collect();
        self.write_str(&data)
    }

    pub(super) fn write_indicator(
        &mut self,
        indicator: &str,
        need_whitespace: bool,
        whitespace: bool,
        indentation: bool,
    ) -> Result<(), Error> {
        if !self.whitespace && need_whitespace {
            self.write_str(" ")?;
        }
        self.whitespace = whitespace;
        self.indention = self.indention && indentation;
        self.open_ended = false;
        self.write_str(indicator)
    }

    pub(super) fn write_indent(&mut self) -> Result<(), Error> {
        let indent = self.indent.unwrap_or(0);
        if !self.indention || self.column > indent || (self.column == indent && !self.whitespace) {
            self.write_line_break(None)?;
        }
        if self.column < indent {
            self.write_whitespace(indent - self.column)?;
        }
        Ok(())
    }

    pub(super) fn write_whitespace(&mut self, length: usize) -> Result<(), Error> {
        if length == 0 {
            return Ok(());
        }
        self.whitespace = true;
        self.write_str(&" ".repeat(length))
    }

    pub(super) fn write_line_break(&mut self, data: Option<&str>) -> Result<(), Error> {
        self.whitespace = true;
        self.indention = true;
        self.writer
            .write_all(data.unwrap_or(self.settings.line_break).as_bytes())?;
        self.column = 0;
        Ok(())
    }

    /// `\n` becomes the configured line break; other breaks are kept.
    fn write_break(&mut self, br: char) -> Result<(), Error> {
        if br == '\n' {
            self.write_line_break(None)
        } else {
            self.write_line_break(Some(&br.to_string()))
        }
    }

    fn fold_needed(&self, next_word: usize) -> bool {
        self.column + 1 + next_word > self.settings.best_width
    }

    pub(super) fn write_version_directive(&mut self, version: &str) -> Result<(), Error> {
        self.write_str("%YAML ")?;
        self.write_str(version)?;
        self.write_line_break(None)
    }

    pub(super) fn write_tag_directive(&mut self, handle: &str, prefix: &str) -> Result<(), Error> {
        self.write_str("%TAG ")?;
        self.write_str(handle)?;
        self.write_str(" ")?;
        self.write_str(prefix)?;
        self.write_line_break(None)
    }

    /// Folds at single spaces so that the next word stays within the width.
    pub(super) fn write_plain(&mut self, text: &str, split: bool) -> Result<(), Error> {
        if self.root_context {
            self.open_ended = true;
        }
        if text.is_empty() {
            return Ok(());
        }
        if !self.whitespace {
            self.write_str(" ")?;
        }
        self.whitespace = false;
        self.indention = false;

        let chars: Vec<char> = text.chars().collect();
        let mut spaces = false;
        let mut start = 0;
        for end in 0..=chars.len() {
            let ch = chars.get(end).copied();
            if spaces {
                if ch != Some(' ') {
                    if start + 1 == end
                        && split
                        && ch.is_some()
                        && self.fold_needed(word_width(&chars, end))
                    {
                        self.write_indent()?;
                        self.whitespace = false;
                        self.indention = false;
                    } else {
                        self.write_chars(&chars[start..end])?;
                    }
                    start = end;
                }
            } else if ch.map_or(true, |ch| ch == ' ') {
                self.write_chars(&chars[start..end])?;
                start = end;
            }
            if let Some(ch) = ch {
                spaces = ch == ' ';
            }
        }
        Ok(())
    }

    pub(super) fn write_single_quoted(&mut self, text: &str, split: bool) -> Result<(), Error> {
        self.write_indicator("'", true, false, false)?;
        let chars: Vec<char> = text.chars().collect();
        let mut spaces = false;
        let mut start = 0;
        for end in 0..=chars.len() {
            let ch = chars.get(end).copied();
            if spaces {
                if ch != Some(' ') {
                    if start + 1 == end
                        && split
                        && start != 0
                        && ch.is_some()
                        && self.fold_needed(word_width(&chars, end))
                    {
                        self.write_indent()?;
                    } else {
                        self.write_chars(&chars[start..end])?;
                    }
                    start = end;
                }
            } else if ch.map_or(true, |ch| ch == ' ' || ch == '\'') {
                self.write_chars(&chars[start..end])?;
                start = end;
            }
            if ch == Some('\'') {
                self.write_str("''")?;
                start = end + 1;
            }
            if let Some(ch) = ch {
                spaces = ch == ' ';
            }
        }
        self.write_indicator("'", false, false, false)
    }

    pub(super) fn write_double_quoted(&mut self, text: &str, split: bool) -> Result<(), Error> {
        self.write_indicator("\"", true, false, false)?;
        let allow_unicode = self.settings.allow_unicode;
        let chars: Vec<char> = text.chars().collect();
        let mut start = 0;
        for end in 0..=chars.len() {
            let ch = chars.get(end).copied();
            // A line break between two non-space characters reads back as one space.
            if split
                && ch == Some(' ')
                && end > 0
                && end + 1 < chars.len()
                && chars[end - 1] != ' '
                && chars[end + 1] != ' '
            {
                let pending = end - start;
                let next = escaped_width(&chars[end + 1..], allow_unicode);
                if self.column + pending + 1 + next > self.settings.best_width {
                    self.write_chars(&chars[start..end])?;
                    self.write_indent()?;
                    self.whitespace = false;
                    self.indention = false;
                    start = end + 1;
                    continue;
                }
            }
            if ch.map_or(true, needs_escape) {
                self.write_chars(&chars[start..end])?;
                start = end;
                if let Some(ch) = ch {
                    let data = escape(ch, allow_unicode);
                    self.write_str(&data)?;
                    start = end + 1;
                }
            }
        }
        self.write_indicator("\"", false, false, false)
    }

    /// Indentation and chomping indicators for a block scalar header.
    fn block_hints(&self, text: &str) -> String {
        let mut hints = String::new();
        if text.starts_with(|ch: char| ch == ' ' || is_break(ch)) {
            hints.push_str(&self.settings.best_indent.to_string());
        }
        let mut tail = text.chars().rev();
        match tail.next() {
            Some(last) if !is_break(last) => hints.push('-'),
            Some(_) => match tail.next() {
                None => hints.push('+'),
                Some(previous) if is_break(previous) => hints.push('+'),
                Some(_) => {}
            },
            None => {}
        }
        hints
    }

    fn write_block_header(&mut self, indicator: char, text: &str) -> Result<(), Error> {
        let hints = self.block_hints(text);
        self.write_indicator(&format!("{}{}", indicator, hints), true, false, false)?;
        if hints.ends_with('+') {
            self.open_ended = true;
        }
        if !self.write_inline_comments()? {
            self.write_line_break(None)?;
        }
        Ok(())
    }

    pub(super) fn write_literal(&mut self, text: &str) -> Result<(), Error> {
        self.write_block_header('|', text)?;
        let chars: Vec<char> = text.chars().collect();
        let mut breaks = true;
        let mut start = 0;
        for end in 0..=chars.len() {
            let ch = chars.get(end).copied();
            if breaks {
                if !ch.map_or(false, is_break) {
                    for &br in &chars[start..end] {
                        self.write_break(br)?;
                    }
                    if ch.is_some() {
                        self.write_indent()?;
                    }
                    start = end;
                }
            } else if ch.map_or(true, is_break) {
                self.write_chars(&chars[start..end])?;
                if ch.is_none() {
                    self.write_line_break(None)?;
                }
                start = end;
            }
            if let Some(ch) = ch {
                breaks = is_break(ch);
            }
        }
        Ok(())
    }

    pub(super) fn write_folded(&mut self, text: &str, split: bool) -> Result<(), Error> {
        self.write_block_header('>', text)?;
        let chars: Vec<char> = text.chars().collect();
        let mut leading_space = true;
        let mut spaces = false;
        let mut breaks = true;
        let mut start = 0;
        for end in 0..=chars.len() {
            let ch = chars.get(end).copied();
            if breaks {
                if !ch.map_or(false, is_break) {
                    // A single break between two text lines must be doubled to survive folding.
                    if !leading_space && ch.map_or(false, |ch| ch != ' ') && chars[start] == '\n' {
                        self.write_line_break(None)?;
                    }
                    leading_space = ch == Some(' ');
                    for &br in &chars[start..end] {
                        self.write_break(br)?;
                    }
                    if ch.is_some() {
                        self.write_indent()?;
                    }
                    start = end;
                }
            } else if spaces {
                if ch != Some(' ') {
                    if start + 1 == end
                        && split
                        && !leading_space
                        && ch.map_or(false, |ch| !is_break(ch))
                        && self.fold_needed(word_width(&chars, end))
                    {
                        self.write_indent()?;
                    } else {
                        self.write_chars(&chars[start..end])?;
                    }
                    start = end;
                }
            } else if ch.map_or(true, |ch| ch == ' ' || is_break(ch)) {
                self.write_chars(&chars[start..end])?;
                if ch.is_none() {
                    self.write_line_break(None)?;
                }
                start = end;
            }
            if let Some(ch) = ch {
                breaks = is_break(ch);
                spaces = ch == ' ';
            }
        }
        Ok(())
    }
}
