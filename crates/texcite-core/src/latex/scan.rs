//! Low-level command scanner shared by the citation and heading matchers.
//!
//! Recognizes the shape `\name` `*`? `[optional]`? `{argument}` starting at a
//! backslash. The optional group may not contain `]` and the argument may not
//! contain `}`; neither group may be preceded by whitespace. All delimiters are
//! ASCII, so every offset produced here is a valid `str` boundary.

/// One command invocation found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMatch<'a> {
    pub name: &'a str,
    pub starred: bool,
    pub optional: Option<&'a str>,
    pub argument: &'a str,
    /// Byte offset of the leading backslash.
    pub start: usize,
    /// Byte offset one past the closing brace.
    pub end: usize,
}

/// Whether an empty `{}` argument is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    Required,
    MaybeEmpty,
}

/// Try to match a command at `start`, which must point at a backslash.
///
/// `accept` decides whether the command name belongs to the caller's table.
pub fn match_command_at<'a>(
    text: &'a str,
    start: usize,
    argument: Argument,
    accept: impl Fn(&str) -> bool,
) -> Option<CommandMatch<'a>> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'\\') {
        return None;
    }

    let name_start = start + 1;
    let mut pos = name_start;
    while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
        pos += 1;
    }
    let name = &text[name_start..pos];
    if name.is_empty() || !accept(name) {
        return None;
    }

    let starred = bytes.get(pos) == Some(&b'*');
    if starred {
        pos += 1;
    }

    let mut optional = None;
    if bytes.get(pos) == Some(&b'[') {
        let close = find_byte(bytes, pos + 1, b']')?;
        optional = Some(&text[pos + 1..close]);
        pos = close + 1;
    }

    if bytes.get(pos) != Some(&b'{') {
        return None;
    }
    let close = find_byte(bytes, pos + 1, b'}')?;
    let arg = &text[pos + 1..close];
    if argument == Argument::Required && arg.is_empty() {
        return None;
    }

    Some(CommandMatch {
        name,
        starred,
        optional,
        argument: arg,
        start,
        end: close + 1,
    })
}

/// Scan `text` left to right and return every non-overlapping match.
pub fn scan_commands<'a>(
    text: &'a str,
    argument: Argument,
    accept: impl Fn(&str) -> bool,
) -> Vec<CommandMatch<'a>> {
    let mut matches = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('\\') {
        let start = cursor + offset;
        match match_command_at(text, start, argument, &accept) {
            Some(found) => {
                cursor = found.end;
                matches.push(found);
            }
            None => cursor = start + 1,
        }
    }

    matches
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from..]
        .iter()
        .position(|&b| b == needle)
        .map(|offset| from + offset)
}
