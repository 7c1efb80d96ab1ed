//! Parser module for turning model replies into a command string.
//!
//! Only the first line of the reply is used. The model is told to answer
//! with a bare command, so the parser does just enough to undo the most
//! common deviation: wrapping the whole command in quotes or backticks.

/// Characters a model may wrap a command in.
const WRAPPERS: [char; 3] = ['`', '"', '\''];

/// Line boundaries, including the carriage return and the Unicode separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Return the first line of a reply after trimming the whole reply.
pub fn first_line(reply: &str) -> Option<&str> {
    let reply = reply.trim();
    if reply.is_empty() {
        return None;
    }
    reply.split(is_line_break).next()
}

/// Strip surrounding whitespace and one pair of wrapping quote/backtick characters.
///
/// The opening and closing characters only need to be wrappers, not the
/// same wrapper. Nested quoting is left alone.
pub fn clean_command(line: &str) -> String {
    let cmd = line.trim();

    let mut chars = cmd.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if WRAPPERS.contains(&first) && WRAPPERS.contains(&last) => {
            chars.as_str().trim().to_string()
        }
        _ => cmd.to_string(),
    }
}

/// Extract the command from a raw model reply.
///
/// Returns `None` when nothing is left after sanitizing.
pub fn extract_command(reply: &str) -> Option<String> {
    let cmd = clean_command(first_line(reply)?);
    if cmd.is_empty() { None } else { Some(cmd) }
}
