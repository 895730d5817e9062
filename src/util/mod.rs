#[inline]
pub fn is_alphabetic(c: char) -> bool {
    c.is_alphabetic()
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

/// Maps a byte offset to a 1-based `(line, column)` pair; columns count characters.
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = floor_char_boundary(source, offset);
    let before = &source[..offset];

    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|index| index + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;

    (line, column)
}

/// Returns the full text of the line containing `offset`, without its line break.
pub fn line_at(source: &str, offset: usize) -> &str {
    let offset = floor_char_boundary(source, offset);

    let start = source[..offset].rfind('\n').map(|index| index + 1).unwrap_or(0);
    let end = source[offset..].find('\n').map(|index| offset + index).unwrap_or(source.len());

    source[start..end].trim_end_matches('\r')
}

/// Stack space left before [`ensure_sufficient_stack`] grows the stack.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, first growing the stack onto the heap if little of it remains.
///
/// Recursive parsing and evaluation go through this so deeply nested input
/// can't overflow the host thread's stack.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

fn floor_char_boundary(source: &str, offset: usize) -> usize {
    let mut offset = offset.min(source.len());

    while !source.is_char_boundary(offset) {
        offset -= 1;
    }

    offset
}
