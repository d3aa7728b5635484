const OPEN_TAG: &str = "<think>";
const CLOSE_TAG: &str = "</think>";

/// Removes every `<think>...</think>` block from model output.
///
/// Scanning starts at the leftmost `<think>`. Nested tags are counted so a
/// block that balances is removed whole; a block that never balances ends at
/// the first `</think>` after it, the same span a non-greedy match covers. An
/// opening tag with no closing tag after it stays in the text, as does a
/// stray `</think>`.
pub fn strip_reasoning(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find(OPEN_TAG) {
        match block_end(&rest[open..]) {
            Some(end) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + end..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

/// Length of the block starting at `block` (which begins with `<think>`), or
/// `None` when no `</think>` follows.
fn block_end(block: &str) -> Option<usize> {
    let first_close = block.find(CLOSE_TAG)? + CLOSE_TAG.len();

    let mut depth = 0usize;
    let mut pos = 0;
    while pos < block.len() {
        let tail = &block[pos..];
        if tail.starts_with(OPEN_TAG) {
            depth += 1;
            pos += OPEN_TAG.len();
        } else if tail.starts_with(CLOSE_TAG) {
            depth -= 1;
            pos += CLOSE_TAG.len();
            if depth == 0 {
                return Some(pos);
            }
        } else {
            pos += tail.chars().next().map_or(1, char::len_utf8);
        }
    }

    Some(first_close)
}
