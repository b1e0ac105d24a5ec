/// Strips a small set of known-dangerous HTML constructs from a summary.
///
/// Removes ` style="..."` / ` style='...'` attributes and complete
/// `<script ...> ... </script>` blocks, both case-insensitive and with
/// the script content removed along with the tags. This is a best-effort
/// strip for feed validators that flag inline styles and scripts, not a
/// full sanitizer. Empty input yields an empty string.
pub fn sanitize_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    strip_script_blocks(&strip_style_attributes(html))
}

/// Removes every whitespace-prefixed `style=` attribute with a quoted
/// value. An unquoted or unterminated value is left in place.
fn strip_style_attributes(html: &str) -> String {
    const NEEDLE: &[u8] = b"style=";
    let bytes = html.as_bytes();
    let mut out = String::with_capacity(html.len());
    let mut run_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let attr_start = i + 1;
        if bytes[i].is_ascii_whitespace()
            && bytes.len() > attr_start + NEEDLE.len()
            && bytes[attr_start..attr_start + NEEDLE.len()].eq_ignore_ascii_case(NEEDLE)
        {
            let quote = bytes[attr_start + NEEDLE.len()];
            if quote == b'"' || quote == b'\'' {
                let value_start = attr_start + NEEDLE.len() + 1;
                if let Some(rel) = bytes[value_start..].iter().position(|&b| b == quote) {
                    // Skips happen at ASCII boundaries only, so the copied
                    // run is always valid UTF-8.
                    out.push_str(&html[run_start..i]);
                    i = value_start + rel + 1;
                    run_start = i;
                    continue;
                }
            }
        }
        i += 1;
    }

    out.push_str(&html[run_start..]);
    out
}

/// Removes complete `<script ...> ... </script>` blocks. An opening tag
/// with no matching close is left untouched.
fn strip_script_blocks(html: &str) -> String {
    let bytes = html.as_bytes();
    let mut out = String::with_capacity(html.len());
    let mut run_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            if let Some(block_end) = script_block_end(bytes, i) {
                out.push_str(&html[run_start..i]);
                i = block_end;
                run_start = i;
                continue;
            }
        }
        i += 1;
    }

    out.push_str(&html[run_start..]);
    out
}

/// Returns the index one past the `</script>` close of a block whose `<`
/// sits at `open`, or `None` when `open` does not start a complete block.
/// Whitespace is tolerated after `<` and around the closing `/`.
fn script_block_end(bytes: &[u8], open: usize) -> Option<usize> {
    let name = skip_ws(bytes, open + 1);
    if !is_script_name(bytes, name) {
        return None;
    }

    // Rest of the opening tag, up to its '>'
    let tag_close = name + 6 + bytes[name + 6..].iter().position(|&b| b == b'>')?;

    let mut i = tag_close + 1;
    loop {
        let lt = i + bytes[i..].iter().position(|&b| b == b'<')?;
        let mut j = skip_ws(bytes, lt + 1);
        if j < bytes.len() && bytes[j] == b'/' {
            j = skip_ws(bytes, j + 1);
            if is_script_name(bytes, j) {
                j = skip_ws(bytes, j + 6);
                if j < bytes.len() && bytes[j] == b'>' {
                    return Some(j + 1);
                }
            }
        }
        i = lt + 1;
    }
}

fn is_script_name(bytes: &[u8], i: usize) -> bool {
    bytes.len() >= i + 6 && bytes[i..i + 6].eq_ignore_ascii_case(b"script")
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}
