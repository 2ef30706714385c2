//! Word wrapping for console output
//!
//! Lines are broken at the last space before the column limit. A single word
//! longer than the limit is cut at the limit. The breaking space is consumed
//! by the line break; everything else in the text is kept as is.

/// Column at which console messages are wrapped.
pub const WRAP_WIDTH: usize = 78;

/// Platform line terminator used for console output and the log file.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
/// Platform line terminator used for console output and the log file.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Wrap `text` into lines of at most `width` characters.
///
/// Existing newlines in `text` start a new line. A zero `width` is treated
/// as one.
pub fn word_wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    text.split('\n')
        .flat_map(|segment| wrap_segment(segment, width))
        .collect()
}

fn wrap_segment(segment: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = segment.chars().collect();
    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut last_space = 0;

    for current in 0..chars.len() {
        let overflow = current - line_start >= width;
        if chars[current] == ' ' {
            if overflow {
                lines.push(collect(&chars[line_start..current]));
                line_start = current + 1;
            }
            last_space = current;
        } else if overflow && line_start >= last_space {
            // no space on this line: cut the word
            lines.push(collect(&chars[line_start..current]));
            line_start = current;
            last_space = current;
        } else if overflow {
            lines.push(collect(&chars[line_start..last_space]));
            line_start = last_space + 1;
            last_space = line_start;
        }
    }

    if line_start < chars.len() || lines.is_empty() {
        lines.push(collect(&chars[line_start.min(chars.len())..]));
    }
    lines
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}
