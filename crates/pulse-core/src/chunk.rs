// SPDX-License-Identifier: Apache-2.0

//! Splitting rendered text into message-sized chunks.

/// Splits `text` into chunks strictly shorter than `limit` characters.
///
/// Lines are never broken: a line that alone reaches the limit becomes its
/// own oversized chunk. Joining the chunks with `\n` yields `text` again.
/// Length is counted in Unicode scalar values.
#[must_use]
pub fn split_into_chunks(text: &str, limit: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    // None until the first line; an empty line is still a line.
    let mut buffer: Option<(String, usize)> = None;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        match buffer.as_mut() {
            None => buffer = Some((line.to_string(), line_len)),
            Some((current, current_len)) => {
                if *current_len + 1 + line_len >= limit {
                    chunks.push(std::mem::replace(current, line.to_string()));
                    *current_len = line_len;
                } else {
                    current.push('\n');
                    current.push_str(line);
                    *current_len += 1 + line_len;
                }
            }
        }
    }

    if let Some((current, _)) = buffer {
        chunks.push(current);
    }
    chunks
}
