// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

pub fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    if text_len(text) <= max_len {
        return text.to_owned();
    }

    if max_len == 1 {
        return "…".to_owned();
    }

    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

pub fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Greedy word wrap at `width` chars; words longer than a line are split.
pub(crate) fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0usize;

        for word in paragraph.split_whitespace() {
            let word_len = text_len(word);
            if line_len > 0 && line_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }

            if word_len > width {
                let chars = word.chars().collect::<Vec<_>>();
                let mut chunks = chars.chunks(width).peekable();
                while let Some(chunk) = chunks.next() {
                    let piece = chunk.iter().collect::<String>();
                    if chunks.peek().is_some() {
                        lines.push(piece);
                    } else {
                        line_len = chunk.len();
                        line = piece;
                    }
                }
                continue;
            }

            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.push_str(word);
            line_len += word_len;
        }

        if line_len > 0 || paragraph.split_whitespace().next().is_none() {
            lines.push(line);
        }
    }

    lines
}
