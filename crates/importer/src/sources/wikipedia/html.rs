//! Minimal table extraction for server-rendered wiki pages.
//!
//! Tag matching runs on an ASCII-lowercased copy of the document. Lowercasing
//! ASCII only keeps byte offsets identical, so positions found in the copy
//! slice the original directly.

use crate::normalize::normalize_ws;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlCell {
    pub text: String,
    pub is_header: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTable {
    pub rows: Vec<Vec<HtmlCell>>,
}

impl HtmlTable {
    pub fn header(&self) -> Option<&[HtmlCell]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Rows after the header, minus repeated header rows and empty rows.
    pub fn body(&self) -> impl Iterator<Item = &[HtmlCell]> {
        self.rows
            .iter()
            .skip(1)
            .map(Vec::as_slice)
            .filter(|row| !row.is_empty() && !row.iter().all(|cell| cell.is_header))
    }
}

/// Every `<table>` in document order, nested tables included, the way a
/// positional index over the page's tables counts them.
pub fn extract_tables(html: &str) -> Vec<HtmlTable> {
    let lc = html.to_ascii_lowercase();
    let spans = table_spans(&lc);

    spans
        .iter()
        .map(|span| {
            let nested: Vec<(usize, usize)> = spans
                .iter()
                .filter(|other| other.start > span.start && other.end <= span.end)
                .map(|other| (other.start, other.end))
                .collect();
            let direct = without_ranges(html, span.content_start, span.content_end, &nested);
            HtmlTable {
                rows: parse_rows(&direct),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct TableSpan {
    start: usize,
    content_start: usize,
    content_end: usize,
    end: usize,
}

fn table_spans(lc: &str) -> Vec<TableSpan> {
    let mut events: Vec<(usize, bool)> = Vec::new();

    let mut pos = 0;
    while let Some(open) = find_open_tag(lc, "table", pos) {
        events.push((open, true));
        pos = open + 1;
    }
    pos = 0;
    while let Some(close) = find_close_tag(lc, "table", pos) {
        events.push((close, false));
        pos = close + 1;
    }
    events.sort_unstable();

    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut spans = Vec::new();
    for (at, is_open) in events {
        if is_open {
            let content_start = tag_end(lc, at).unwrap_or(lc.len());
            stack.push((at, content_start));
        } else if let Some((start, content_start)) = stack.pop() {
            let end = tag_end(lc, at).unwrap_or(lc.len());
            spans.push(TableSpan {
                start,
                content_start,
                content_end: at.max(content_start),
                end,
            });
        }
    }

    spans.sort_by_key(|span| span.start);
    spans
}

/// Copy `html[from..to]`, leaving out the given (sorted, possibly overlapping) ranges.
fn without_ranges(html: &str, from: usize, to: usize, skip: &[(usize, usize)]) -> String {
    let mut out = String::with_capacity(to.saturating_sub(from));
    let mut cursor = from;
    for &(start, end) in skip {
        if end <= cursor {
            continue;
        }
        if start > cursor {
            out.push_str(&html[cursor..start.min(to)]);
        }
        cursor = end.min(to);
    }
    if cursor < to {
        out.push_str(&html[cursor..to]);
    }
    out
}

fn parse_rows(table_html: &str) -> Vec<Vec<HtmlCell>> {
    let lc = table_html.to_ascii_lowercase();
    let mut rows = Vec::new();

    let mut pos = 0;
    while let Some(row_start) = find_open_tag(&lc, "tr", pos) {
        let Some(body_start) = tag_end(&lc, row_start) else {
            break;
        };
        let next_row = find_open_tag(&lc, "tr", body_start);
        let row_close = find_close_tag(&lc, "tr", body_start);
        let body_end = match (row_close, next_row) {
            (Some(close), Some(next)) => close.min(next),
            (Some(close), None) => close,
            (None, Some(next)) => next,
            (None, None) => lc.len(),
        };

        rows.push(parse_cells(&table_html[body_start..body_end]));
        pos = body_end;
    }

    rows
}

fn parse_cells(row_html: &str) -> Vec<HtmlCell> {
    let lc = row_html.to_ascii_lowercase();
    let mut cells = Vec::new();

    let mut pos = 0;
    while let Some((cell_start, is_header)) = next_cell(&lc, pos) {
        let Some(body_start) = tag_end(&lc, cell_start) else {
            break;
        };
        let body_end = [
            next_cell(&lc, body_start).map(|(at, _)| at),
            find_close_tag(&lc, "td", body_start),
            find_close_tag(&lc, "th", body_start),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(lc.len());

        cells.push(HtmlCell {
            text: cell_text(&row_html[body_start..body_end]),
            is_header,
        });
        pos = body_end;
    }

    cells
}

fn next_cell(lc: &str, from: usize) -> Option<(usize, bool)> {
    match (find_open_tag(lc, "td", from), find_open_tag(lc, "th", from)) {
        (Some(td), Some(th)) if th < td => Some((th, true)),
        (Some(td), _) => Some((td, false)),
        (None, Some(th)) => Some((th, true)),
        (None, None) => None,
    }
}

/// Visible text of a cell: hidden elements, styles and scripts dropped,
/// tags stripped, entities decoded, whitespace collapsed.
pub fn cell_text(cell_html: &str) -> String {
    let visible = drop_elements(cell_html, |lc_tag| {
        lc_tag.starts_with("<style")
            || lc_tag.starts_with("<script")
            || lc_tag.replace(' ', "").contains("display:none")
    });
    normalize_ws(&decode_entities(&strip_tags(&visible)))
}

/// Remove every element whose opening tag satisfies `hidden`, up to the first
/// matching close tag of the same name.
fn drop_elements(html: &str, hidden: impl Fn(&str) -> bool) -> String {
    let lc = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    let mut search = 0;

    while let Some(rel) = lc.get(search..).and_then(|rest| rest.find('<')) {
        let open = search + rel;
        let Some(open_end) = tag_end(&lc, open) else {
            break;
        };
        let tag = &lc[open..open_end];
        let name: String = tag[1..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();

        if !name.is_empty() && hidden(tag) && !tag.ends_with("/>") {
            out.push_str(&html[cursor..open]);
            let close = find_close_tag(&lc, &name, open_end)
                .and_then(|close| tag_end(&lc, close))
                .unwrap_or(lc.len());
            cursor = close;
            search = close;
        } else {
            search = open_end;
        }
    }

    out.push_str(&html[cursor..]);
    out
}

pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|semi| *semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|ch| (ch, semi)));

        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }

    match name {
        "nbsp" => Some(' '),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "ndash" => Some('–'),
        "mdash" => Some('—'),
        _ => None,
    }
}

/// Position of `<tag` followed by whitespace, `>` or `/`, so `<th` never
/// matches `<thead`.
fn find_open_tag(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let pat = format!("<{}", tag);
    let mut pos = from;
    loop {
        let start = pos + lc.get(pos..)?.find(&pat)?;
        let after = start + pat.len();
        match lc.as_bytes().get(after) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(start),
            Some(_) => pos = after,
            None => return None,
        }
    }
}

fn find_close_tag(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let pat = format!("</{}", tag);
    lc.get(from..)?.find(&pat).map(|rel| rel + from)
}

/// Offset just past the `>` closing the tag that starts at `at`.
fn tag_end(lc: &str, at: usize) -> Option<usize> {
    lc.get(at..)?.find('>').map(|rel| at + rel + 1)
}
