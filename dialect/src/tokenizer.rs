//! Line scanner.
//!
//! A configuration dump is a flat list of commands where indentation marks
//! children: an unindented header such as `interface Gi0/1` or `router ospf 1`
//! owns every indented line below it. The scanner labels each run of lines
//! with a [`BlockKind`] and keeps the original line numbers for traceability.

use cfgmap_common::model::source::LineRange;
use tracing::trace;

use crate::profile::{Capability, DialectProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Global,
    Interface,
    Routing,
    Vlan,
    /// Any other section, e.g. `line vty 0 4` or a banner.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number in the source.
    pub number: usize,
    /// The line as written, without the line terminator.
    pub raw: String,
}

impl Line {
    pub fn text(&self) -> &str {
        self.raw.trim()
    }

    pub fn is_indented(&self) -> bool {
        self.raw.starts_with([' ', '\t'])
    }

    /// Whitespace-separated words of the trimmed text.
    pub fn words(&self) -> Vec<&str> {
        self.text().split_whitespace().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// For sections the first line is the header.
    pub lines: Vec<Line>,
    pub start_line: usize,
}

impl Block {
    fn open(kind: BlockKind, line: Line) -> Self {
        Self {
            kind,
            start_line: line.number,
            lines: vec![line],
        }
    }

    pub fn header(&self) -> Option<&Line> {
        match self.kind {
            BlockKind::Global => None,
            _ => self.lines.first(),
        }
    }

    /// Words of the header after its keyword, e.g. `["ospf", "1"]`.
    pub fn header_args(&self) -> Vec<&str> {
        self.header()
            .map(|line| line.words().into_iter().skip(1).collect())
            .unwrap_or_default()
    }

    /// Lines below the header; all lines for global blocks.
    pub fn body(&self) -> &[Line] {
        match self.kind {
            BlockKind::Global => &self.lines,
            _ => self.lines.get(1..).unwrap_or(&[]),
        }
    }

    pub fn line_range(&self) -> LineRange {
        let last = self.lines.last().map(|line| line.number).unwrap_or(self.start_line);
        LineRange::new(self.start_line, last)
    }
}

/// Splits `text` into labeled blocks, in source order.
pub fn tokenize(text: &str, profile: &DialectProfile) -> Vec<Block> {
    let lines: Vec<Line> = text
        .lines()
        .enumerate()
        .map(|(idx, raw)| Line {
            number: idx + 1,
            raw: raw.trim_end_matches(['\r', '\n']).trim_end().to_string(),
        })
        .filter(|line| !line.text().is_empty())
        .collect();

    let mut scanner = Scanner::new(profile);
    let mut idx = 0;
    while idx < lines.len() {
        let line = lines[idx].clone();
        let next_is_child = lines.get(idx + 1).is_some_and(Line::is_indented);
        scanner.feed(line, next_is_child);
        idx += 1;
    }
    scanner.finish()
}

struct Scanner<'p> {
    profile: &'p DialectProfile,
    blocks: Vec<Block>,
    current: Option<Block>,
    banner_delimiter: Option<String>,
}

impl<'p> Scanner<'p> {
    fn new(profile: &'p DialectProfile) -> Self {
        Self {
            profile,
            blocks: Vec::new(),
            current: None,
            banner_delimiter: None,
        }
    }

    fn feed(&mut self, line: Line, next_is_child: bool) {
        if let Some(delimiter) = &self.banner_delimiter {
            let closes = line.raw.contains(delimiter.as_str());
            self.push(line);
            if closes {
                self.banner_delimiter = None;
                self.flush();
            }
            return;
        }

        if line.is_indented() {
            let in_section = matches!(&self.current, Some(block) if block.kind != BlockKind::Global);
            if in_section {
                self.push(line);
            } else {
                // a child whose parent was cut off by a separator
                self.push_global(line);
            }
            return;
        }

        let text = line.text();
        if text.starts_with('!') || text.starts_with('#') || text.eq_ignore_ascii_case("end") {
            self.flush();
            return;
        }

        let keyword = text
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        if keyword == "banner" && self.profile.has(Capability::Banners) {
            self.open_banner(line);
            return;
        }

        let kind = self.section_kind(&keyword, &line, next_is_child);
        match kind {
            Some(kind) => {
                trace!(line = line.number, ?kind, "opening block");
                self.flush();
                self.current = Some(Block::open(kind, line));
            }
            None => self.push_global(line),
        }
    }

    fn section_kind(&self, keyword: &str, line: &Line, next_is_child: bool) -> Option<BlockKind> {
        let second = line.words().get(1).copied().unwrap_or_default();

        if keyword == self.profile.interface_header {
            return Some(BlockKind::Interface);
        }
        if keyword == self.profile.routing_header && !second.is_empty() {
            return Some(BlockKind::Routing);
        }
        if keyword == self.profile.vlan_header
            && self.profile.has(Capability::VlanBlocks)
            && second.starts_with(|c: char| c.is_ascii_digit())
        {
            return Some(BlockKind::Vlan);
        }
        if next_is_child {
            return Some(BlockKind::Unknown);
        }
        None
    }

    fn open_banner(&mut self, line: Line) {
        // banner motd ^C text ^C
        let rest: String = line.words().into_iter().skip(2).collect::<Vec<_>>().join(" ");
        let delimiter = if rest.starts_with("^C") {
            "^C".to_string()
        } else {
            rest.chars().next().map(String::from).unwrap_or_default()
        };

        self.flush();
        let closes_inline = !delimiter.is_empty() && rest[delimiter.len()..].contains(delimiter.as_str());
        self.current = Some(Block::open(BlockKind::Unknown, line));
        if delimiter.is_empty() || closes_inline {
            self.flush();
        } else {
            self.banner_delimiter = Some(delimiter);
        }
    }

    fn push(&mut self, line: Line) {
        match self.current.as_mut() {
            Some(block) => block.lines.push(line),
            None => self.current = Some(Block::open(BlockKind::Global, line)),
        }
    }

    fn push_global(&mut self, line: Line) {
        match self.current.as_mut() {
            Some(block) if block.kind == BlockKind::Global => block.lines.push(line),
            _ => {
                self.flush();
                self.current = Some(Block::open(BlockKind::Global, line));
            }
        }
    }

    fn flush(&mut self) {
        if let Some(block) = self.current.take() {
            self.blocks.push(block);
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
