//! The mutable document model (spec §3 "Container nodes", §6 "Operations").
//!
//! A [`Document`] wraps a rowan *mutable* tree (`SyntaxNode::new_root_mut`).
//! Reading it back out (`Display`/`to_string`) is just `self.node.text()` —
//! rowan recomputes the green text lazily from whatever was and wasn't
//! edited, which is exactly the round-trip law from spec §3 ("An unmutated
//! subtree renders back to its exact original bytes") with no emitter code
//! of our own to get wrong.
//!
//! TOML's header syntax is already flat (`[a.b.c]` is a sibling of `[a]`,
//! never nested inside it), so [`TABLE_HEADER`](crate::lex::SyntaxKind::TABLE_HEADER)
//! nodes sit directly under [`ROOT`](crate::lex::SyntaxKind::ROOT) and each
//! one owns its own body (the entries/trivia up to the next header) as
//! direct children. A dotted path like `a.b` that has no table of its own
//! — only a deeper `[a.b.c]` — is never materialized as a node; it's
//! represented by [`TableRepr::Implicit`], a pure navigational view, the
//! same `setdefault`-without-allocation idea as tomlkit's implicit tables
//! (spec §4.4).

use crate::error::{Error, ErrorKind};
use crate::lex::{SyntaxKind, SyntaxNode};
use crate::parser::{self, key::path_segments};
use crate::value::{
    self, auto_key_style, format_key, Base, Bool, DateNode, DateTimeNode, Float, Integer,
    NaiveDate, NaiveDateTime, NaiveTime, QuoteStyle, StringNode, TimeNode,
};
use rowan::NodeOrToken;
use std::fmt;

/// A value to write with [`Table::set`] or [`ArrayValue::push`]. Style
/// (quote kind, numeric base, separators) is auto-derived the way spec §3
/// describes ("Style is auto-derived when not given").
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Array(Vec<Value>),
}

macro_rules! value_from {
    ($t:ty, $variant:ident) => {
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v.into())
            }
        }
    };
}
value_from!(i64, Integer);
value_from!(i32, Integer);
value_from!(f64, Float);
value_from!(bool, Bool);
value_from!(String, String);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl Value {
    /// Render canonical TOML source text for this value.
    fn to_lexeme(&self) -> String {
        match self {
            Value::String(s) => {
                let (style, multiline) = StringNode::auto_style(s);
                StringNode::format(s, style, multiline)
            }
            Value::Integer(i) => Integer::format(*i, Base::Decimal, false),
            Value::Float(f) => Float::format(*f, false, false),
            Value::Bool(b) => Bool::format(*b).to_string(),
            Value::Date(d) => d.to_string(),
            Value::Time(t) => t.to_string(),
            Value::DateTime(dt) => dt.to_string(),
            Value::Array(items) => {
                let inner: Vec<String> = items.iter().map(Value::to_lexeme).collect();
                format!("[{}]", inner.join(", "))
            }
        }
    }
}

/// A read-only view into whatever an entry or header resolved to.
pub enum Item {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Array(ArrayValue),
    Table(Table),
    ArrayOfTables(ArrayOfTables),
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::String(s) => write!(f, "String({:?})", s),
            Item::Integer(i) => write!(f, "Integer({})", i),
            Item::Float(x) => write!(f, "Float({})", x),
            Item::Bool(b) => write!(f, "Bool({})", b),
            Item::Date(d) => write!(f, "Date({})", d),
            Item::Time(t) => write!(f, "Time({})", t),
            Item::DateTime(dt) => write!(f, "DateTime({})", dt),
            Item::Array(_) => write!(f, "Array(..)"),
            Item::Table(_) => write!(f, "Table(..)"),
            Item::ArrayOfTables(_) => write!(f, "ArrayOfTables(..)"),
        }
    }
}

fn decode_value_node(node: &SyntaxNode) -> Option<Item> {
    let token = node
        .children_with_tokens()
        .find_map(|el| el.into_token())?;
    Some(match token.kind() {
        SyntaxKind::STRING => Item::String(StringNode(token).value()),
        SyntaxKind::INTEGER => Item::Integer(Integer(token).value()),
        SyntaxKind::FLOAT => Item::Float(Float(token).value()),
        SyntaxKind::BOOL => Item::Bool(Bool(token).value()),
        SyntaxKind::DATE => Item::Date(DateNode(token).value()),
        SyntaxKind::TIME => Item::Time(TimeNode(token).value()),
        SyntaxKind::DATETIME => Item::DateTime(DateTimeNode(token).value()),
        _ => return None,
    })
}

fn decode_item(node: &SyntaxNode, root: &SyntaxNode) -> Option<Item> {
    match node.kind() {
        SyntaxKind::ARRAY => Some(Item::Array(ArrayValue(node.clone()))),
        SyntaxKind::INLINE_TABLE => Some(Item::Table(Table {
            root: root.clone(),
            path: Vec::new(),
            kind: Kind::Node(node.clone()),
        })),
        _ => decode_value_node(node),
    }
}

/// Re-render an already-decoded [`Item`] back to source text: scalars go
/// through [`Value::to_lexeme`], containers reuse their own node's current
/// text verbatim (they already live in the tree).
fn item_lexeme(item: &Item) -> String {
    match item {
        Item::String(s) => Value::String(s.clone()).to_lexeme(),
        Item::Integer(i) => Value::Integer(*i).to_lexeme(),
        Item::Float(f) => Value::Float(*f).to_lexeme(),
        Item::Bool(b) => Value::Bool(*b).to_lexeme(),
        Item::Date(d) => Value::Date(*d).to_lexeme(),
        Item::Time(t) => Value::Time(*t).to_lexeme(),
        Item::DateTime(dt) => Value::DateTime(*dt).to_lexeme(),
        Item::Array(a) => a.0.text().to_string(),
        Item::Table(t) => t.container().map(|n| n.text().to_string()).unwrap_or_default(),
        Item::ArrayOfTables(_) => String::new(),
    }
}

/// The scalar-type tag for an already-decoded [`Item`] (spec §3 invariant
/// 4), or `None` for a container item, which is exempt from the lock.
fn scalar_tag_for_item(item: &Item) -> Option<&'static str> {
    Some(match item {
        Item::String(_) => "string",
        Item::Integer(_) => "integer",
        Item::Float(_) => "float",
        Item::Bool(_) => "bool",
        Item::Date(_) => "date",
        Item::Time(_) => "time",
        Item::DateTime(_) => "datetime",
        Item::Array(_) | Item::Table(_) | Item::ArrayOfTables(_) => return None,
    })
}

fn entry_key_path(entry: &SyntaxNode) -> Option<SyntaxNode> {
    entry
        .children()
        .find(|n| n.kind() == SyntaxKind::KEY_PATH)
}

/// The `  # comment` suffix on an `ENTRY`, whitespace included, if any.
fn entry_trailing_comment(entry: &SyntaxNode) -> Option<String> {
    let children: Vec<_> = entry.children_with_tokens().collect();
    let comment_pos = children
        .iter()
        .position(|el| el.as_token().map(|t| t.kind()) == Some(SyntaxKind::COMMENT))?;
    let comment_text = children[comment_pos].as_token()?.text().to_string();
    let ws_text = if comment_pos > 0 {
        children[comment_pos - 1]
            .as_token()
            .filter(|t| t.kind() == SyntaxKind::WHITESPACE)
            .map(|t| t.text().to_string())
    } else {
        None
    };
    Some(format!("{}{}", ws_text.unwrap_or_default(), comment_text))
}

fn header_key_path(header: &SyntaxNode) -> Option<SyntaxNode> {
    header
        .children()
        .find(|n| n.kind() == SyntaxKind::KEY_PATH)
}

fn header_path(header: &SyntaxNode) -> Vec<String> {
    header_key_path(header)
        .map(|p| path_segments(&p))
        .unwrap_or_default()
}

/// How a [`Table`] is actually represented in the tree.
enum Kind {
    /// The document root: always present, always a real container.
    Root,
    /// An explicit `[a.b]` header, or an inline `{ ... }` table value.
    Node(SyntaxNode),
    /// No node exists for this path; it's implied by a deeper explicit
    /// table. Read-only until something is set under it, at which point
    /// the chain materializes (spec §4.4 "setdefault").
    Implicit,
}

/// A TOML table: either the document root, an explicit `[header]` table, an
/// inline `{ ... }` table, or an implicit (unmaterialized) intermediate.
pub struct Table {
    root: SyntaxNode,
    path: Vec<String>,
    kind: Kind,
}

impl Table {
    fn container(&self) -> Option<&SyntaxNode> {
        match &self.kind {
            Kind::Root => Some(&self.root),
            Kind::Node(n) => Some(n),
            Kind::Implicit => None,
        }
    }

    fn entries(&self) -> Vec<SyntaxNode> {
        match self.container() {
            None => Vec::new(),
            Some(node) => node
                .children()
                .filter(|c| c.kind() == SyntaxKind::ENTRY)
                .collect(),
        }
    }

    fn find_entry(&self, key: &str) -> Option<SyntaxNode> {
        self.entries().into_iter().find(|e| {
            entry_key_path(e)
                .map(|p| path_segments(&p) == [key.to_string()])
                .unwrap_or(false)
        })
    }

    fn child_headers(&self, key: &str) -> (Vec<SyntaxNode>, Vec<SyntaxNode>) {
        let mut want = self.path.clone();
        want.push(key.to_string());
        let mut tables = Vec::new();
        let mut arrays = Vec::new();
        for child in self.root.children() {
            match child.kind() {
                SyntaxKind::TABLE_HEADER if header_path(&child) == want => tables.push(child),
                SyntaxKind::ARRAY_HEADER if header_path(&child) == want => arrays.push(child),
                _ => {}
            }
        }
        (tables, arrays)
    }

    fn has_deeper_header(&self, key: &str) -> bool {
        let mut want = self.path.clone();
        want.push(key.to_string());
        self.root.children().any(|child| {
            matches!(child.kind(), SyntaxKind::TABLE_HEADER | SyntaxKind::ARRAY_HEADER)
                && header_path(&child).len() > want.len()
                && header_path(&child)[..want.len()] == want[..]
        })
    }

    /// Look up a single key (not a dotted path) directly under this table.
    pub fn get(&self, key: &str) -> Option<Item> {
        if let Some(entry) = self.find_entry(key) {
            let value_node = entry
                .children()
                .find(|c| matches!(c.kind(), SyntaxKind::ARRAY | SyntaxKind::INLINE_TABLE));
            if let Some(v) = value_node {
                return decode_item(&v, &self.root);
            }
            return decode_value_node(&entry);
        }
        let (tables, arrays) = self.child_headers(key);
        if !arrays.is_empty() {
            let mut want = self.path.clone();
            want.push(key.to_string());
            return Some(Item::ArrayOfTables(ArrayOfTables {
                root: self.root.clone(),
                path: want,
            }));
        }
        if let Some(t) = tables.into_iter().next() {
            let mut want = self.path.clone();
            want.push(key.to_string());
            return Some(Item::Table(Table {
                root: self.root.clone(),
                path: want,
                kind: Kind::Node(t),
            }));
        }
        if self.has_deeper_header(key) {
            let mut want = self.path.clone();
            want.push(key.to_string());
            return Some(Item::Table(Table {
                root: self.root.clone(),
                path: want,
                kind: Kind::Implicit,
            }));
        }
        None
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys of direct `key = value` entries, in document order.
    pub fn keys(&self) -> Vec<String> {
        self.entries()
            .iter()
            .filter_map(|e| entry_key_path(e).map(|p| path_segments(&p).join(".")))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty() && !self.has_any_child_table()
    }

    /// Keys of direct child tables / arrays-of-tables declared with their
    /// own `[prefix.key]` / `[[prefix.key]]` header (as opposed to
    /// `keys()`, which only covers `key = value` entries). Each key
    /// appears once even if several `[[...]]` headers repeat it.
    pub fn child_table_keys(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for child in self.root.children() {
            if !matches!(child.kind(), SyntaxKind::TABLE_HEADER | SyntaxKind::ARRAY_HEADER) {
                continue;
            }
            let path = header_path(&child);
            if path.len() > self.path.len() && path[..self.path.len()] == self.path[..] {
                let key = path[self.path.len()].clone();
                if !seen.contains(&key) {
                    seen.push(key);
                }
            }
        }
        seen
    }

    fn has_any_child_table(&self) -> bool {
        let prefix = &self.path;
        self.root.children().any(|child| {
            matches!(child.kind(), SyntaxKind::TABLE_HEADER | SyntaxKind::ARRAY_HEADER)
                && header_path(&child).len() > prefix.len()
                && header_path(&child)[..prefix.len()] == prefix[..]
        })
    }

    /// Set `key` to `value`, replacing an existing entry in place or
    /// appending a new one. If this table is [`Kind::Implicit`], the whole
    /// chain of headers down to (and including) this table's path is
    /// materialized first, appended at the document's end (spec §4.4:
    /// "newly created tables are appended at the document's end").
    ///
    /// Only the value's raw lexeme is considered replaced (spec §3
    /// "Lifecycles": "a new value assignment replaces the link's value
    /// rather than mutating the node in place"): an existing trailing
    /// inline comment on the entry is carried over onto the rebuilt entry.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::without_position(ErrorKind::EmptyKey));
        }
        self.materialize();
        let container = self.container().expect("materialized above").clone();
        let existing = self.find_entry(key);
        let trailing_comment = existing.as_ref().and_then(entry_trailing_comment).unwrap_or_default();
        let lexeme = value.into().to_lexeme();
        let key_text = format_key(key, auto_key_style(key));
        let fragment_src = format!("{} = {}{}\n", key_text, lexeme, trailing_comment);
        let new_entry = build_fragment(&fragment_src, SyntaxKind::ENTRY);

        if let Some(existing) = existing {
            let idx = child_index(&container, &existing);
            container.splice_children(idx..idx + 1, vec![NodeOrToken::Node(new_entry)]);
        } else {
            let idx = container.children_with_tokens().count();
            container.splice_children(idx..idx, vec![NodeOrToken::Node(new_entry)]);
        }
        Ok(())
    }

    /// Remove a direct entry, returning whether one was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(container) = self.container() else {
            return false;
        };
        let container = container.clone();
        if let Some(existing) = self.find_entry(key) {
            let idx = child_index(&container, &existing);
            container.splice_children(idx..idx + 1, vec![]);
            true
        } else {
            false
        }
    }

    /// Ensure this table (and every implicit ancestor on its path) has a
    /// real `[a.b.c]` header node, creating one at the document's end if
    /// necessary.
    fn materialize(&mut self) {
        if !matches!(self.kind, Kind::Implicit) {
            return;
        }
        let header_src = format!("[{}]\n", self.path.join("."));
        let new_header = build_fragment(&header_src, SyntaxKind::TABLE_HEADER);
        let idx = self.root.children_with_tokens().count();
        self.root
            .splice_children(idx..idx, vec![NodeOrToken::Node(new_header.clone())]);
        self.kind = Kind::Node(new_header);
    }

    /// A handle onto the `[[prefix.key]]` sequence under this table,
    /// whether or not any elements exist yet. Pushing the first element
    /// materializes it (spec §4.4 "Array of tables").
    pub fn create_array_of_tables(&mut self, key: &str) -> ArrayOfTables {
        let mut want = self.path.clone();
        want.push(key.to_string());
        ArrayOfTables {
            root: self.root.clone(),
            path: want,
        }
    }

    /// Get or create the child table `key`, materializing any implicit
    /// chain as needed.
    pub fn get_or_create_table(&mut self, key: &str) -> Table {
        match self.get(key) {
            Some(Item::Table(t)) => t,
            _ => {
                let mut want = self.path.clone();
                want.push(key.to_string());
                let mut t = Table {
                    root: self.root.clone(),
                    path: want,
                    kind: Kind::Implicit,
                };
                t.materialize();
                t
            }
        }
    }

    /// Get `key`'s current value, or set it to `value` and return that
    /// instead, à la Python's `dict.setdefault` (spec §6).
    pub fn setdefault(&mut self, key: &str, value: impl Into<Value>) -> Result<Item, Error> {
        if let Some(existing) = self.get(key) {
            return Ok(existing);
        }
        self.set(key, value)?;
        Ok(self.get(key).expect("just set"))
    }

    /// Set every pair in `pairs`, in order (spec §6 `update`).
    pub fn update(&mut self, pairs: impl IntoIterator<Item = (String, Value)>) -> Result<(), Error> {
        for (key, value) in pairs {
            self.set(&key, value)?;
        }
        Ok(())
    }

    /// Remove `key` and return its value, if it was present (spec §6
    /// `pop`, the value-returning form of [`Table::remove`]).
    pub fn pop(&mut self, key: &str) -> Option<Item> {
        let item = self.get(key)?;
        self.remove(key);
        Some(item)
    }

    /// Remove and return the last direct `key = value` entry, in document
    /// order (spec §6 `popitem`).
    pub fn popitem(&mut self) -> Option<(String, Item)> {
        let key = self.keys().pop()?;
        let item = self.get(&key)?;
        self.remove(&key);
        Some((key, item))
    }

    /// Remove every direct entry and every nested explicit table / array-
    /// of-tables under this table's path (spec §6 `clear`: "recursively
    /// clears nested containers").
    pub fn clear(&mut self) {
        for key in self.keys() {
            self.remove(&key);
        }
        let prefix = self.path.clone();
        loop {
            let next = self.root.children().find(|child| {
                matches!(child.kind(), SyntaxKind::TABLE_HEADER | SyntaxKind::ARRAY_HEADER)
                    && header_path(child).len() > prefix.len()
                    && header_path(child)[..prefix.len()] == prefix[..]
            });
            match next {
                Some(header) => {
                    let idx = child_index(&self.root, &header);
                    self.root.splice_children(idx..idx + 1, vec![]);
                }
                None => break,
            }
        }
    }

    /// Values of direct `key = value` entries and direct child tables, in
    /// the same combined order as [`Table::items`].
    pub fn values(&self) -> Vec<Item> {
        self.items().into_iter().map(|(_, v)| v).collect()
    }

    /// All direct children — `key = value` entries first, then any child
    /// tables not already covered by an entry — as `(key, value)` pairs
    /// (spec §6 `items`). Mirrors the key set [`crate::native::to_native`]
    /// walks (`keys()` plus `child_table_keys()`).
    pub fn items(&self) -> Vec<(String, Item)> {
        let mut out = Vec::new();
        for key in self.keys() {
            if let Some(item) = self.get(&key) {
                out.push((key, item));
            }
        }
        for key in self.child_table_keys() {
            if out.iter().any(|(k, _)| k == &key) {
                continue;
            }
            if let Some(item) = self.get(&key) {
                out.push((key, item));
            }
        }
        out
    }

    /// Promote an inline `{ ... }` table to a `[header]` table; a no-op
    /// for a table that is already headered or is the document root
    /// (spec §6 `pin_complex`: "toggling it changes only layout"). Also a
    /// no-op for an inline table reached as an array element rather than
    /// through a dotted path — there's no `key = { ... }` entry to detach
    /// and no path to header it under.
    pub fn pin_complex(&mut self) {
        let Kind::Node(node) = &self.kind else { return };
        if node.kind() != SyntaxKind::INLINE_TABLE || self.path.is_empty() {
            return;
        }
        let Some(entry) = node.parent().filter(|p| p.kind() == SyntaxKind::ENTRY) else {
            return;
        };
        let entries_src: String = node
            .children()
            .filter(|c| c.kind() == SyntaxKind::ENTRY)
            .map(|e| format!("{}\n", e.text()))
            .collect();
        let header_src = format!("[{}]\n{}", self.path.join("."), entries_src);
        let new_header = build_fragment(&header_src, SyntaxKind::TABLE_HEADER);

        let parent = entry.parent().expect("entry always has a container parent");
        let idx = child_index(&parent, &entry);
        parent.splice_children(idx..idx + 1, vec![]);

        let idx = self.root.children_with_tokens().count();
        self.root
            .splice_children(idx..idx, vec![NodeOrToken::Node(new_header.clone())]);
        self.kind = Kind::Node(new_header);
    }

    /// Ensure this table has its own explicit header, materializing an
    /// implicit intermediate if needed; a no-op otherwise (spec §6
    /// `pin_explicit`).
    pub fn pin_explicit(&mut self) {
        self.materialize();
    }

    /// Append a standalone `# text` comment at the end of this table's
    /// body (spec §6 `append_comment`).
    pub fn append_comment(&mut self, text: &str) -> Result<(), Error> {
        self.materialize();
        let container = self.container().expect("materialized above").clone();
        let src = format!("# {}\n", text);
        let new_node = build_fragment(&src, SyntaxKind::COMMENT_LINE);
        let idx = container.children_with_tokens().count();
        container.splice_children(idx..idx, vec![NodeOrToken::Node(new_node)]);
        Ok(())
    }

    /// Append a `# text` comment immediately before this table's own
    /// header line, or at the very top of the document for the root
    /// table (spec §6 `append_head_comment`). A no-op for inline
    /// `{ ... }` tables, which have no header line to attach to.
    pub fn append_head_comment(&mut self, text: &str) -> Result<(), Error> {
        self.materialize();
        let src = format!("# {}\n", text);
        let new_node = build_fragment(&src, SyntaxKind::COMMENT_LINE);
        match &self.kind {
            Kind::Root => {
                self.root.splice_children(0..0, vec![NodeOrToken::Node(new_node)]);
            }
            Kind::Node(header)
                if matches!(header.kind(), SyntaxKind::TABLE_HEADER | SyntaxKind::ARRAY_HEADER) =>
            {
                let idx = child_index(&self.root, header);
                self.root.splice_children(idx..idx, vec![NodeOrToken::Node(new_node)]);
            }
            _ => {}
        }
        Ok(())
    }

    /// Append `n` blank lines at the end of this table's body (spec §6
    /// `append_blank_line`).
    pub fn append_blank_line(&mut self, n: usize) -> Result<(), Error> {
        self.materialize();
        let container = self.container().expect("materialized above").clone();
        for _ in 0..n {
            let new_node = build_fragment("\n", SyntaxKind::BLANK_LINE);
            let idx = container.children_with_tokens().count();
            container.splice_children(idx..idx, vec![NodeOrToken::Node(new_node)]);
        }
        Ok(())
    }
}

fn child_index(parent: &SyntaxNode, target: &SyntaxNode) -> usize {
    parent
        .children_with_tokens()
        .position(|c| c.as_node() == Some(target))
        .unwrap_or(0)
}

/// Parse `src` as a standalone mini-document and pull out its single
/// top-level child of `kind`, detached so it can be spliced into another
/// mutable tree (the same "build a fresh subtree, then splice" approach
/// the teacher crate uses for `Entry::new`/`Paragraph::insert`).
fn build_fragment(src: &str, kind: SyntaxKind) -> SyntaxNode {
    let (green, _errors) = parser::parse_document(src);
    let root = SyntaxNode::new_root_mut(green);
    let child = root
        .children()
        .find(|c| c.kind() == kind)
        .expect("fragment template must produce the requested node kind");
    child.detach();
    child
}

/// A TOML array value (spec §4.4 "Array").
pub struct ArrayValue(SyntaxNode);

impl ArrayValue {
    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Item> {
        self.items().into_iter().nth(index)
    }

    pub fn items(&self) -> Vec<Item> {
        let mut out = Vec::new();
        for el in self.0.children_with_tokens() {
            match el {
                NodeOrToken::Node(n) if matches!(n.kind(), SyntaxKind::ARRAY | SyntaxKind::INLINE_TABLE) => {
                    if let Some(item) = decode_item(&n, &n) {
                        out.push(item);
                    }
                }
                NodeOrToken::Token(t)
                    if matches!(
                        t.kind(),
                        SyntaxKind::STRING
                            | SyntaxKind::INTEGER
                            | SyntaxKind::FLOAT
                            | SyntaxKind::BOOL
                            | SyntaxKind::DATE
                            | SyntaxKind::TIME
                            | SyntaxKind::DATETIME
                    ) =>
                {
                    let item = match t.kind() {
                        SyntaxKind::STRING => Item::String(StringNode(t).value()),
                        SyntaxKind::INTEGER => Item::Integer(Integer(t).value()),
                        SyntaxKind::FLOAT => Item::Float(Float(t).value()),
                        SyntaxKind::BOOL => Item::Bool(Bool(t).value()),
                        SyntaxKind::DATE => Item::Date(DateNode(t).value()),
                        SyntaxKind::TIME => Item::Time(TimeNode(t).value()),
                        SyntaxKind::DATETIME => Item::DateTime(DateTimeNode(t).value()),
                        _ => unreachable!(),
                    };
                    out.push(item);
                }
                _ => {}
            }
        }
        out
    }

    /// The scalar type already locked in by this array's existing elements,
    /// if any (spec §3 invariant 4: "An array's element type, once set,
    /// forbids mixed types"). Container elements (tables, nested arrays)
    /// are exempt and never lock or check against this.
    fn scalar_type_lock(&self) -> Option<&'static str> {
        self.items().iter().find_map(scalar_tag_for_item)
    }

    /// Same as [`ArrayValue::scalar_type_lock`] but derived from `items`
    /// with the element at `skip` excluded, for callers replacing that
    /// element in place ([`ArrayValue::set`]).
    fn scalar_type_lock_excluding(items: &[Item], skip: usize) -> Option<&'static str> {
        items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .find_map(|(_, it)| scalar_tag_for_item(it))
    }

    fn scalar_type_name(value: &Value) -> Option<&'static str> {
        Some(match value {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "datetime",
            Value::Array(_) => return None,
        })
    }

    /// Append a value. The whole array node is rebuilt from its current
    /// text plus the new element and spliced into its parent as one unit —
    /// rowan's mutable tree only supports moving whole nodes between
    /// trees, not individual leaf tokens, so a fresh array (rather than a
    /// loose inserted token) is what gets attached. Any existing elements'
    /// exact inner spacing is not preserved across a push; the appended
    /// form is always single-line, matching [`Value::to_lexeme`].
    pub fn push(&mut self, value: impl Into<Value>) -> Result<(), Error> {
        let value = value.into();
        if let (Some(locked), Some(incoming)) = (self.scalar_type_lock(), Self::scalar_type_name(&value)) {
            if locked != incoming {
                return Err(Error::without_position(ErrorKind::MixedArrayTypes));
            }
        }
        let lexeme = value.to_lexeme();
        let old_text = self.0.text().to_string();
        let trimmed = old_text.trim_end();
        let body_end = trimmed
            .rfind(']')
            .expect("array literal text must end in ']'");
        let before = trimmed[..body_end].trim_end();
        let had_items = !self.is_empty();
        let sep = if had_items { ", " } else { "" };
        let new_text = format!("{}{}{}]", before, sep, lexeme);

        let new_array = build_fragment_array(&new_text);
        let parent = self
            .0
            .parent()
            .expect("array node always has an ENTRY or ARRAY parent");
        let idx = child_index(&parent, &self.0);
        parent.splice_children(idx..idx + 1, vec![NodeOrToken::Node(new_array.clone())]);
        self.0 = new_array;
        Ok(())
    }

    /// Rebuild this array as a single-line `[lex0, lex1, ...]` literal from
    /// `lexemes` and splice it in, the same whole-node-swap approach as
    /// [`ArrayValue::push`].
    fn rebuild(&mut self, lexemes: &[String]) {
        let new_text = format!("[{}]", lexemes.join(", "));
        let new_array = build_fragment_array(&new_text);
        let parent = self
            .0
            .parent()
            .expect("array node always has an ENTRY or ARRAY parent");
        let idx = child_index(&parent, &self.0);
        parent.splice_children(idx..idx + 1, vec![NodeOrToken::Node(new_array.clone())]);
        self.0 = new_array;
    }

    /// Replace the element at `index`. Panics if `index` is out of bounds,
    /// matching `Vec`'s own indexing operations (spec §6 `set`).
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<(), Error> {
        let value = value.into();
        let items = self.items();
        assert!(index < items.len(), "array index {index} out of bounds");
        if let (Some(locked), Some(incoming)) = (
            Self::scalar_type_lock_excluding(&items, index),
            Self::scalar_type_name(&value),
        ) {
            if locked != incoming {
                return Err(Error::without_position(ErrorKind::MixedArrayTypes));
            }
        }
        let mut lexemes: Vec<String> = items.iter().map(item_lexeme).collect();
        lexemes[index] = value.to_lexeme();
        self.rebuild(&lexemes);
        Ok(())
    }

    /// Remove the element at `index`, if present (spec §6 `delete`).
    pub fn delete(&mut self, index: usize) -> bool {
        let items = self.items();
        if index >= items.len() {
            return false;
        }
        let mut lexemes: Vec<String> = items.iter().map(item_lexeme).collect();
        lexemes.remove(index);
        self.rebuild(&lexemes);
        true
    }

    /// Insert `value` at `index`, clamping to the end if `index` is past
    /// the current length (spec §6 `insert`).
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> Result<(), Error> {
        let value = value.into();
        let items = self.items();
        if let (Some(locked), Some(incoming)) = (self.scalar_type_lock(), Self::scalar_type_name(&value)) {
            if locked != incoming {
                return Err(Error::without_position(ErrorKind::MixedArrayTypes));
            }
        }
        let index = index.min(items.len());
        let mut lexemes: Vec<String> = items.iter().map(item_lexeme).collect();
        lexemes.insert(index, value.to_lexeme());
        self.rebuild(&lexemes);
        Ok(())
    }

    /// Push every value in `values`, in order, stopping at the first
    /// type-lock violation (spec §6 `extend`).
    pub fn extend(&mut self, values: impl IntoIterator<Item = Value>) -> Result<(), Error> {
        for value in values {
            self.push(value)?;
        }
        Ok(())
    }

    /// Remove and return the last element, if any (spec §6 `pop`).
    pub fn pop(&mut self) -> Option<Item> {
        let mut items = self.items();
        let last = items.pop()?;
        let lexemes: Vec<String> = items.iter().map(item_lexeme).collect();
        self.rebuild(&lexemes);
        Some(last)
    }

    /// Remove every element, leaving an empty `[]` (spec §6 `clear`).
    pub fn clear(&mut self) {
        self.rebuild(&[]);
    }

    /// Reformat this array as one element per line; a no-op if it already
    /// spans multiple lines or has no elements (spec §6 `pin_complex`).
    pub fn pin_complex(&mut self) {
        if self.0.text().to_string().contains('\n') {
            return;
        }
        let items = self.items();
        if items.is_empty() {
            return;
        }
        let mut body = String::new();
        for item in &items {
            body.push_str("  ");
            body.push_str(&item_lexeme(item));
            body.push_str(",\n");
        }
        let new_text = format!("[\n{}]", body);
        let new_array = build_fragment_array(&new_text);
        let parent = self
            .0
            .parent()
            .expect("array node always has an ENTRY or ARRAY parent");
        let idx = child_index(&parent, &self.0);
        parent.splice_children(idx..idx + 1, vec![NodeOrToken::Node(new_array.clone())]);
        self.0 = new_array;
    }

    /// Append a `# text` comment on its own line just before the closing
    /// `]`, forcing the array onto multiple lines first if needed (spec §6
    /// `append_comment`).
    pub fn append_comment(&mut self, text: &str) -> Result<(), Error> {
        self.pin_complex();
        let old_text = self.0.text().to_string();
        let trimmed = old_text.trim_end();
        let body_end = trimmed
            .rfind(']')
            .expect("array literal text must end in ']'");
        let before = trimmed[..body_end].trim_end_matches('\n').trim_end();
        let new_text = format!("{}\n  # {}\n]", before, text);
        let new_array = build_fragment_array(&new_text);
        let parent = self
            .0
            .parent()
            .expect("array node always has an ENTRY or ARRAY parent");
        let idx = child_index(&parent, &self.0);
        parent.splice_children(idx..idx + 1, vec![NodeOrToken::Node(new_array.clone())]);
        self.0 = new_array;
        Ok(())
    }
}

/// Parse `array_text` (a full `[...]` literal) as the value of a throwaway
/// entry and pull out the resulting `ARRAY` node, detached and ready to
/// splice into a real tree.
fn build_fragment_array(array_text: &str) -> SyntaxNode {
    let entry = build_fragment(&format!("__v = {}\n", array_text), SyntaxKind::ENTRY);
    let arr = entry
        .children()
        .find(|c| c.kind() == SyntaxKind::ARRAY)
        .expect("array fragment must contain an ARRAY node")
        .clone();
    arr.detach();
    arr
}

/// The sequence of `[[a.b]]` tables sharing one path.
pub struct ArrayOfTables {
    root: SyntaxNode,
    path: Vec<String>,
}

impl ArrayOfTables {
    fn headers(&self) -> Vec<SyntaxNode> {
        self.root
            .children()
            .filter(|c| c.kind() == SyntaxKind::ARRAY_HEADER && header_path(c) == self.path)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.headers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Table> {
        self.headers().into_iter().nth(index).map(|node| Table {
            root: self.root.clone(),
            path: self.path.clone(),
            kind: Kind::Node(node),
        })
    }

    pub fn iter(&self) -> Vec<Table> {
        self.headers()
            .into_iter()
            .map(|node| Table {
                root: self.root.clone(),
                path: self.path.clone(),
                kind: Kind::Node(node),
            })
            .collect()
    }

    /// Append a new, empty `[[a.b]]` element at the document's end.
    pub fn push(&mut self) -> Table {
        let header_src = format!("[[{}]]\n", self.path.join("."));
        let new_header = build_fragment(&header_src, SyntaxKind::ARRAY_HEADER);
        let idx = self.root.children_with_tokens().count();
        self.root
            .splice_children(idx..idx, vec![NodeOrToken::Node(new_header.clone())]);
        Table {
            root: self.root.clone(),
            path: self.path.clone(),
            kind: Kind::Node(new_header),
        }
    }
}

/// A parsed, mutable TOML document.
pub struct Document {
    node: SyntaxNode,
}

impl Document {
    /// Parse `src`, rejecting it outright on the first malformed
    /// production (spec §7 "Strict mode").
    pub fn parse(src: &str) -> Result<Document, Vec<Error>> {
        let (green, errors) = parser::parse_document(src);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Document {
            node: SyntaxNode::new_root_mut(green),
        })
    }

    /// Parse `src`, keeping malformed productions as `ERROR_NODE`s so the
    /// surrounding document is still usable and still round-trips in the
    /// unmutated regions (spec §7 "Relaxed mode").
    pub fn parse_relaxed(src: &str) -> (Document, Vec<Error>) {
        let (green, errors) = parser::parse_document(src);
        (
            Document {
                node: SyntaxNode::new_root_mut(green),
            },
            errors,
        )
    }

    pub fn root(&self) -> Table {
        Table {
            root: self.node.clone(),
            path: Vec::new(),
            kind: Kind::Root,
        }
    }

    pub fn root_mut(&mut self) -> Table {
        self.root()
    }

    /// Read and parse a file in relaxed mode (spec §6 "I/O convenience"):
    /// malformed productions become `ERROR_NODE`s rather than failing the
    /// whole read, mirroring teacher's own `Deb822::from_file`.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> std::io::Result<Document> {
        let text = std::fs::read_to_string(path)?;
        Ok(Document::parse_relaxed(&text).0)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node.text())
    }
}

impl std::str::FromStr for Document {
    type Err = Vec<Error>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_unmutated() {
        let src = "# hi\nfoo = \"bar\"  # inline\n\n[a.b]\nx = 1\n";
        let doc = Document::parse(src).unwrap();
        assert_eq!(doc.to_string(), src);
    }

    #[test]
    fn get_top_level_entry() {
        let doc = Document::parse("foo = \"bar\"\n").unwrap();
        match doc.root().get("foo") {
            Some(Item::String(s)) => assert_eq!(s, "bar"),
            _ => panic!("expected string"),
        }
    }

    #[test]
    fn get_nested_explicit_table() {
        let doc = Document::parse("[a]\nx = 1\n\n[a.b]\ny = 2\n").unwrap();
        let a = doc.root().get("a");
        assert!(matches!(a, Some(Item::Table(_))));
        if let Some(Item::Table(a)) = a {
            assert!(matches!(a.get("x"), Some(Item::Integer(1))));
            let b = a.get("b");
            assert!(matches!(b, Some(Item::Table(_))));
        }
    }

    #[test]
    fn get_implicit_intermediate_table() {
        let doc = Document::parse("[a.b.c]\nx = 1\n").unwrap();
        let a = doc.root().get("a").expect("implicit a");
        assert!(matches!(a, Item::Table(_)));
    }

    #[test]
    fn set_creates_entry_in_empty_document() {
        let mut doc = Document::parse("").unwrap();
        doc.root_mut().set("foo", "bar").unwrap();
        assert_eq!(doc.to_string(), "foo = \"bar\"\n");
    }

    #[test]
    fn set_replaces_existing_entry() {
        let mut doc = Document::parse("foo = \"bar\"\n").unwrap();
        doc.root_mut().set("foo", 42i64).unwrap();
        assert_eq!(doc.to_string(), "foo = 42\n");
    }

    #[test]
    fn set_preserves_trailing_comment() {
        let mut doc = Document::parse("foo = \"bar\"  # keep me\n").unwrap();
        doc.root_mut().set("foo", "baz").unwrap();
        assert_eq!(doc.to_string(), "foo = \"baz\"  # keep me\n");
    }

    #[test]
    fn remove_entry() {
        let mut doc = Document::parse("foo = \"bar\"\nbaz = 1\n").unwrap();
        assert!(doc.root_mut().remove("foo"));
        assert_eq!(doc.to_string(), "baz = 1\n");
    }

    #[test]
    fn array_append() {
        let doc = Document::parse("xs = [1, 2]\n").unwrap();
        let xs = doc.root().get("xs");
        if let Some(Item::Array(mut xs)) = xs {
            xs.push(3i64).unwrap();
            assert_eq!(doc.to_string(), "xs = [1, 2, 3]\n");
        } else {
            panic!("expected array");
        }
    }

    #[test]
    fn array_rejects_mixed_scalar_types() {
        let doc = Document::parse("xs = [1, 2]\n").unwrap();
        if let Some(Item::Array(mut xs)) = doc.root().get("xs") {
            let err = xs.push("nope").unwrap_err();
            assert_eq!(err.kind, ErrorKind::MixedArrayTypes);
        } else {
            panic!("expected array");
        }
    }

    #[test]
    fn array_of_tables_push() {
        let doc = Document::parse("[[pkg]]\nname = \"a\"\n").unwrap();
        let mut aot = match doc.root().get("pkg") {
            Some(Item::ArrayOfTables(a)) => a,
            _ => panic!("expected array of tables"),
        };
        assert_eq!(aot.len(), 1);
        let mut new_tbl = aot.push();
        new_tbl.set("name", "b").unwrap();
        assert_eq!(aot.len(), 2);
    }

    #[test]
    fn table_setdefault_creates_then_reuses() {
        let mut doc = Document::parse("").unwrap();
        let first = doc.root_mut().setdefault("foo", "bar").unwrap();
        assert!(matches!(first, Item::String(ref s) if s == "bar"));
        let second = doc.root_mut().setdefault("foo", "other").unwrap();
        assert!(matches!(second, Item::String(ref s) if s == "bar"));
    }

    #[test]
    fn table_pop_and_popitem() {
        let mut doc = Document::parse("foo = 1\nbar = 2\n").unwrap();
        let popped = doc.root_mut().pop("foo").unwrap();
        assert!(matches!(popped, Item::Integer(1)));
        assert!(!doc.root().contains_key("foo"));

        let (key, value) = doc.root_mut().popitem().unwrap();
        assert_eq!(key, "bar");
        assert!(matches!(value, Item::Integer(2)));
        assert!(doc.root().is_empty());
    }

    #[test]
    fn table_clear_removes_entries_and_nested_tables() {
        let mut doc = Document::parse("[a]\nx = 1\n\n[a.b]\ny = 2\n").unwrap();
        let mut a = match doc.root().get("a") {
            Some(Item::Table(t)) => t,
            _ => panic!("expected table"),
        };
        a.clear();
        // The `[a]` header itself survives; its entry and the nested `[a.b]`
        // table do not.
        assert_eq!(doc.to_string(), "[a]\n\n");
        assert!(a.is_empty());
    }

    #[test]
    fn table_items_and_values_cover_entries_and_child_tables() {
        let doc = Document::parse("foo = 1\n\n[bar]\nx = 2\n").unwrap();
        let items = doc.root().items();
        let keys: Vec<String> = items.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["foo".to_string(), "bar".to_string()]);
        assert_eq!(doc.root().values().len(), 2);
    }

    #[test]
    fn table_append_comment_and_blank_line() {
        let mut doc = Document::parse("foo = 1\n").unwrap();
        doc.root_mut().append_blank_line(1).unwrap();
        doc.root_mut().append_comment("note").unwrap();
        assert_eq!(doc.to_string(), "foo = 1\n\n# note\n");
    }

    #[test]
    fn table_append_head_comment_on_root() {
        let mut doc = Document::parse("foo = 1\n").unwrap();
        doc.root_mut().append_head_comment("header note").unwrap();
        assert_eq!(doc.to_string(), "# header note\nfoo = 1\n");
    }

    #[test]
    fn table_pin_explicit_materializes_implicit_table() {
        let mut doc = Document::parse("[a.b.c]\nx = 1\n").unwrap();
        let mut a = match doc.root().get("a") {
            Some(Item::Table(t)) => t,
            _ => panic!("expected implicit table"),
        };
        a.pin_explicit();
        assert!(doc.to_string().contains("[a]\n"));
    }

    #[test]
    fn array_set_insert_delete_pop_clear() {
        let mut doc = Document::parse("xs = [1, 2, 3]\n").unwrap();
        let mut xs = match doc.root().get("xs") {
            Some(Item::Array(a)) => a,
            _ => panic!("expected array"),
        };
        xs.set(1, 20i64).unwrap();
        assert_eq!(doc.to_string(), "xs = [1, 20, 3]\n");

        let mut xs = match doc.root().get("xs") {
            Some(Item::Array(a)) => a,
            _ => panic!("expected array"),
        };
        xs.insert(0, 0i64).unwrap();
        assert_eq!(doc.to_string(), "xs = [0, 1, 20, 3]\n");

        let mut xs = match doc.root().get("xs") {
            Some(Item::Array(a)) => a,
            _ => panic!("expected array"),
        };
        assert!(xs.delete(0));
        assert_eq!(doc.to_string(), "xs = [1, 20, 3]\n");

        let mut xs = match doc.root().get("xs") {
            Some(Item::Array(a)) => a,
            _ => panic!("expected array"),
        };
        let popped = xs.pop().unwrap();
        assert!(matches!(popped, Item::Integer(3)));
        assert_eq!(doc.to_string(), "xs = [1, 20]\n");

        let mut xs = match doc.root().get("xs") {
            Some(Item::Array(a)) => a,
            _ => panic!("expected array"),
        };
        xs.clear();
        assert_eq!(doc.to_string(), "xs = []\n");
    }

    #[test]
    fn array_extend_rejects_mixed_types_partway() {
        let doc = Document::parse("xs = [1, 2]\n").unwrap();
        let mut xs = match doc.root().get("xs") {
            Some(Item::Array(a)) => a,
            _ => panic!("expected array"),
        };
        let err = xs
            .extend(vec![Value::Integer(3), Value::String("nope".to_string())])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MixedArrayTypes);
        assert_eq!(doc.to_string(), "xs = [1, 2, 3]\n");
    }

    #[test]
    fn table_pin_complex_promotes_inline_to_headered() {
        let mut doc = Document::parse("t = { a = 1, b = 2 }\n").unwrap();
        let mut t = match doc.root().get("t") {
            Some(Item::Table(t)) => t,
            _ => panic!("expected inline table"),
        };
        t.pin_complex();
        assert_eq!(doc.to_string(), "[t]\na = 1\nb = 2\n");
    }

    #[test]
    fn array_pin_complex_spreads_one_per_line() {
        let mut doc = Document::parse("xs = [1, 2]\n").unwrap();
        let mut xs = match doc.root().get("xs") {
            Some(Item::Array(a)) => a,
            _ => panic!("expected array"),
        };
        xs.pin_complex();
        assert_eq!(doc.to_string(), "xs = [\n  1,\n  2,\n]\n");
    }
}
