use crate::error::{Error, Result};
use crate::index::DocId;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

lazy_static! {
    // `.I 12`, `.T`, `.W some text`: a dot, one upper-case letter, then whitespace or end of line.
    static ref MARKER: Regex = Regex::new(r"^\.([A-Z])(?:\s+(.*))?$").expect("valid regex");
}

/// Raw (unnormalized) title and body tokens per document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Collection {
    pub titles: BTreeMap<DocId, Vec<String>>,
    pub bodies: BTreeMap<DocId, Vec<String>>,
}

impl Collection {
    pub fn doc_ids(&self) -> BTreeSet<DocId> {
        self.titles.keys().chain(self.bodies.keys()).copied().collect()
    }
}

#[derive(Clone, Copy)]
enum Field {
    None,
    Title,
    Body,
    Ignored,
}

struct Record {
    id: DocId,
    line: usize,
    has_title: bool,
    has_body: bool,
}

struct Parser<'a> {
    origin: &'a Path,
    collection: Collection,
    seen: BTreeSet<DocId>,
    current: Option<Record>,
    field: Field,
}

impl<'a> Parser<'a> {
    fn new(origin: &'a Path) -> Self {
        Self { origin, collection: Collection::default(), seen: BTreeSet::new(), current: None, field: Field::None }
    }

    fn error(&self, line: usize, reason: impl Into<String>) -> Error {
        format_error(self.origin, line, reason)
    }

    fn line(&mut self, lineno: usize, line: &str) -> Result<()> {
        let line = line.trim_end();
        match MARKER.captures(line) {
            Some(caps) => {
                let rest = caps.get(2).map_or("", |m| m.as_str());
                match &caps[1] {
                    "I" => self.start_record(lineno, rest),
                    marker => {
                        self.start_field(lineno, marker)?;
                        self.push_tokens(rest);
                        Ok(())
                    }
                }
            }
            None => {
                if self.current.is_none() && !line.trim().is_empty() {
                    return Err(self.error(lineno, "text before the first .I record header"));
                }
                self.push_tokens(line);
                Ok(())
            }
        }
    }

    fn start_record(&mut self, lineno: usize, rest: &str) -> Result<()> {
        self.finish_record()?;
        let raw = rest.split_whitespace().next().ok_or_else(|| self.error(lineno, "record header .I without a document id"))?;
        let id: DocId = raw.parse().map_err(|_| self.error(lineno, format!("invalid document id {raw:?}")))?;
        if id == 0 {
            return Err(self.error(lineno, "document id must be positive"));
        }
        if !self.seen.insert(id) {
            return Err(self.error(lineno, format!("duplicate document id {id}")));
        }
        self.current = Some(Record { id, line: lineno, has_title: false, has_body: false });
        self.field = Field::None;
        Ok(())
    }

    fn start_field(&mut self, lineno: usize, marker: &str) -> Result<()> {
        let origin = self.origin;
        let Some(record) = self.current.as_mut() else {
            return Err(format_error(origin, lineno, format!("field marker .{marker} before the first .I record header")));
        };
        self.field = match marker {
            "T" => {
                record.has_title = true;
                self.collection.titles.entry(record.id).or_default();
                Field::Title
            }
            "W" => {
                record.has_body = true;
                self.collection.bodies.entry(record.id).or_default();
                Field::Body
            }
            _ => Field::Ignored,
        };
        Ok(())
    }

    fn push_tokens(&mut self, text: &str) {
        let Some(record) = self.current.as_ref() else { return };
        let target = match self.field {
            Field::Title => self.collection.titles.entry(record.id).or_default(),
            Field::Body => self.collection.bodies.entry(record.id).or_default(),
            Field::None | Field::Ignored => return,
        };
        target.extend(text.split_whitespace().map(str::to_string));
    }

    fn finish_record(&mut self) -> Result<()> {
        let Some(record) = self.current.take() else { return Ok(()) };
        if !record.has_title {
            return Err(self.error(record.line, format!("document {} has no .T title field", record.id)));
        }
        if !record.has_body {
            return Err(self.error(record.line, format!("document {} has no .W body field", record.id)));
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Collection> {
        self.finish_record()?;
        Ok(self.collection)
    }
}

fn format_error(origin: &Path, line: usize, reason: impl Into<String>) -> Error {
    Error::SourceFormat { origin: origin.to_path_buf(), line, reason: reason.into() }
}

/// Parse a Cranfield-style collection. `origin` labels errors.
pub fn parse_collection<R: BufRead>(reader: R, origin: &Path) -> Result<Collection> {
    let mut parser = Parser::new(origin);
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(origin, e))?;
        parser.line(idx + 1, &line)?;
    }
    let collection = parser.finish()?;
    tracing::debug!(origin = %origin.display(), documents = collection.titles.len(), "parsed collection");
    Ok(collection)
}

pub fn read_collection<P: AsRef<Path>>(path: P) -> Result<Collection> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let file = File::open(&path).map_err(|e| Error::io(&path, e))?;
    parse_collection(BufReader::new(file), &path)
}
