//! A workbench that keeps all state in memory.
//!
//! Used by the interactive binary and by tests. Built-ins that would redraw or
//! rearrange windows update the workspace tree and the focus instead.

mod layout;

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::debug;

use scribe_workspace::{Column, EditableBuffer, Tag, TagId, TargetRef, UiContext, Window};

use crate::dispatch::BuiltinVerb;
use crate::workbench::{Workbench, WorkbenchError};

pub use self::layout::{ColumnLayout, Layout};

const HEADLESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::headless");

/// Font faces cycled by [`BuiltinVerb::Font`].
pub const FONT_FACES: [&str; 2] = ["proportional", "fixed"];

/// In-memory [`Workbench`].
#[derive(Debug)]
pub struct HeadlessWorkbench {
    dump_file: PathBuf,
    finished: bool,
    elastic: HashSet<TagId>,
    fonts: HashMap<TagId, usize>,
    installed: HashMap<TagId, Vec<String>>,
    refreshes: usize,
    jumps: usize,
}

impl HeadlessWorkbench {
    /// Workbench whose `Dump` and `Load` use `dump_file`.
    #[must_use]
    pub fn new(dump_file: impl Into<PathBuf>) -> Self {
        Self {
            dump_file: dump_file.into(),
            finished: false,
            elastic: HashSet::new(),
            fonts: HashMap::new(),
            installed: HashMap::new(),
            refreshes: 0,
            jumps: 0,
        }
    }

    /// Returns `true` once `Exit` has run.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether elastic tabstops are on for `tag`.
    #[must_use]
    pub fn is_elastic(&self, tag: &Tag) -> bool {
        self.elastic.contains(&tag.id())
    }

    /// Font face currently selected for `owner`.
    #[must_use]
    pub fn font_face(&self, owner: &Tag) -> &'static str {
        let index = self.fonts.get(&owner.id()).copied().unwrap_or_default();
        FONT_FACES.get(index).copied().unwrap_or_default()
    }

    /// Commands installed on `tag`, oldest first.
    #[must_use]
    pub fn installed(&self, tag: &Tag) -> &[String] {
        self.installed.get(&tag.id()).map_or(&[], Vec::as_slice)
    }

    /// Number of refresh requests received.
    #[must_use]
    pub const fn refreshes(&self) -> usize {
        self.refreshes
    }

    /// Number of jump requests received.
    #[must_use]
    pub const fn jumps(&self) -> usize {
        self.jumps
    }

    fn toggle_elastic(&mut self, tag: &Tag) {
        if !self.elastic.remove(&tag.id()) {
            self.elastic.insert(tag.id());
        }
    }

    fn cycle_font(&mut self, owner: &Tag) {
        let index = self.fonts.entry(owner.id()).or_default();
        *index = if *index + 1 >= FONT_FACES.len() {
            0
        } else {
            *index + 1
        };
    }

    fn dump(&self, ctx: &UiContext) -> Result<(), WorkbenchError> {
        let path = &self.dump_file;
        let file = File::create(path).map_err(|err| WorkbenchError::io(path, err))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &Layout::capture(ctx.workspace()))
            .map_err(|err| WorkbenchError::layout(path, err))
    }

    fn load(&self, ctx: &mut UiContext) -> Result<(), WorkbenchError> {
        let path = &self.dump_file;
        let file = File::open(path).map_err(|err| WorkbenchError::io(path, err))?;
        let layout: Layout = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| WorkbenchError::layout(path, err))?;
        match layout.restore(ctx.workspace()) {
            Some((column, tag)) => ctx.focus(Some(column), tag),
            None => ctx.focus(None, None),
        }
        Ok(())
    }
}

impl Default for HeadlessWorkbench {
    fn default() -> Self {
        Self::new("scribe.dump")
    }
}

fn active_tag(ctx: &UiContext) -> Result<Tag, WorkbenchError> {
    ctx.active_tag().cloned().ok_or(WorkbenchError::NoActiveTag)
}

fn active_column(ctx: &UiContext) -> Result<Column, WorkbenchError> {
    ctx.active_column()
        .cloned()
        .ok_or(WorkbenchError::NoActiveColumn)
}

fn put(ctx: &UiContext) -> Result<(), WorkbenchError> {
    let tag = active_tag(ctx)?;
    let path = PathBuf::from(tag.label());
    let content = tag.body().lock().bytes().to_vec();
    fs::write(&path, content).map_err(|err| WorkbenchError::io(&path, err))
}

fn get(ctx: &UiContext) -> Result<(), WorkbenchError> {
    let tag = active_tag(ctx)?;
    let path = PathBuf::from(tag.label());
    let content = fs::read(&path).map_err(|err| WorkbenchError::io(&path, err))?;
    tag.swap_body(Window::with_text(content));
    Ok(())
}

fn new_tag(ctx: &mut UiContext) {
    let column = ctx
        .active_column()
        .cloned()
        .or_else(|| ctx.workspace().columns().pop())
        .unwrap_or_else(|| {
            let created = Column::new("");
            ctx.workspace().push(created.clone());
            created
        });
    let tag = Tag::new("");
    column.push(tag.clone());
    ctx.focus(Some(column), Some(tag));
}

fn new_column(ctx: &mut UiContext) {
    let column = Column::new("");
    ctx.workspace().push(column.clone());
    ctx.focus(Some(column), None);
}

fn delete_tag(ctx: &mut UiContext) -> Result<(), WorkbenchError> {
    let tag = active_tag(ctx)?;
    let column = ctx
        .workspace()
        .column_of(&tag)
        .ok_or(WorkbenchError::NoActiveColumn)?;
    let Some(index) = column.position(&tag) else {
        ctx.clear_tag();
        return Ok(());
    };
    column.remove(index);
    let remaining = column.tags();
    let next = remaining.get(index).or_else(|| remaining.last()).cloned();
    ctx.focus(Some(column), next);
    Ok(())
}

fn delete_column(ctx: &mut UiContext) -> Result<(), WorkbenchError> {
    let column = active_column(ctx)?;
    let workspace = ctx.workspace().clone();
    if let Some(index) = workspace.position(&column) {
        workspace.remove(index);
        let remaining = workspace.columns();
        let next = remaining.get(index).or_else(|| remaining.last()).cloned();
        let tag = next.as_ref().and_then(|col| col.tags().into_iter().next());
        ctx.focus(next, tag);
    } else {
        ctx.focus(None, None);
    }
    Ok(())
}

fn sort_column(ctx: &UiContext) -> Result<(), WorkbenchError> {
    let column = active_column(ctx)?;
    column.sort_by(|left, right| left.label().cmp(&right.label()));
    Ok(())
}

/// Tag whose font `Font` changes: the active tag, else the active column's
/// header, else the workspace header.
fn font_owner(ctx: &UiContext) -> Tag {
    ctx.active_tag()
        .or_else(|| ctx.active_column().map(Column::header))
        .unwrap_or_else(|| ctx.workspace().header())
        .clone()
}

impl Workbench for HeadlessWorkbench {
    fn builtin(&mut self, verb: BuiltinVerb, ctx: &mut UiContext) -> Result<(), WorkbenchError> {
        debug!(target: HEADLESS_TARGET, verb = %verb, "running built-in");
        match verb {
            BuiltinVerb::Img => Err(WorkbenchError::Unsupported),
            BuiltinVerb::Load => self.load(ctx),
            BuiltinVerb::Dump => self.dump(ctx),
            BuiltinVerb::Elastic => {
                let tag = active_tag(ctx)?;
                self.toggle_elastic(&tag);
                Ok(())
            }
            BuiltinVerb::Font => {
                self.cycle_font(&font_owner(ctx));
                Ok(())
            }
            BuiltinVerb::Put => put(ctx),
            BuiltinVerb::Get => get(ctx),
            BuiltinVerb::New => {
                new_tag(ctx);
                Ok(())
            }
            BuiltinVerb::Newcol => {
                new_column(ctx);
                Ok(())
            }
            BuiltinVerb::Del => delete_tag(ctx),
            BuiltinVerb::Sort => sort_column(ctx),
            BuiltinVerb::Delcol => delete_column(ctx),
            BuiltinVerb::Exit => {
                self.finished = true;
                Ok(())
            }
        }
    }

    fn install(&mut self, tag: &Tag, spec: &str) -> Result<(), WorkbenchError> {
        debug!(target: HEADLESS_TARGET, tag = %tag.id(), spec, "installing command");
        self.installed
            .entry(tag.id())
            .or_default()
            .push(spec.to_owned());
        Ok(())
    }

    fn refresh(&mut self, target: &TargetRef) {
        debug!(target: HEADLESS_TARGET, destination = ?target, "refresh");
        self.refreshes += 1;
    }

    fn jump(&mut self, target: &TargetRef) {
        debug!(target: HEADLESS_TARGET, destination = ?target, "jump");
        self.jumps += 1;
    }

    fn find_or_create(&mut self, ctx: &UiContext, dir: &Path, label: &str) -> Window {
        if let Some(tag) = ctx.workspace().find_tag(label) {
            return tag.body();
        }
        let workspace = ctx.workspace();
        let column = workspace.columns().pop().unwrap_or_else(|| {
            let created = Column::new(dir.to_string_lossy());
            workspace.push(created.clone());
            created
        });
        debug!(target: HEADLESS_TARGET, label, "creating result tag");
        let tag = Tag::new(label);
        column.push(tag.clone());
        tag.body()
    }
}
