pub mod unified;

use crate::AddedLine;

pub use unified::{parse_patched_files, DiffParseError};

/// Added lines of a diff, grouped by the path they were added to.
///
/// Files keep the order in which the diff first mentions them. Files that
/// receive no added lines never appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchedFiles {
    files: Vec<(String, Vec<AddedLine>)>,
}

impl PatchedFiles {
    pub fn push(&mut self, added: AddedLine) {
        match self.files.iter_mut().find(|(path, _)| *path == added.path) {
            Some((_, lines)) => lines.push(added),
            None => self.files.push((added.path.clone(), vec![added])),
        }
    }

    pub fn get(&self, path: &str) -> Option<&[AddedLine]> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, lines)| lines.as_slice())
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &[AddedLine])> {
        self.files
            .iter()
            .map(|(path, lines)| (path.as_str(), lines.as_slice()))
    }

    pub fn lines(&self) -> impl Iterator<Item = &AddedLine> {
        self.files.iter().flat_map(|(_, lines)| lines.iter())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
