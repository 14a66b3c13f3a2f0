//! Static, read-only virtual filesystem.
//!
//! The tree is built once through [`VfsBuilder`] and never mutated afterwards.
//! Directory children keep insertion order, which is the order `ls` and
//! `projects` print them in.

use std::fmt;

use thiserror::Error;

/// Name of the root directory segment.
pub const ROOT: &str = "~";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    #[error("{name}: No such file or directory")]
    NotFound { name: String },

    #[error("{name}: Is a directory")]
    IsDirectory { name: String },

    #[error("duplicate entry '{name}' in directory '{parent}'")]
    DuplicateName { parent: String, name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory(Directory),
    File(File),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Directory(_) => NodeKind::Directory,
            Self::File(_) => NodeKind::File,
        }
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Self::Directory(directory) => Some(directory),
            Self::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Self::File(file) => Some(file),
            Self::Directory(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    children: Vec<(String, Node)>,
}

impl Directory {
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|(child_name, _)| child_name == name)
            .map(|(_, node)| node)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    content: String,
}

impl File {
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Working-directory path: `~` followed by directory names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsPath {
    segments: Vec<String>,
}

impl Default for VfsPath {
    fn default() -> Self {
        Self::root()
    }
}

impl VfsPath {
    pub fn root() -> Self {
        Self {
            segments: vec![ROOT.to_string()],
        }
    }

    pub fn from_segments<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = Self::root();
        for name in names {
            path.push(name);
        }
        path
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.segments.push(name.into());
    }

    /// Drops the last segment. Returns `false` (and does nothing) at the root.
    pub fn pop(&mut self) -> bool {
        if self.segments.len() > 1 {
            self.segments.pop();
            true
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }

    /// Segments below the root alias.
    pub fn names(&self) -> &[String] {
        &self.segments[1..]
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vfs {
    root: Node,
}

impl Vfs {
    pub fn root(&self) -> &Directory {
        match &self.root {
            Node::Directory(directory) => directory,
            Node::File(_) => unreachable!("vfs root is always a directory"),
        }
    }

    /// Walks `path` from the root.
    pub fn resolve(&self, path: &VfsPath) -> Result<&Node, VfsError> {
        let mut node = &self.root;
        for name in path.names() {
            node = node
                .as_directory()
                .and_then(|directory| directory.child(name))
                .ok_or_else(|| VfsError::NotFound { name: name.clone() })?;
        }
        Ok(node)
    }

    /// Resolves `path` and requires a directory.
    pub fn resolve_dir(&self, path: &VfsPath) -> Result<&Directory, VfsError> {
        let node = self.resolve(path)?;
        node.as_directory().ok_or_else(|| VfsError::NotFound {
            name: path.to_string(),
        })
    }

    pub fn list_children(directory: &Directory) -> impl Iterator<Item = (&str, NodeKind)> + '_ {
        directory
            .children
            .iter()
            .map(|(name, node)| (name.as_str(), node.kind()))
    }

    pub fn get_file<'a>(directory: &'a Directory, name: &str) -> Result<&'a str, VfsError> {
        match directory.child(name) {
            Some(Node::File(file)) => Ok(file.content()),
            Some(Node::Directory(_)) => Err(VfsError::IsDirectory {
                name: name.to_string(),
            }),
            None => Err(VfsError::NotFound {
                name: name.to_string(),
            }),
        }
    }
}

/// Builds a directory tree, rejecting duplicate names within a directory.
#[derive(Debug)]
pub struct VfsBuilder {
    name: String,
    children: Vec<(String, Node)>,
    error: Option<VfsError>,
}

impl Default for VfsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VfsBuilder {
    pub fn new() -> Self {
        Self::named(ROOT)
    }

    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
            error: None,
        }
    }

    pub fn file(mut self, name: &str, content: impl Into<String>) -> Self {
        self.insert(
            name,
            Node::File(File {
                content: content.into(),
            }),
        );
        self
    }

    pub fn dir(mut self, name: &str, build: impl FnOnce(VfsBuilder) -> VfsBuilder) -> Self {
        match build(Self::named(name)).into_directory() {
            Ok(directory) => self.insert(name, Node::Directory(directory)),
            Err(error) => {
                self.error.get_or_insert(error);
            }
        }
        self
    }

    pub fn build(self) -> Result<Vfs, VfsError> {
        Ok(Vfs {
            root: Node::Directory(self.into_directory()?),
        })
    }

    fn insert(&mut self, name: &str, node: Node) {
        if self.children.iter().any(|(existing, _)| existing == name) {
            self.error.get_or_insert(VfsError::DuplicateName {
                parent: self.name.clone(),
                name: name.to_string(),
            });
            return;
        }
        self.children.push((name.to_string(), node));
    }

    fn into_directory(self) -> Result<Directory, VfsError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(Directory {
                children: self.children,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeKind, Vfs, VfsBuilder, VfsError, VfsPath};

    fn sample() -> Vfs {
        VfsBuilder::new()
            .file("about.txt", "hello")
            .dir("projects", |dir| {
                dir.file("one.txt", "first").file("two.txt", "second")
            })
            .dir("empty", |dir| dir)
            .build()
            .expect("sample tree builds")
    }

    #[test]
    fn children_are_listed_in_insertion_order() {
        let vfs = sample();
        let listed: Vec<_> = Vfs::list_children(vfs.root()).collect();
        assert_eq!(
            listed,
            vec![
                ("about.txt", NodeKind::File),
                ("projects", NodeKind::Directory),
                ("empty", NodeKind::Directory),
            ]
        );
    }

    #[test]
    fn resolve_walks_nested_directories() {
        let vfs = sample();
        let node = vfs
            .resolve(&VfsPath::from_segments(["projects"]))
            .expect("projects resolves");
        assert_eq!(node.kind(), NodeKind::Directory);

        let err = vfs
            .resolve(&VfsPath::from_segments(["missing"]))
            .expect_err("missing segment");
        assert_eq!(
            err,
            VfsError::NotFound {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn resolve_through_a_file_is_not_found() {
        let vfs = sample();
        let err = vfs
            .resolve(&VfsPath::from_segments(["about.txt", "deeper"]))
            .expect_err("files have no children");
        assert!(matches!(err, VfsError::NotFound { .. }));
    }

    #[test]
    fn get_file_distinguishes_directories_and_missing_names() {
        let vfs = sample();
        assert_eq!(Vfs::get_file(vfs.root(), "about.txt"), Ok("hello"));
        assert_eq!(
            Vfs::get_file(vfs.root(), "projects"),
            Err(VfsError::IsDirectory {
                name: "projects".to_string()
            })
        );
        assert_eq!(
            Vfs::get_file(vfs.root(), "ghost"),
            Err(VfsError::NotFound {
                name: "ghost".to_string()
            })
        );
    }

    #[test]
    fn duplicate_names_are_rejected_at_build_time() {
        let err = VfsBuilder::new()
            .dir("projects", |dir| dir.file("a", "1").file("a", "2"))
            .build()
            .expect_err("duplicate child");
        assert_eq!(
            err,
            VfsError::DuplicateName {
                parent: "projects".to_string(),
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn path_pop_is_a_no_op_at_root() {
        let mut path = VfsPath::root();
        assert!(!path.pop());
        assert_eq!(path.depth(), 1);

        path.push("projects");
        assert_eq!(path.to_string(), "~/projects");
        assert!(path.pop());
        assert!(path.is_root());
        assert_eq!(path.to_string(), "~");
    }
}
