//! In-memory hierarchical filesystem.
//!
//! Nodes are owned strictly downward from the root directory. The tree also
//! owns the current-path cursor; relative paths resolve against it and `.` /
//! `..` segments are normalized before any lookup. Resolution never mutates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Coarse classification of a failed engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The path or pid does not resolve.
    NotFound,
    /// The target exists but the operation does not apply to it.
    InvalidOperation,
}

/// Errors from filesystem operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("{0}: No such file or directory")]
    NotFound(String),

    #[error("{0}: Not a directory")]
    NotADirectory(String),

    #[error("{0}: Is a directory")]
    IsADirectory(String),

    #[error("{0}: Invalid path")]
    InvalidPath(String),
}

impl FsError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FsError::NotFound(_) => FailureKind::NotFound,
            FsError::NotADirectory(_) | FsError::IsADirectory(_) | FsError::InvalidPath(_) => {
                FailureKind::InvalidOperation
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Directory,
    File,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Directory => write!(f, "directory"),
            NodeKind::File => write!(f, "file"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Directory {
    pub children: BTreeMap<String, Node>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Directory {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            children: BTreeMap::new(),
            created_at: now,
            modified_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    pub content: String,
    /// Byte length of `content`.
    pub size: usize,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl File {
    fn new(content: String, now: DateTime<Utc>) -> Self {
        Self {
            size: content.len(),
            content,
            created_at: now,
            modified_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    Directory(Directory),
    File(File),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Directory(_) => NodeKind::Directory,
            Node::File(_) => NodeKind::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    /// Bytes for files, child count for directories.
    pub fn size(&self) -> usize {
        match self {
            Node::Directory(d) => d.children.len(),
            Node::File(f) => f.size,
        }
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        match self {
            Node::Directory(d) => d.modified_at,
            Node::File(f) => f.modified_at,
        }
    }
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub kind: NodeKind,
    pub size: usize,
    pub modified_at: DateTime<Utc>,
}

/// Outcome of a successful `change_directory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirChange {
    Moved { from: String, to: String },
    /// The cursor already pointed at the target.
    Unchanged,
}

fn join(segments: &[String]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// The virtual filesystem and its cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualFileTree {
    root: Node,
    cwd: Vec<String>,
}

impl VirtualFileTree {
    /// An empty tree containing only `/`.
    pub fn new() -> Self {
        Self::empty_at(Utc::now())
    }

    fn empty_at(now: DateTime<Utc>) -> Self {
        Self {
            root: Node::Directory(Directory::new(now)),
            cwd: Vec::new(),
        }
    }

    /// Current directory as an absolute path.
    pub fn cwd(&self) -> String {
        join(&self.cwd)
    }

    /// Normalize `path` into absolute segments.
    fn segments(&self, path: &str) -> Vec<String> {
        let mut segments = if path.starts_with('/') {
            Vec::new()
        } else {
            self.cwd.clone()
        };

        for part in path.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name.to_string()),
            }
        }
        segments
    }

    /// Absolute, normalized form of `path`.
    pub fn absolute(&self, path: &str) -> String {
        join(&self.segments(path))
    }

    fn lookup(&self, segments: &[String]) -> Option<&Node> {
        let mut current = &self.root;
        for name in segments {
            match current {
                Node::Directory(dir) => current = dir.children.get(name)?,
                Node::File(_) => return None,
            }
        }
        Some(current)
    }

    fn lookup_dir_mut(&mut self, segments: &[String]) -> Result<&mut Directory, FsError> {
        let mut current = &mut self.root;
        for (depth, name) in segments.iter().enumerate() {
            let Node::Directory(dir) = current else {
                return Err(FsError::NotADirectory(join(&segments[..depth])));
            };
            current = dir
                .children
                .get_mut(name)
                .ok_or_else(|| FsError::NotFound(join(&segments[..=depth])))?;
        }
        match current {
            Node::Directory(dir) => Ok(dir),
            Node::File(_) => Err(FsError::NotADirectory(join(segments))),
        }
    }

    /// Split `path` into its parent segments and final name.
    fn split_parent(&self, path: &str) -> Result<(Vec<String>, String), FsError> {
        let mut segments = self.segments(path);
        let name = segments
            .pop()
            .ok_or_else(|| FsError::InvalidPath(path.to_string()))?;
        Ok((segments, name))
    }

    /// Resolve a path to a node. `/` and the empty path yield the root.
    pub fn resolve(&self, path: &str) -> Option<&Node> {
        self.lookup(&self.segments(path))
    }

    fn insert(&mut self, path: &str, node: Node, now: DateTime<Utc>) -> Result<String, FsError> {
        let (parent, name) = self.split_parent(path)?;
        let dir = self.lookup_dir_mut(&parent)?;
        // Last write wins on a name collision.
        dir.children.insert(name.clone(), node);
        dir.modified_at = now;

        let mut full = parent;
        full.push(name);
        if self.cwd.len() > full.len() && self.cwd.starts_with(&full) {
            self.retreat_cursor();
        }
        Ok(join(&full))
    }

    /// Walk the cursor up until it names a directory again.
    fn retreat_cursor(&mut self) {
        while !matches!(self.lookup(&self.cwd), Some(Node::Directory(_))) {
            self.cwd.pop();
        }
    }

    /// Create an empty directory. Returns its absolute path.
    ///
    /// Replacing an ancestor of the cursor moves the cursor to the deepest
    /// directory that still exists.
    pub fn make_directory(&mut self, path: &str, now: DateTime<Utc>) -> Result<String, FsError> {
        self.insert(path, Node::Directory(Directory::new(now)), now)
    }

    /// Create a file with `content`. Returns its absolute path.
    pub fn create_file(
        &mut self,
        path: &str,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<String, FsError> {
        self.insert(path, Node::File(File::new(content.into(), now)), now)
    }

    /// Remove a file or directory (with its subtree).
    ///
    /// If the cursor was inside the removed subtree it moves to the parent.
    pub fn remove(&mut self, path: &str, now: DateTime<Utc>) -> Result<NodeKind, FsError> {
        let (parent, name) = self.split_parent(path)?;
        let dir = self.lookup_dir_mut(&parent)?;
        let removed = dir.children.remove(&name).ok_or_else(|| {
            let mut full = parent.clone();
            full.push(name.clone());
            FsError::NotFound(join(&full))
        })?;
        dir.modified_at = now;

        let mut full = parent.clone();
        full.push(name);
        if self.cwd.starts_with(&full) {
            self.cwd = parent;
        }

        Ok(removed.kind())
    }

    /// Move the cursor. Supports absolute and relative paths and `..`.
    pub fn change_directory(&mut self, path: &str) -> Result<DirChange, FsError> {
        let target = self.segments(path);
        match self.lookup(&target) {
            None => return Err(FsError::NotFound(join(&target))),
            Some(Node::File(_)) => return Err(FsError::NotADirectory(join(&target))),
            Some(Node::Directory(_)) => {}
        }

        if target == self.cwd {
            return Ok(DirChange::Unchanged);
        }

        let from = self.cwd();
        self.cwd = target;
        Ok(DirChange::Moved {
            from,
            to: self.cwd(),
        })
    }

    /// List a directory in name order.
    pub fn list(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let segments = self.segments(path);
        match self.lookup(&segments) {
            None => Err(FsError::NotFound(join(&segments))),
            Some(Node::File(_)) => Err(FsError::NotADirectory(join(&segments))),
            Some(Node::Directory(dir)) => Ok(dir
                .children
                .iter()
                .map(|(name, node)| DirEntry {
                    name: name.clone(),
                    kind: node.kind(),
                    size: node.size(),
                    modified_at: node.modified_at(),
                })
                .collect()),
        }
    }

    /// List the current directory.
    pub fn list_cwd(&self) -> Result<Vec<DirEntry>, FsError> {
        let cwd = self.cwd();
        self.list(&cwd)
    }

    pub fn read_file(&self, path: &str) -> Result<&str, FsError> {
        let segments = self.segments(path);
        match self.lookup(&segments) {
            None => Err(FsError::NotFound(join(&segments))),
            Some(Node::Directory(_)) => Err(FsError::IsADirectory(join(&segments))),
            Some(Node::File(file)) => Ok(&file.content),
        }
    }
}

impl Default for VirtualFileTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Directories present at boot.
pub const DEFAULT_DIRECTORIES: [&str; 9] = [
    "/home",
    "/home/player",
    "/home/player/Documents",
    "/home/player/Games",
    "/home/player/Achievements",
    "/usr",
    "/usr/games",
    "/tmp",
    "/challenges",
];

const WELCOME: &str = "🎮 Welcome to GameOS! 🎮

Congratulations on starting your journey as a System Administrator!

🏆 How to Play:
• Create files and folders to earn XP
• Complete daily missions for bonus rewards
• Unlock achievements by mastering different skills
• Level up to become the ultimate System Admin!

💡 Tips:
• Use the terminal for bonus XP
• Explore different directories
• Manage processes like a pro

Good luck, Administrator! 🚀";

const TUTORIAL: &str = "📚 GameOS Tutorial

📁 File Management:
• Create files: +10 XP each
• Create folders: +25 XP each
• Delete files: +5 XP each
• Navigate folders: +2 XP each

⚙️ Process Management:
• Create process: +30 XP
• Kill process: +20 XP
• Monitor system: +10 XP

💻 Terminal Commands:
• Each command: +5 XP
• 25 commands: Unlock \"Terminal Rookie\"
• 100 commands: Unlock \"Terminal Expert\"";

const SNAKE: &str = "#!/usr/bin/env gameos
# 🐍 Snake Game

print(\"🐍 Welcome to Snake Game!\")
print(\"Play games to unlock the 'Gamer' achievement!\")";

const PUZZLE: &str = "#!/usr/bin/env gameos
# 🧩 Logic Puzzle Game

print(\"🧩 Welcome to Logic Puzzles!\")
print(\"Solve puzzles to earn bonus XP!\")";

const DAILY_CHALLENGE: &str = "🎯 Daily Challenge System

Each day brings new challenges!
Complete all daily missions to earn the Efficiency Expert badge
and keep your challenge streak alive.";

/// Files present at boot, except the session log.
pub const DEFAULT_FILES: [(&str, &str); 5] = [
    ("/home/player/welcome.txt", WELCOME),
    ("/home/player/tutorial.txt", TUTORIAL),
    ("/usr/games/snake.py", SNAKE),
    ("/usr/games/puzzle.py", PUZZLE),
    ("/challenges/daily_challenge.txt", DAILY_CHALLENGE),
];

/// Path of the per-session activity log.
pub const GAME_LOG: &str = "/tmp/game_log.txt";

impl VirtualFileTree {
    /// The boot layout: default directories, files and the session log.
    pub fn seeded(started_at: DateTime<Utc>) -> Result<Self, FsError> {
        let mut tree = Self::empty_at(started_at);
        for dir in DEFAULT_DIRECTORIES {
            tree.make_directory(dir, started_at)?;
        }
        for (path, content) in DEFAULT_FILES {
            tree.create_file(path, content, started_at)?;
        }
        tree.create_file(
            GAME_LOG,
            format!(
                "🎮 GameOS Activity Log\n\nSession Started: {}\nPlayer Level: 1\nTotal XP: 0\n",
                started_at.format("%Y-%m-%d %H:%M:%S")
            ),
            started_at,
        )?;
        Ok(tree)
    }
}
