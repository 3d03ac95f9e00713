//! In-memory filesystem tree: files hold bytes, directories hold named children

/// A file or directory in an overlay tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(Vec<u8>),
    Directory(Directory),
}

impl Node {
    /// Create a file node from anything byte-like
    pub fn file(content: impl Into<Vec<u8>>) -> Self {
        Node::File(content.into())
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Node::Directory(dir) => Some(dir),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&[u8]> {
        match self {
            Node::File(content) => Some(content),
            Node::Directory(_) => None,
        }
    }

    /// Number of file nodes at or below this node
    pub fn file_count(&self) -> usize {
        match self {
            Node::File(_) => 1,
            Node::Directory(dir) => dir.iter().map(|(_, child)| child.file_count()).sum(),
        }
    }
}

impl From<Directory> for Node {
    fn from(dir: Directory) -> Self {
        Node::Directory(dir)
    }
}

/// Directory contents
///
/// Children keep the order they were inserted in: the decoder relies on this
/// to replay entries in the order the capturing runtime wrote them. Names are
/// unique. Equality ignores order, so two directories holding the same names
/// mapped to equal nodes compare equal.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    children: Vec<(String, Node)>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a child, replacing any existing child of the same name.
    ///
    /// Returns the replaced node, if any. A replaced child keeps its original
    /// position.
    pub fn insert(&mut self, name: impl Into<String>, node: Node) -> Option<Node> {
        let name = name.into();
        match self.children.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, node)),
            None => {
                self.children.push((name, node));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    /// Get the named subdirectory, creating it when absent.
    ///
    /// Returns `None` when the name is already taken by a file.
    pub fn ensure_directory(&mut self, name: &str) -> Option<&mut Directory> {
        if !self.contains(name) {
            self.children
                .push((name.to_string(), Node::Directory(Directory::new())));
        }
        match self.get_mut(name)? {
            Node::Directory(dir) => Some(dir),
            Node::File(_) => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Children sorted by name
    pub fn sorted(&self) -> Vec<(&str, &Node)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Look up a `/`-separated relative path
    pub fn lookup(&self, path: &str) -> Option<&Node> {
        let mut components = path.split('/').filter(|c| !c.is_empty());
        let first = components.next()?;
        let mut current = self.get(first)?;
        for component in components {
            current = current.as_directory()?.get(component)?;
        }
        Some(current)
    }
}

impl PartialEq for Directory {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, node)| other.get(name).is_some_and(|o| o == node))
    }
}

impl Eq for Directory {}

impl<S: Into<String>> FromIterator<(S, Node)> for Directory {
    fn from_iter<I: IntoIterator<Item = (S, Node)>>(iter: I) -> Self {
        let mut dir = Directory::new();
        for (name, node) in iter {
            dir.insert(name, node);
        }
        dir
    }
}

impl IntoIterator for Directory {
    type Item = (String, Node);
    type IntoIter = std::vec::IntoIter<(String, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}
