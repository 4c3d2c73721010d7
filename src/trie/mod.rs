// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Hexary Merkle-Patricia trie backed by a [`KeyValueStore`]. Nodes are
//! stored under their Keccak-256 hash; nodes whose encoding is shorter than
//! 32 bytes are inlined into their parent.

mod error;
mod iter;
pub mod nibbles;
mod node;
mod secure;

pub use error::Error;
pub use iter::TrieIter;
pub use node::Node;
pub use secure::SecureTrie;

use crate::db::KeyValueStore;
use crate::utils::encoding::keccak_hash;
use ethereum_types::H256;
use rlp::Rlp;

/// `Keccak256(RLP(""))`, the root of a trie without entries.
pub const EMPTY_ROOT_HASH: H256 = H256([
    0x56, 0xe8, 0x1f, 0x17, 0x1b, 0xcc, 0x55, 0xa6, 0xff, 0x83, 0x45, 0xe6, 0x92, 0xc0, 0xf8, 0x6e,
    0x5b, 0x48, 0xe0, 0x1b, 0x99, 0x6c, 0xad, 0xc0, 0x01, 0x62, 0x2f, 0xb5, 0xe3, 0x63, 0xb4, 0x21,
]);

/// A Merkle-Patricia trie. Modifications stay in memory until
/// [`Trie::commit`] writes the changed nodes to the store.
///
/// If an operation fails because the store is missing or holds a corrupt
/// node, the trie must be discarded.
#[derive(Debug)]
pub struct Trie<DB> {
    root: Node,
    db: DB,
}

impl<DB> Trie<DB>
where
    DB: KeyValueStore,
{
    /// Creates an empty trie.
    pub fn new(db: DB) -> Self {
        Self {
            root: Node::Empty,
            db,
        }
    }

    /// Opens the trie with the given root. The root node must be present in
    /// the store unless it is [`EMPTY_ROOT_HASH`].
    pub fn open(db: DB, root: H256) -> Result<Self, Error> {
        if root == EMPTY_ROOT_HASH {
            return Ok(Self::new(db));
        }
        if !db.exists(root.as_bytes())? {
            return Err(Error::MissingNode(root));
        }
        Ok(Self {
            root: Node::Hash(root),
            db,
        })
    }

    pub fn db(&self) -> &DB {
        &self.db
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        get_at(&self.db, &self.root, &nibbles::from_bytes(key))
    }

    /// Sets `key` to `value`. An empty value removes the key.
    pub fn insert(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), Error> {
        if value.is_empty() {
            return self.remove(key);
        }
        let root = std::mem::take(&mut self.root);
        self.root = insert_at(&self.db, root, &nibbles::from_bytes(key), value)?;
        Ok(())
    }

    pub fn remove(&mut self, key: &[u8]) -> Result<(), Error> {
        let root = std::mem::take(&mut self.root);
        self.root = remove_at(&self.db, root, &nibbles::from_bytes(key))?.1;
        Ok(())
    }

    /// Root hash of the current content. Nothing is written.
    pub fn hash(&self) -> H256 {
        root_hash(&self.root, &mut |_, _| {})
    }

    /// Writes every in-memory node to the store and returns the root hash.
    /// The trie stays usable; committed nodes are loaded back on demand.
    pub fn commit(&mut self) -> Result<H256, Error> {
        let mut nodes = Vec::new();
        let root = root_hash(&self.root, &mut |hash, data| nodes.push((hash, data)));
        self.db
            .write_batch(nodes.iter().map(|(hash, data)| (hash.as_bytes(), data)))?;
        if !self.root.is_empty() {
            self.root = Node::Hash(root);
        }
        Ok(root)
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> TrieIter<'_, DB> {
        TrieIter::new(&self.db, self.root.clone())
    }
}

/// The root is always hashed, even when its encoding is short.
fn root_hash<F>(root: &Node, sink: &mut F) -> H256
where
    F: FnMut(H256, Vec<u8>),
{
    match root {
        Node::Empty => EMPTY_ROOT_HASH,
        Node::Hash(hash) => *hash,
        _ => {
            let encoded = root.encode(sink);
            let hash = keccak_hash(&encoded);
            sink(hash, encoded);
            hash
        }
    }
}

fn resolve(db: &impl KeyValueStore, hash: &H256) -> Result<Node, Error> {
    let data = db
        .read_bin(hash.as_bytes())?
        .ok_or(Error::MissingNode(*hash))?;
    Node::decode(&Rlp::new(&data))
}

fn get_at(db: &impl KeyValueStore, node: &Node, path: &[u8]) -> Result<Option<Vec<u8>>, Error> {
    match node {
        Node::Empty => Ok(None),
        Node::Leaf { path: rest, value } => Ok((rest.as_slice() == path).then(|| value.clone())),
        Node::Extension {
            path: prefix,
            child,
        } => match path.strip_prefix(prefix.as_slice()) {
            Some(rest) => get_at(db, child, rest),
            None => Ok(None),
        },
        Node::Branch { children, value } => match path.split_first() {
            None => Ok(value.clone()),
            Some((&nibble, rest)) => get_at(db, &children[usize::from(nibble)], rest),
        },
        Node::Hash(hash) => get_at(db, &resolve(db, hash)?, path),
    }
}

/// Wraps `node` in an extension when `prefix` is not empty.
fn with_prefix(prefix: &[u8], node: Node) -> Node {
    if prefix.is_empty() {
        node
    } else {
        Node::Extension {
            path: prefix.to_vec(),
            child: Box::new(node),
        }
    }
}

fn insert_at(
    db: &impl KeyValueStore,
    node: Node,
    path: &[u8],
    value: Vec<u8>,
) -> Result<Node, Error> {
    Ok(match node {
        Node::Empty => Node::Leaf {
            path: path.to_vec(),
            value,
        },
        Node::Hash(hash) => insert_at(db, resolve(db, &hash)?, path, value)?,
        Node::Leaf {
            path: existing,
            value: existing_value,
        } => {
            if existing == path {
                return Ok(Node::Leaf {
                    path: existing,
                    value,
                });
            }
            let common = nibbles::common_prefix_len(&existing, path);
            let mut children = Node::empty_children();
            let mut branch_value = None;
            for (rest, v) in [
                (&existing[common..], existing_value),
                (&path[common..], value),
            ] {
                match rest.split_first() {
                    None => branch_value = Some(v),
                    Some((&nibble, tail)) => {
                        children[usize::from(nibble)] = Node::Leaf {
                            path: tail.to_vec(),
                            value: v,
                        }
                    }
                }
            }
            with_prefix(
                &path[..common],
                Node::Branch {
                    children,
                    value: branch_value,
                },
            )
        }
        Node::Extension {
            path: prefix,
            child,
        } => {
            let common = nibbles::common_prefix_len(&prefix, path);
            if common == prefix.len() {
                return Ok(Node::Extension {
                    child: Box::new(insert_at(db, *child, &path[common..], value)?),
                    path: prefix,
                });
            }
            // split the extension at the first diverging nibble
            let mut children = Node::empty_children();
            let mut branch_value = None;
            children[usize::from(prefix[common])] = with_prefix(&prefix[common + 1..], *child);
            match path[common..].split_first() {
                None => branch_value = Some(value),
                Some((&nibble, tail)) => {
                    children[usize::from(nibble)] = Node::Leaf {
                        path: tail.to_vec(),
                        value,
                    }
                }
            }
            with_prefix(
                &prefix[..common],
                Node::Branch {
                    children,
                    value: branch_value,
                },
            )
        }
        Node::Branch {
            mut children,
            value: branch_value,
        } => match path.split_first() {
            None => Node::Branch {
                children,
                value: Some(value),
            },
            Some((&nibble, rest)) => {
                let slot = &mut children[usize::from(nibble)];
                *slot = insert_at(db, std::mem::take(slot), rest, value)?;
                Node::Branch {
                    children,
                    value: branch_value,
                }
            }
        },
    })
}

/// Returns whether anything was removed, and the replacement node.
fn remove_at(db: &impl KeyValueStore, node: Node, path: &[u8]) -> Result<(bool, Node), Error> {
    match node {
        Node::Empty => Ok((false, Node::Empty)),
        Node::Hash(hash) => {
            let (removed, node) = remove_at(db, resolve(db, &hash)?, path)?;
            // keep the reference when nothing changed
            Ok((removed, if removed { node } else { Node::Hash(hash) }))
        }
        Node::Leaf {
            path: existing,
            value,
        } => {
            if existing == path {
                Ok((true, Node::Empty))
            } else {
                Ok((
                    false,
                    Node::Leaf {
                        path: existing,
                        value,
                    },
                ))
            }
        }
        Node::Extension {
            path: prefix,
            child,
        } => {
            let Some(rest) = path.strip_prefix(prefix.as_slice()) else {
                return Ok((
                    false,
                    Node::Extension {
                        path: prefix,
                        child,
                    },
                ));
            };
            let (removed, child) = remove_at(db, *child, rest)?;
            if !removed {
                return Ok((
                    false,
                    Node::Extension {
                        path: prefix,
                        child: Box::new(child),
                    },
                ));
            }
            Ok((true, merge_prefix(prefix, child)))
        }
        Node::Branch {
            mut children,
            mut value,
        } => {
            let removed = match path.split_first() {
                None => value.take().is_some(),
                Some((&nibble, rest)) => {
                    let slot = &mut children[usize::from(nibble)];
                    let (removed, child) = remove_at(db, std::mem::take(slot), rest)?;
                    *slot = child;
                    removed
                }
            };
            if !removed {
                return Ok((false, Node::Branch { children, value }));
            }
            Ok((true, collapse_branch(db, children, value)?))
        }
    }
}

/// Prepends `prefix` to `node`, merging consecutive path segments.
fn merge_prefix(mut prefix: Vec<u8>, node: Node) -> Node {
    match node {
        Node::Empty => Node::Empty,
        Node::Leaf { path, value } => {
            prefix.extend(path);
            Node::Leaf {
                path: prefix,
                value,
            }
        }
        Node::Extension { path, child } => {
            prefix.extend(path);
            Node::Extension {
                path: prefix,
                child,
            }
        }
        other => with_prefix(&prefix, other),
    }
}

/// Restores the canonical shape of a branch after a removal: a branch must
/// keep at least two of its 17 slots occupied.
fn collapse_branch(
    db: &impl KeyValueStore,
    mut children: Box<[Node; 16]>,
    value: Option<Vec<u8>>,
) -> Result<Node, Error> {
    let mut occupied = children
        .iter()
        .enumerate()
        .filter(|(_, child)| !child.is_empty())
        .map(|(i, _)| i);
    let only = match (occupied.next(), occupied.next()) {
        (Some(i), None) => i,
        (None, _) => {
            return Ok(match value {
                Some(value) => Node::Leaf {
                    path: vec![],
                    value,
                },
                None => Node::Empty,
            });
        }
        _ => return Ok(Node::Branch { children, value }),
    };
    if value.is_some() {
        return Ok(Node::Branch { children, value });
    }
    let child = match std::mem::take(&mut children[only]) {
        Node::Hash(hash) => resolve(db, &hash)?,
        child => child,
    };
    // `only` is below 16
    let nibble = only as u8;
    Ok(match child {
        child @ (Node::Leaf { .. } | Node::Extension { .. }) => merge_prefix(vec![nibble], child),
        child => with_prefix(&[nibble], child),
    })
}
