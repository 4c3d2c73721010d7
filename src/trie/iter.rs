// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{Error, Node, nibbles, resolve};
use crate::db::KeyValueStore;

/// Depth-first walk over a trie, yielding `(key, value)` pairs in key order.
/// Nodes are loaded from the store as the walk reaches them. The first error
/// ends the iteration.
pub struct TrieIter<'a, DB> {
    db: &'a DB,
    /// Pending nodes with the nibble path leading to them.
    stack: Vec<(Vec<u8>, Node)>,
}

impl<'a, DB> TrieIter<'a, DB> {
    pub(super) fn new(db: &'a DB, root: Node) -> Self {
        Self {
            db,
            stack: vec![(Vec::new(), root)],
        }
    }
}

fn entry(path: &[u8], value: Vec<u8>) -> Result<(Vec<u8>, Vec<u8>), Error> {
    Ok((nibbles::to_bytes(path)?, value))
}

impl<DB> Iterator for TrieIter<'_, DB>
where
    DB: KeyValueStore,
{
    type Item = Result<(Vec<u8>, Vec<u8>), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((mut path, node)) = self.stack.pop() {
            match node {
                Node::Empty => {}
                Node::Hash(hash) => match resolve(self.db, &hash) {
                    Ok(node) => self.stack.push((path, node)),
                    Err(e) => {
                        self.stack.clear();
                        return Some(Err(e));
                    }
                },
                Node::Leaf { path: rest, value } => {
                    path.extend(rest);
                    return Some(entry(&path, value));
                }
                Node::Extension { path: rest, child } => {
                    path.extend(rest);
                    self.stack.push((path, *child));
                }
                Node::Branch { children, value } => {
                    let children: [Node; 16] = *children;
                    for (nibble, child) in children.into_iter().enumerate().rev() {
                        if !child.is_empty() {
                            let mut child_path = path.clone();
                            // `nibble` is below 16
                            child_path.push(nibble as u8);
                            self.stack.push((child_path, child));
                        }
                    }
                    if let Some(value) = value {
                        return Some(entry(&path, value));
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::super::Trie;
    use crate::db::MemoryDB;
    use std::collections::BTreeMap;

    #[test]
    fn yields_sorted_entries() -> anyhow::Result<()> {
        let db = MemoryDB::default();
        let mut trie = Trie::new(&db);
        let entries = [
            ("dog", "puppy"),
            ("do", "verb"),
            ("doge", "coin"),
            ("horse", "stallion"),
        ];
        for (k, v) in entries {
            trie.insert(k.as_bytes(), v.as_bytes().to_vec())?;
        }
        let keys: Vec<_> = trie
            .iter()
            .map(|item| item.map(|(k, _)| String::from_utf8(k).unwrap()))
            .collect::<Result<_, _>>()?;
        assert_eq!(keys, ["do", "dog", "doge", "horse"]);
        Ok(())
    }

    #[quickcheck_macros::quickcheck]
    fn committed_trie_iterates_like_a_sorted_map(entries: BTreeMap<Vec<u8>, Vec<u8>>) -> bool {
        let entries: BTreeMap<_, _> = entries.into_iter().filter(|(_, v)| !v.is_empty()).collect();
        let db = MemoryDB::default();
        let mut trie = Trie::new(&db);
        for (k, v) in &entries {
            trie.insert(k, v.clone()).unwrap();
        }
        let root = trie.commit().unwrap();
        let reopened = Trie::open(&db, root).unwrap();
        let walked: Vec<_> = reopened.iter().map(Result::unwrap).collect();
        walked == entries.into_iter().collect::<Vec<_>>()
    }
}
