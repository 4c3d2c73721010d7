// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{Error, nibbles};
use crate::utils::encoding::{append_hash, keccak_hash};
use ethereum_types::H256;
use rlp::{Rlp, RlpStream};

/// Node of a hexary Merkle-Patricia trie. Paths are nibble sequences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Node {
    #[default]
    Empty,
    Leaf {
        path: Vec<u8>,
        value: Vec<u8>,
    },
    Extension {
        path: Vec<u8>,
        child: Box<Node>,
    },
    Branch {
        children: Box<[Node; 16]>,
        value: Option<Vec<u8>>,
    },
    /// A node that lives in the database and has not been loaded yet.
    Hash(H256),
}

impl Node {
    pub fn empty_children() -> Box<[Node; 16]> {
        Box::new(std::array::from_fn(|_| Node::Empty))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    /// Decodes the RLP of a stored node.
    pub fn decode(rlp: &Rlp) -> Result<Self, Error> {
        match rlp.item_count()? {
            2 => {
                let (path, leaf) = nibbles::decode_compact(rlp.at(0)?.data()?)?;
                if leaf {
                    Ok(Node::Leaf {
                        path,
                        value: rlp.at(1)?.data()?.to_vec(),
                    })
                } else {
                    if path.is_empty() {
                        return Err(Error::Invalid("extension with an empty path".into()));
                    }
                    Ok(Node::Extension {
                        path,
                        child: Box::new(Self::decode_ref(&rlp.at(1)?)?),
                    })
                }
            }
            17 => {
                let mut children = Self::empty_children();
                for (i, child) in children.iter_mut().enumerate() {
                    *child = Self::decode_ref(&rlp.at(i)?)?;
                }
                let value = rlp.at(16)?.data()?;
                Ok(Node::Branch {
                    children,
                    value: (!value.is_empty()).then(|| value.to_vec()),
                })
            }
            n => Err(Error::Invalid(format!("node with {n} items"))),
        }
    }

    /// Decodes a child reference: a hash, an empty string or an inline node.
    fn decode_ref(rlp: &Rlp) -> Result<Self, Error> {
        if rlp.is_list() {
            return Self::decode(rlp);
        }
        let data = rlp.data()?;
        match data.len() {
            0 => Ok(Node::Empty),
            32 => Ok(Node::Hash(H256::from_slice(data))),
            n => Err(Error::Invalid(format!("child reference of {n} bytes"))),
        }
    }

    /// RLP encoding of this node. Children whose encoding is at least 32
    /// bytes are referenced by hash and handed to `sink` together with their
    /// encoding. The node itself is not passed to `sink`.
    pub fn encode<F>(&self, sink: &mut F) -> Vec<u8>
    where
        F: FnMut(H256, Vec<u8>),
    {
        let mut s = RlpStream::new();
        match self {
            Node::Empty => {
                s.append_empty_data();
            }
            Node::Hash(hash) => append_hash(&mut s, hash),
            Node::Leaf { path, value } => {
                s.begin_list(2);
                s.append(&nibbles::encode_compact(path, true));
                s.append(value);
            }
            Node::Extension { path, child } => {
                s.begin_list(2);
                s.append(&nibbles::encode_compact(path, false));
                child.append_ref(&mut s, sink);
            }
            Node::Branch { children, value } => {
                s.begin_list(17);
                for child in children.iter() {
                    child.append_ref(&mut s, sink);
                }
                match value {
                    Some(value) => {
                        s.append(value);
                    }
                    None => {
                        s.append_empty_data();
                    }
                }
            }
        }
        s.out().to_vec()
    }

    fn append_ref<F>(&self, s: &mut RlpStream, sink: &mut F)
    where
        F: FnMut(H256, Vec<u8>),
    {
        match self {
            Node::Empty => {
                s.append_empty_data();
            }
            Node::Hash(hash) => append_hash(s, hash),
            _ => {
                let encoded = self.encode(sink);
                if encoded.len() < 32 {
                    s.append_raw(&encoded, 1);
                } else {
                    let hash = keccak_hash(&encoded);
                    sink(hash, encoded);
                    append_hash(s, &hash);
                }
            }
        }
    }
}
