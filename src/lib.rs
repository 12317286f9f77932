//! Ordered maps backed by red-black trees.
//!
//! Two representations of the same map are provided:
//!
//! * [`RbTree`] links heap-allocated nodes with raw pointers, an absent child
//!   being a null pointer.
//! * [`NilTree`] keeps its nodes in an arena and routes every absent child
//!   through a virtual, always-black [`niltree::Link::Nil`] leaf.
//!
//! Both order keys with a caller-supplied [`Compare`] and implement
//! [`OrderedMap`], so code written against the trait works with either.
//!
//! ```
//! use redblack::{OrderedMap, RbTree};
//!
//! let mut tree = RbTree::<u32, &str>::default();
//! tree.add(2, "two").unwrap();
//! tree.add(1, "one").unwrap();
//! assert!(tree.add(1, "uno").is_err());
//!
//! assert_eq!(tree.min_key().unwrap(), &1);
//! assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
//! ```
pub mod compare;
pub mod error;
pub mod map;
pub mod niltree;
pub mod rbtree;

pub use compare::{Compare, Natural, Reverse};
pub use error::{Result, TreeError, Violation};
pub use map::OrderedMap;
pub use niltree::NilTree;
pub use rbtree::{Color, RbTree};
