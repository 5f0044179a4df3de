//! Package implement an ordered-map using a classic [red-black][wiki-rb]
//! tree with parent links.
//!
//! - Each entry in [RbMap] instance correspond to a {Key, Value} pair.
//! - Parametrised over `key-type`, `value-type` and an ordering predicate
//!   `less(a, b)`, supplied once at construction.
//! - CRUD operations, via insert(), find(), find_mut(), delete() api.
//! - Node handles, via find_node(), first(), last(), next() and prev(),
//!   usable for in-place value update and for delete_node().
//! - Full table scan, forward and reverse.
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! Nodes live in an arena and link to each other by index, parent links
//! included, so walking from any node to its in-order neighbour needs no
//! auxiliary state.
//!
//! Constructing a new [RbMap] instance and CRUD operations:
//!
//! ```
//! use rbmap::RbMap;
//!
//! let mut index: RbMap<String, String> = RbMap::new();
//! assert_eq!(index.len(), 0);
//! assert_eq!(index.is_empty(), true);
//!
//! assert!(index.insert("key1".to_string(), "value1".to_string()));
//! assert!(index.insert("key2".to_string(), "value2".to_string()));
//! assert!(!index.insert("key2".to_string(), "value3".to_string()));
//!
//! assert_eq!(index.len(), 2);
//! assert_eq!(index.find(&"key2".to_string()).unwrap(), "value3");
//!
//! assert!(index.delete(&"key1".to_string()));
//! assert!(index.find(&"key1".to_string()).is_none());
//! ```
//!
//! Walking with node handles, using a custom ordering:
//!
//! ```
//! use rbmap::RbMap;
//!
//! let mut index = RbMap::with_less(|a: &i32, b: &i32| a > b);
//! for key in [5, 3, 8, 1].iter() {
//!     index.insert(*key, key * 10);
//! }
//!
//! let mut keys = vec![];
//! let mut node = index.first();
//! while let Some(n) = node {
//!     *index.value_mut(n) += 1;
//!     keys.push(*index.key(n));
//!     node = index.next(n);
//! }
//! assert_eq!(keys, vec![8, 5, 3, 1]);
//! assert_eq!(index.find(&3), Some(&31));
//! ```
//!
//! [wiki-rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use std::{error, fmt, result};

// Short form to compose Error values.
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, msg: format!("bad argument"));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, some_result, format!("validate failed"));
// ```
//
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err(Error::$v(prefix, format!("{}", err)))
            }
        }
    }};
    ($v:ident, $e:expr, $($arg:expr),+) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                let msg = format!($($arg),+);
                Err(Error::$v(prefix, format!("{} {}", err, msg)))
            }
        }
    }};
}

mod arena;
mod node;
mod rbmap;
mod tree;

pub use crate::node::NodeId;
pub use crate::rbmap::{Iter, NaturalLess, RbMap};

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    /// A red-black or search-tree invariant does not hold.
    Fatal(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
