//! Texture tree indexing
//!
//! Scans a root directory for recognized image files and flattens the result
//! into a deterministically ordered node list with hierarchy info. The
//! indexer itself is stateless between calls: the caller owns the expansion
//! state, passes it into operations, and receives new values back.
//!
//! ## Overview
//!
//! - **Node**: one entry (folder or file) in the indexed subtree
//! - **scan**: walk the root and produce the ordered node sequence
//! - **ExpansionState**: which folders are open; drives `visible_subset`

mod expansion;
mod node;
mod scan;

pub use expansion::{visible_subset, ExpansionState};
pub use node::{is_image_extension, Node, NodeKind, IMAGE_EXTENSIONS};
pub use scan::{scan, ScanError};
