//! FCPX Document - Arena tree model for FCPXML
//!
//! Provides the document representation shared by the validators, the cut
//! detector, and the version converter:
//! - An index-addressed arena tree with explicit parent back-links
//! - Parse/serialize over quick-xml events
//! - The ordered set of supported schema versions

pub mod parse;
pub mod tree;
pub mod version;

pub use tree::{Descendants, NodeId, XmlDocument, XmlNode};
pub use version::{SchemaVersion, UnsupportedVersion};
