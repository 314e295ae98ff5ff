//! Streaming decoder for data-dump XML documents.
//!
//! A dump document is a single container element wrapping any number of
//! attribute-only `<row/>` elements:
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <users>
//!   <row Id="-1" Reputation="1" CreationDate="2010-07-28T16:38:27.683" ... />
//!   ...
//! </users>
//! ```
//!
//! Documents run to many gigabytes, so [`RowReader`] pulls one row at a time
//! from a `quick-xml` event stream instead of building a tree.
//!
//! # Quick start
//!
//! ```no_run
//! use sedump_core::User;
//! use sedump_xml::RowReader;
//!
//! let xml = br#"<users><row Id="1" /></users>"#;
//! for user in RowReader::<_, User>::for_entity(&xml[..]) {
//!   println!("{:?}", user);
//! }
//! ```

mod decode;
pub mod error;

pub use decode::{RowReader, decode_rows};
pub use error::{Error, Result};
