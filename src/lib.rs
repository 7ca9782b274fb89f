//! Protocol state for IRC relays.
//!
//! Lichen keeps track of what an IRC server has told a client:
//! which channels it is in, who else is in them and with what rank,
//! and which modes are set.
//! It does no I/O; feed decoded messages into [`upstream::Upstream::handle`].
//!
//! Names are compared under the server's casemapping ([`casemap::Casemap`]),
//! so most lookups go through a [`foldmap::FoldMap`].
//!
//! # Features
//!
//! * `tracing` (default): log ignored input and recoverable oddities using `tracing`.
//! * `serde`: (de)serialization of modes, ranks, and [`channel::ModeRules`].
#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]
#![deny(clippy::redundant_else)]
#![deny(clippy::semicolon_if_nothing_returned)]
#![deny(rustdoc::bare_urls)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![deny(rustdoc::invalid_html_tags)]
#![deny(rustdoc::invalid_rust_codeblocks)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod casemap;
pub mod channel;
pub mod error;
pub mod foldmap;
pub mod membership;
pub mod mode;
pub mod upstream;
