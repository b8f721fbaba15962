//! Data layer: discovery, line classification and extraction.
//!
//! Architecture:
//! ```text
//!   directory of .pdh files
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  index    │  stem → path
//!   └──────────┘
//!        │ resolve(name)
//!        ├───────────────────────────┐
//!        ▼                           ▼
//!   ┌──────────────┐          ┌──────────────┐
//!   │ extract_data │          │  classify     │  keep lines starting with `<`
//!   │ skip head/foot│         └──────────────┘
//!   └──────────────┘                 │
//!        │                           ▼
//!        ▼                    ┌──────────────┐
//!     DataTable               │  xml          │  parse buffer → XmlDocument
//!                             └──────────────┘
//! ```
//!
//! The two extraction paths never share state; each re-reads the file.

pub mod classify;
pub mod index;
pub mod loader;
pub mod model;
pub mod xml;
