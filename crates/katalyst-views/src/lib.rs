//! Katalyst Views - presentation logic shared by the console and CLI
//!
//! Nothing here touches the terminal or the network. Pages hold backend
//! data as transient view state and these helpers decide how it is shown.

pub mod aggregate;
pub mod bands;
pub mod format;
pub mod layout;
pub mod loadable;
pub mod pages;

pub use aggregate::*;
pub use bands::*;
pub use format::*;
pub use layout::*;
pub use loadable::Loadable;
pub use pages::*;
