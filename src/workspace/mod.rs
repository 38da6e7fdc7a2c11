//! Workspace discovery: scan for documents directories and propose where the
//! routing contract and learning ledger go.

pub mod mapping;
pub mod scanner;

pub use mapping::PathMapping;
pub use scanner::WorkspaceScanner;
