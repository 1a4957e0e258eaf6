//! Table reconstruction from positioned fragments.
//!
//! Pages go through [`rows::group_rows`], the document-wide [`columns::MasterLayout`]
//! is inferred from every page's header rows, then [`assemble::assemble_page`]
//! builds one table per page.

pub mod assemble;
pub mod assign;
pub mod columns;
pub mod header;
pub mod rows;
