/// Handles, declarations and visibilities
mod declaration;
/// Per-scope name -> declaration table
mod item_table;
/// The arena of scopes and declarations
mod module_tree;

pub use declaration::*;
pub use item_table::*;
pub use module_tree::*;
