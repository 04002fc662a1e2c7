//! Command Construction
//!
//! Turns typed filter operations into positional argument lists.
//!
//! ## Supported Commands
//!
//! - `RESERVE name rate capacity [NONSCALING | EXPANSION n]` - Create a filter
//! - `ADD name item` - Add one item
//! - `MADD name item [item ...]` - Add several items
//! - `EXISTS name item` - Query one item
//! - `MEXISTS name item [item ...]` - Query several items
//! - `INFO name` - Describe a filter
//! - `INSERT name [ERROR r] [CAPACITY c] [NONSCALING | EXPANSION n] [NOCREATE] ITEMS item...`
//!   - Add items, creating the filter if allowed
//!
//! Each name is sent prefixed by the family namespace, e.g. `BF.ADD`.

pub mod builder;
pub mod item;

pub use builder::{Command, CommandBuilder, InsertOptions};
pub use item::{Item, Number};
