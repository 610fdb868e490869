pub mod layout;
pub mod writer;

pub use layout::Layout;
pub use writer::{AnsiWriter, JsonWriter, RowWriter};
