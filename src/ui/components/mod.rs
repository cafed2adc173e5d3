mod input;
mod key_result;
mod multi_select;
mod search_input;

pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
pub use multi_select::{MultiSelect, MultiSelectEvent};
pub use search_input::{SearchEvent, SearchInput};
