pub mod card;
pub mod column;
pub mod error;
pub mod layout;
pub mod transition;

pub use card::{Board, BoardColumn, Card};
pub use column::ColumnType;
pub use error::KanbanError;
pub use layout::BoardLayout;
pub use transition::Transition;
