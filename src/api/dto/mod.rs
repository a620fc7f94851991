pub mod boards;
pub mod cards;

pub use boards::{BoardResponse, ColumnResponse, CreateBoardRequest};
pub use cards::{CardResponse, CreateCardRequest, ReasonRequest, TransitionResponse};
