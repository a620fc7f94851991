pub mod db;
pub mod repository;

pub use repository::{BoardRepository, CardRepository};
