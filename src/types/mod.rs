//! Shared response and paging types.

mod pagination;
mod response;

pub use pagination::{Paginated, PaginationMeta, PaginationParams, PostPage};
pub use response::{Created, MessageResponse, NoContent};
