//! Location request construction, lifecycle state and response parsing.

mod builder;
mod response;
mod state;

pub use builder::RequestBuilder;
pub use response::{
    classify, ErrorResponse, ResponseOutcome, ServiceErrorDetail, SuccessResponse,
};
pub use state::{RequestState, ResultKind};
