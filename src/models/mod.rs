pub mod request;
pub mod response;
pub mod resume;

pub use request::*;
pub use response::*;
pub use resume::ResumeDetails;
