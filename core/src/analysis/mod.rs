pub use report::*;
pub use sampling::*;

mod report;
mod sampling;
