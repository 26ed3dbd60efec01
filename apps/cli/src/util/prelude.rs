pub use crate::context::Context;
pub use crate::print_output;
pub use crate::util::output::{print_images, print_json};
pub use crate::context::OutputFormat;
