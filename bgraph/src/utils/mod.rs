pub use anyhow::Error;
pub type IResult<T> = anyhow::Result<T>;

pub mod paths;

mod shell;
pub use shell::{ColorChoice, Shell, Verbosity};
