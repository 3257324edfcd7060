#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Cannot read input directory {0}")]
    InputDirectory(String),

    #[error("Cannot create output directory {0}")]
    OutputDirectory(String),

    #[error("{0} output file(s) could not be written")]
    WriteFailed(usize),
}
