/// Default cap on the size of one source unit (1 MiB). Stylesheets are small; anything
/// beyond this is rejected before scanning starts.
pub const DEFAULT_MAX_INPUT_SIZE: usize = 1024 * 1024;

/// ParserConfig holds the configuration for the parser
#[derive(Clone, Debug)]
pub struct ParserConfig {
    /// Optional source filename or url
    pub source: Option<String>,
    /// Inputs larger than this many bytes fail the call with `InputTooLarge`
    pub max_input_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            source: None,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }
}
