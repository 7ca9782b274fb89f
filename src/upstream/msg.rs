use crate::error::ParseError;

/// A decoded IRC message.
///
/// This is what state tracking needs from whatever parses lines off the wire.
pub trait Instruction {
    /// The command or numeric, such as `MODE` or `353`.
    fn command(&self) -> &str;
    /// The message's source (`nick!user@host` or a server name), if any.
    fn source(&self) -> Option<&str>;
    /// The message's parameters, with the trailing parameter last.
    fn params(&self) -> &[String];
    /// The nickname portion of [`source`][Instruction::source].
    fn source_nick(&self) -> Option<&str> {
        let source = self.source()?;
        let end = source.find(|c: char| c == '!' || c == '@').unwrap_or(source.len());
        Some(&source[..end])
    }
}

/// A minimal owned [`Instruction`].
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Message {
    /// The message's source.
    pub source: Option<String>,
    /// The command or numeric.
    pub command: String,
    /// The parameters.
    pub params: Vec<String>,
}

impl Message {
    /// Creates a new message with no source.
    pub fn new<S: Into<String>>(
        command: impl Into<String>,
        params: impl IntoIterator<Item = S>,
    ) -> Self {
        Message {
            source: None,
            command: command.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }
    /// Sets the source of this message.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Instruction for Message {
    fn command(&self) -> &str {
        &self.command
    }
    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
    fn params(&self) -> &[String] {
        &self.params
    }
}

/// Returns the first `N` parameters of `msg`,
/// or [`ParseError::NeedMoreParams`] if there are fewer.
pub(crate) fn params<const N: usize>(msg: &impl Instruction) -> Result<[&str; N], ParseError> {
    let params = msg.params();
    if params.len() < N {
        return Err(ParseError::NeedMoreParams(msg.command().to_owned()));
    }
    Ok(std::array::from_fn(|i| params[i].as_str()))
}

/// Returns `true` if `command` is a numeric reply.
pub fn is_numeric(command: &str) -> bool {
    command.len() == 3 && command.bytes().all(|b| b.is_ascii_digit())
}
