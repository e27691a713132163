use std::io::{self, IsTerminal, Write};

/// Output sink threaded through the application.
///
/// `out` is the primary channel: the project path handed to the caller's
/// shell and the `status` listing. `err` carries notices meant for the user.
pub struct Console<O: Write, E: Write> {
    pub out: O,
    pub err: E,
    /// `out` is attached to a terminal
    pub out_is_terminal: bool,
}

impl Console<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        let out = io::stdout();
        let out_is_terminal = out.is_terminal();
        Self {
            out_is_terminal,
            ..Self::new(out, io::stderr())
        }
    }
}

impl<O: Write, E: Write> Console<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            out_is_terminal: false,
        }
    }

    /// Write a line to the primary channel
    pub fn emit(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }

    /// Write a user notice to the secondary channel
    pub fn notice(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.err, "{}", msg)
    }
}

#[cfg(test)]
pub type BufferConsole = Console<Vec<u8>, Vec<u8>>;

#[cfg(test)]
impl BufferConsole {
    pub fn buffered() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn out_text(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }

    pub fn err_text(&self) -> String {
        String::from_utf8_lossy(&self.err).into_owned()
    }
}
