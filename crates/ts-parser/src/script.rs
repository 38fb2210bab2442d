use ts_core::{CommandFactoryTable, Literal, SourceLocation, TickScriptError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Default,
    Whitespace,
    SingleLineComment,
    Function,
    Argument,
    ArgumentString,
    ArgumentNumber,
}

/// Parses `source` into commands built by `table`.
///
/// The first malformed construct aborts the whole parse; nothing parsed
/// before it is returned. `file` is only used to tag errors.
pub fn parse_script<T: CommandFactoryTable>(
    table: &T,
    source: &str,
    file: &str,
) -> Result<Vec<T::Command>, TickScriptError> {
    ScriptParser::new(table, source, file).run()
}

struct ScriptParser<'a, T: CommandFactoryTable> {
    table: &'a T,
    file: &'a str,
    chars: Vec<char>,
    pos: usize,
    line: usize,
    state: State,
    stack: Vec<State>,
    name: String,
    name_line: usize,
    in_args: bool,
    args: Vec<Literal>,
    output: Vec<T::Command>,
}

impl<'a, T: CommandFactoryTable> ScriptParser<'a, T> {
    fn new(table: &'a T, source: &str, file: &'a str) -> Self {
        Self {
            table,
            file,
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            state: State::Default,
            stack: Vec::new(),
            name: String::new(),
            name_line: 1,
            in_args: false,
            args: Vec::new(),
            output: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<T::Command>, TickScriptError> {
        loop {
            match self.state {
                State::Default => {
                    let Some(c) = self.peek() else {
                        break;
                    };
                    if is_separator(c) {
                        self.enter(State::Whitespace);
                    } else if c == '/' && self.peek_at(1) == Some('/') {
                        self.enter(State::SingleLineComment);
                    } else if c.is_ascii_alphabetic() {
                        self.name.clear();
                        self.args.clear();
                        self.name_line = self.line;
                        self.in_args = false;
                        self.enter(State::Function);
                    } else {
                        return Err(self.syntax_error(format!("unexpected character '{}'", c)));
                    }
                }
                State::Whitespace => {
                    while let Some(c) = self.peek() {
                        if !is_separator(c) {
                            break;
                        }
                        self.bump();
                    }
                    self.leave()?;
                }
                State::SingleLineComment => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                    self.leave()?;
                }
                State::Function => self.step_function()?,
                State::Argument => match self.peek() {
                    Some('"') => {
                        self.bump();
                        self.state = State::ArgumentString;
                    }
                    Some(c) if is_number_char(c) => self.state = State::ArgumentNumber,
                    Some(c) => {
                        return Err(self.syntax_error(format!(
                            "unexpected character '{}' at argument start in call to \"{}\"",
                            c, self.name
                        )));
                    }
                    None => return Err(self.unterminated_call()),
                },
                State::ArgumentString => {
                    let mut text = String::new();
                    loop {
                        match self.bump() {
                            Some('"') => break,
                            Some(c) => text.push(c),
                            None => {
                                return Err(self.syntax_error(format!(
                                    "unterminated string argument in call to \"{}\"",
                                    self.name
                                )));
                            }
                        }
                    }
                    self.args.push(Literal::String(text));
                    self.leave()?;
                }
                State::ArgumentNumber => {
                    let mut token = String::new();
                    while let Some(c) = self.peek() {
                        if !is_number_char(c) {
                            break;
                        }
                        token.push(c);
                        self.bump();
                    }
                    let value = self.scan_number(&token);
                    self.args.push(Literal::Number(value));
                    self.leave()?;
                }
            }
        }

        Ok(self.output)
    }

    fn step_function(&mut self) -> Result<(), TickScriptError> {
        let next = self.peek();

        if !self.in_args {
            return match next {
                Some(c) if c.is_ascii_alphabetic() => {
                    self.name.push(c);
                    self.bump();
                    Ok(())
                }
                Some('(') => {
                    self.bump();
                    self.in_args = true;
                    Ok(())
                }
                Some(c) => Err(self.syntax_error(format!(
                    "expected '(' after command name \"{}\", found '{}'",
                    self.name, c
                ))),
                None => Err(self.unterminated_call()),
            };
        }

        match next {
            Some(')') => {
                self.bump();
                self.resolve()?;
                self.leave()
            }
            Some(c) if is_separator(c) => {
                self.enter(State::Whitespace);
                Ok(())
            }
            Some(_) => {
                self.enter(State::Argument);
                Ok(())
            }
            None => Err(self.unterminated_call()),
        }
    }

    fn resolve(&mut self) -> Result<(), TickScriptError> {
        let name = std::mem::take(&mut self.name);
        let args = std::mem::take(&mut self.args);
        let location = SourceLocation::new(self.file, self.name_line);

        if !self.table.contains(&name) {
            return Err(TickScriptError::at(
                "PARSE_UNSUPPORTED_COMMAND",
                format!("unsupported command \"{}\"", name),
                location,
            ));
        }

        let command = self
            .table
            .create(&name, &args)
            .map_err(|error| error.located(location))?;
        tracing::trace!(file = self.file, line = self.name_line, command = %name, args = args.len(), "parsed call");
        self.output.push(command);
        Ok(())
    }

    /// Malformed tokens such as `1-2` or `-` become NaN instead of failing.
    fn scan_number(&self, token: &str) -> f64 {
        match token.parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    file = self.file,
                    line = self.line,
                    token,
                    "numeric literal is malformed, using NaN"
                );
                f64::NAN
            }
        }
    }

    fn enter(&mut self, next: State) {
        self.stack.push(self.state);
        self.state = next;
    }

    fn leave(&mut self) -> Result<(), TickScriptError> {
        let Some(previous) = self.stack.pop() else {
            return Err(self.syntax_error("parser state stack underflow"));
        };
        self.state = previous;
        Ok(())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn syntax_error(&self, message: impl AsRef<str>) -> TickScriptError {
        TickScriptError::at(
            "PARSE_SYNTAX",
            message,
            SourceLocation::new(self.file, self.line),
        )
    }

    fn unterminated_call(&self) -> TickScriptError {
        self.syntax_error(format!(
            "unexpected end of input in call to \"{}\"",
            self.name
        ))
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ';' || c == ','
}

fn is_number_char(c: char) -> bool {
    matches!(c, '-' | '+' | '.' | '0'..='9')
}
