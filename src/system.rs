use crate::{
    session::Outcome,
    symbol::{Function, Symbol, SymbolTable},
};

pub const HELP: &str = "\
statements:
  name = <expr>          store the value of <expr> under name
  name(x) = <expr>       define a function of one parameter
  <expr> = ?             print the value of <expr>
  <expr>                 same as above
operators: + - * / % ^ and parentheses; matrices as [[1,2];[3,4]]
commands:
  vars                   list everything defined so far
  reset                  forget everything defined so far
  help                   show this text
  q, quit, exit          leave";

/// Lines that talk to the calculator rather than compute something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Vars,
    Reset,
    Help,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "q" | "quit" | "exit" => Some(Command::Quit),
            "vars" => Some(Command::Vars),
            "reset" => Some(Command::Reset),
            "help" => Some(Command::Help),
            _ => None,
        }
    }

    pub fn run(self, table: &mut SymbolTable) -> Outcome {
        match self {
            Command::Quit => Outcome::Quit,
            Command::Vars => Outcome::Listing(listing(table)),
            Command::Reset => {
                table.clear();
                Outcome::Cleared
            }
            Command::Help => Outcome::Help,
        }
    }
}

/// One line per symbol, in name order.
pub fn listing(table: &SymbolTable) -> Vec<String> {
    table
        .iter()
        .map(|(name, symbol)| match symbol {
            Symbol::Variable(value) => format!("{name} = {value}"),
            Symbol::Function(Function {
                param,
                body,
                eager: None,
            }) => format!("{name}({param}) = {body}"),
            Symbol::Function(Function {
                param,
                body,
                eager: Some(value),
            }) => format!("{name}({param}) = {body} -> {value}"),
        })
        .collect()
}
