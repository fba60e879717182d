use std::io::{self, BufRead, Write};
use std::path::Path;

use cb_core::Letter;
use cb_engine::{EngineError, LEAVE_ACTION_ID, RenderResult, Session};
use colored::Colorize;

use crate::render;

const HELP: &str = "\
  go <address>    travel to an address (or just type the address)
  <number>        take the numbered action
  do <id>         take an action by id
  leave           leave the current location
  look            show the current page again
  letters         show circled letters
  status          show leads, letters and visits
  map             list addresses by district
  intro           read the case introduction again
  solve           end the case and read the solution
  quit            stop playing";

enum Step {
    Continue,
    Quit,
}

struct Repl {
    session: Session,
    numbered: Vec<String>,
}

pub fn run(dir: &Path, config: Option<&Path>) -> Result<(), String> {
    let book = super::load_casebook(dir)?;
    let mut repl = Repl {
        session: Session::configured(book, config).map_err(|e| e.to_string())?,
        numbered: Vec::new(),
    };

    let intro = repl.session.introduction();
    repl.show(&intro);
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match repl.execute(input) {
            Ok(Step::Continue) => {}
            Ok(Step::Quit) => break,
            Err(e) => println!("  {}\n", e.yellow()),
        }
    }

    Ok(())
}

impl Repl {
    fn show(&mut self, result: &RenderResult) {
        self.numbered = render::print_result(result);
    }

    fn execute(&mut self, input: &str) -> Result<Step, String> {
        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match command.to_lowercase().as_str() {
            "help" | "?" => println!("{HELP}\n"),
            "quit" | "q" | "exit" => return Ok(Step::Quit),
            "go" | "visit" if !rest.is_empty() => self.visit(rest)?,
            "do" if !rest.is_empty() => self.act(rest)?,
            "leave" => {
                if self.session.actions().iter().any(|a| a.id == LEAVE_ACTION_ID) {
                    self.act(LEAVE_ACTION_ID)?;
                } else {
                    let result = self.session.introduction();
                    self.show(&result);
                }
            }
            "intro" => {
                let result = self.session.introduction();
                self.show(&result);
            }
            "look" => {
                println!();
                render::print_blocks(self.session.display());
                self.numbered = render::print_actions(self.session.actions());
            }
            "letters" => self.letters(),
            "status" => self.status(),
            "map" | "list" => self.map(),
            "solve" => {
                render::print_summary(&self.session.summary());
                return Ok(Step::Quit);
            }
            _ => {
                if let Ok(n) = input.parse::<usize>() {
                    let id = n
                        .checked_sub(1)
                        .and_then(|i| self.numbered.get(i))
                        .cloned()
                        .ok_or_else(|| format!("no action numbered {n}"))?;
                    self.act(&id)?;
                } else {
                    self.visit(input)
                        .map_err(|e| format!("{e} (type 'help' for commands)"))?;
                }
            }
        }
        Ok(Step::Continue)
    }

    fn visit(&mut self, input: &str) -> Result<(), String> {
        let address = super::resolve_address(self.session.casebook(), input)?;
        let result = self.session.visit(address.as_str()).map_err(describe)?;
        self.show(&result);
        Ok(())
    }

    fn act(&mut self, id: &str) -> Result<(), String> {
        let result = self.session.act(id).map_err(describe)?;
        self.show(&result);
        Ok(())
    }

    fn owned_letters(&self) -> Vec<Letter> {
        self.session.state().letters().collect()
    }

    fn letters(&self) {
        let line = render::letter_line(&self.session.config().alphabet, &self.owned_letters());
        println!("  Letters: {line}\n");
    }

    fn status(&self) {
        let state = self.session.state();
        let here = state
            .current()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "the introduction".to_string());
        println!("  At:      {here}");
        println!("  Leads:   {}", state.leads());
        println!("  Visited: {}", state.visit_count());
        self.letters();
    }

    fn map(&self) {
        for group in self.session.directory() {
            let entries: Vec<String> = group
                .entries
                .iter()
                .map(|e| {
                    let address = e.address.as_str();
                    if e.locked {
                        format!("{} (locked)", address.dimmed())
                    } else if e.visited {
                        address.green().to_string()
                    } else {
                        address.to_string()
                    }
                })
                .collect();
            println!("  {:<6} {}", group.district.bold(), entries.join(", "));
        }
        println!();
    }
}

/// Engine errors as REPL messages. Refusals read as plain sentences.
fn describe(err: EngineError) -> String {
    if err.is_rejection() {
        err.to_string()
    } else {
        format!("error: {err}")
    }
}
