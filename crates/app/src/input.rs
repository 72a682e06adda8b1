use tunepeek_engine::Intent;

/// One line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Help,
    Quit,
    Search(String),
    /// 1-based position in the listed results.
    PlayIndex(usize),
    Intent(Intent),
}

pub const HELP: &str = "\
commands:
  <text>        search for <text> (prefix with / to search for a command word)
  play N        play result number N
  p             play/pause
  n, b          next / previous result
  lookup ID     look a track up by catalog id
  clear         clear results
  help          show this help
  quit          exit";

pub fn parse_line(line: &str) -> Result<Input, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Empty);
    }
    if let Some(term) = line.strip_prefix('/') {
        return Ok(Input::Search(term.trim().to_string()));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match (word.to_ascii_lowercase().as_str(), rest) {
        ("q" | "quit" | "exit", "") => Ok(Input::Quit),
        ("help" | "?", "") => Ok(Input::Help),
        ("p" | "pause" | "toggle", "") => Ok(Input::Intent(Intent::PlayPause)),
        ("n" | "next", "") => Ok(Input::Intent(Intent::Next)),
        ("b" | "prev" | "previous", "") => Ok(Input::Intent(Intent::Previous)),
        ("clear", "") => Ok(Input::Intent(Intent::ClearResults)),
        ("play", arg) => match arg.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Input::PlayIndex(n)),
            _ => Err(format!("expected a result number, got {arg:?}")),
        },
        ("lookup", arg) => arg
            .parse::<i64>()
            .map(|id| Input::Intent(Intent::Lookup(id)))
            .map_err(|_| format!("expected a numeric catalog id, got {arg:?}")),
        _ => Ok(Input::Search(line.to_string())),
    }
}
