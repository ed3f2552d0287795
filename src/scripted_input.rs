use log::warn;
use std::{
    collections::VecDeque,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::{
    game::{Direction, Intent},
    render::InputSource,
};

/// Intents replayed from a text script, one character per keypress.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    intents: VecDeque<Intent>,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<B: BufRead>(reader: B) -> io::Result<Self> {
        let mut intents = VecDeque::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            for key in trimmed.chars().filter(|c| !c.is_whitespace()) {
                match char_to_intent(key) {
                    Some(intent) => intents.push_back(intent),
                    None => warn!("unknown key in script: {key:?}"),
                }
            }
        }
        Ok(Self { intents })
    }

    pub fn remaining(&self) -> usize {
        self.intents.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_intent(&mut self) -> Option<Intent> {
        self.intents.pop_front()
    }
}

fn char_to_intent(c: char) -> Option<Intent> {
    match c.to_ascii_lowercase() {
        'w' | 'k' => Some(Intent::Move(Direction::Up)),
        'a' | 'h' => Some(Intent::Move(Direction::Left)),
        's' | 'j' => Some(Intent::Move(Direction::Down)),
        'd' | 'l' => Some(Intent::Move(Direction::Right)),
        'r' => Some(Intent::RegenerateLevel),
        'x' => Some(Intent::DebugGrant),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves_and_skips_comments() {
        let script = "# opening\nwasd\n\n  hjkl r\nX?\n";
        let mut input = ScriptedInput::from_reader(script.as_bytes()).unwrap();
        assert_eq!(input.remaining(), 10);
        assert_eq!(input.next_intent(), Some(Intent::Move(Direction::Up)));
        assert_eq!(input.next_intent(), Some(Intent::Move(Direction::Left)));
        for _ in 0..6 {
            input.next_intent();
        }
        assert_eq!(input.next_intent(), Some(Intent::RegenerateLevel));
        assert_eq!(input.next_intent(), Some(Intent::DebugGrant));
        assert_eq!(input.next_intent(), None);
    }
}
