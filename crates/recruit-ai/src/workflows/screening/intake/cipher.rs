//! Layered character substitution used to obfuscate the submission archive.
//!
//! This is not encryption: the tables derive from a small seed and offer no
//! confidentiality.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const LAYERS: usize = 3;

/// Digits, letters, punctuation and whitespace: the 100 printable ASCII characters.
fn printable_alphabet() -> Vec<char> {
    let mut alphabet: Vec<char> = ('0'..='9').chain('a'..='z').chain('A'..='Z').collect();
    alphabet.extend((0x21u8..=0x7e).map(char::from).filter(|c| c.is_ascii_punctuation()));
    alphabet.extend([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    alphabet
}

#[derive(Debug, Clone)]
struct Layer {
    forward: HashMap<char, char>,
    backward: HashMap<char, char>,
}

#[derive(Debug, Clone)]
pub struct SubstitutionCipher {
    layers: Vec<Layer>,
}

impl SubstitutionCipher {
    pub fn new(seed: u64) -> Self {
        let alphabet = printable_alphabet();
        let mut rng = StdRng::seed_from_u64(seed);

        let layers = (0..LAYERS)
            .map(|_| {
                let mut shuffled = alphabet.clone();
                shuffled.shuffle(&mut rng);
                Layer {
                    forward: alphabet.iter().copied().zip(shuffled.iter().copied()).collect(),
                    backward: shuffled.iter().copied().zip(alphabet.iter().copied()).collect(),
                }
            })
            .collect();

        Self { layers }
    }

    pub fn encrypt(&self, text: &str) -> String {
        self.layers
            .iter()
            .fold(text.to_string(), |current, layer| substitute(&current, &layer.forward))
    }

    pub fn decrypt(&self, text: &str) -> String {
        self.layers
            .iter()
            .rev()
            .fold(text.to_string(), |current, layer| substitute(&current, &layer.backward))
    }
}

fn substitute(text: &str, table: &HashMap<char, char>) -> String {
    text.chars()
        .map(|c| table.get(&c).copied().unwrap_or(c))
        .collect()
}
