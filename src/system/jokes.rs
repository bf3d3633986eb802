/// Joke source
///
/// A small built-in collection of programmer jokes, picked at random.

use rand::seq::SliceRandom;

const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "There are 10 kinds of people: those who understand binary and those who don't.",
    "A SQL query walks into a bar, walks up to two tables and asks: can I join you?",
    "Why did the developer go broke? Because he used up all his cache.",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
    "I would tell you a UDP joke, but you might not get it.",
    "Debugging is like being the detective in a crime movie where you are also the murderer.",
    "Why do Java developers wear glasses? Because they don't C#.",
    "To understand recursion, you must first understand recursion.",
    "The best thing about a boolean is that even if you are wrong, you are only off by a bit.",
    "Knock knock. Race condition. Who's there?",
    "My code doesn't have bugs, it just develops random features.",
];

/// Anything that can tell a joke
pub trait JokeSource: Send + Sync {
    fn joke(&self) -> String;
}

/// Jokes from the built-in list
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinJokes;

impl JokeSource for BuiltinJokes {
    fn joke(&self) -> String {
        JOKES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(JOKES[0])
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joke_comes_from_list() {
        let joke = BuiltinJokes.joke();
        assert!(JOKES.contains(&joke.as_str()));
    }
}
