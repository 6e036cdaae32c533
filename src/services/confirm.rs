use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::domain::{Channel, Entry};

/// Synchronous yes/no decision on whether to download an entry
pub trait Confirm {
    fn confirm(&mut self, channel: &Channel, entry: &Entry) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Channel, &Entry) -> bool,
{
    fn confirm(&mut self, channel: &Channel, entry: &Entry) -> bool {
        self(channel, entry)
    }
}

/// Accepts every entry without asking
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _channel: &Channel, _entry: &Entry) -> bool {
        true
    }
}

/// Asks the operator on a line-oriented reader/writer pair (stdin/stdout by default)
pub struct Prompt<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl Prompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    fn confirm(&mut self, channel: &Channel, entry: &Entry) -> bool {
        loop {
            if write!(
                self.output,
                "{} / {}: download \"{}\"? [y/n]: ",
                channel.author, channel.title, entry.title
            )
            .and_then(|_| self.output.flush())
            .is_err()
            {
                return false;
            }

            let mut input = String::new();
            match self.input.read_line(&mut input) {
                Ok(0) => {
                    warn!("no answer on input, treating as no");
                    return false;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "failed to read answer, treating as no");
                    return false;
                }
            }

            match input.trim().to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MediaType;

    fn channel() -> Channel {
        Channel::new(
            "https://www.youtube.com/feeds/videos.xml?playlist_id=PL1".to_string(),
            "Вацко Live".to_string(),
            "Вацко Light".to_string(),
            MediaType::Audio,
        )
    }

    fn entry() -> Entry {
        Entry::new(
            "Episode".to_string(),
            "https://www.youtube.com/watch?v=1".to_string(),
        )
    }

    #[test]
    fn test_prompt_reads_answers() {
        let mut output = Vec::new();
        let mut prompt = Prompt::new(&b"y\nN\n"[..], &mut output);

        assert!(prompt.confirm(&channel(), &entry()));
        assert!(!prompt.confirm(&channel(), &entry()));
        drop(prompt);

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("download \"Episode\"? [y/n]"));
    }

    #[test]
    fn test_prompt_repeats_until_understood() {
        let mut prompt = Prompt::new(&b"maybe\nyes\n"[..], Vec::new());
        assert!(prompt.confirm(&channel(), &entry()));
    }

    #[test]
    fn test_prompt_eof_is_no() {
        let mut prompt = Prompt::new(&b""[..], Vec::new());
        assert!(!prompt.confirm(&channel(), &entry()));
    }

    #[test]
    fn test_closure_and_assume_yes() {
        let mut answers = vec![false, true].into_iter();
        let mut closure = |_: &Channel, _: &Entry| answers.next().unwrap();

        assert!(!closure.confirm(&channel(), &entry()));
        assert!(closure.confirm(&channel(), &entry()));
        assert!(AssumeYes.confirm(&channel(), &entry()));
    }
}
