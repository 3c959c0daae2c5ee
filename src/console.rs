//! Terminal collaborators for the command line: a stdin chooser and a
//! reporter printing notifications.

use std::fmt;
use std::io::{self, BufRead, Write};

use async_trait::async_trait;

use crate::metadata::{Choice, ChoicePrompt, Chooser};
use crate::notification::{Notification, Reporter};
use crate::torrent::ServerDescriptor;

/// Prints every notification as `[Theme] message` on stdout.
#[derive(Debug, Default, Clone)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, notification: Notification) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "[{}] {}", notification.theme, notification.message) {
            tracing::debug!(error = %e, "Could not print notification");
        }
    }
}

/// Asks on stderr and reads answers from stdin.
#[derive(Debug, Default, Clone)]
pub struct PromptChooser;

#[async_trait]
impl Chooser for PromptChooser {
    async fn choose(&self, prompt: ChoicePrompt) -> Option<Choice> {
        let asked = tokio::task::spawn_blocking(move || {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            ask(&mut input, &mut io::stderr(), &prompt)
        })
        .await;

        match asked {
            Ok(choice) => choice,
            Err(e) => {
                tracing::error!(error = %e, "Prompt task failed");
                None
            }
        }
    }
}

/// Answer to one numbered-list question.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Answer {
    Skip,
    Entry(String),
    Dismiss,
}

/// Run the label and directory questions of `prompt`.
///
/// An empty line skips a question, `q` or end of input dismisses the whole
/// prompt. Labels may also be typed in free form.
pub fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &ChoicePrompt) -> Option<Choice> {
    let mut choice = Choice::default();

    if let Some(labels) = &prompt.labels {
        match question(input, out, "Label", labels, true) {
            Answer::Skip => {}
            Answer::Entry(label) => choice.label = Some(label),
            Answer::Dismiss => return None,
        }
    }

    if let Some(directories) = &prompt.directories {
        match question(input, out, "Directory", directories, false) {
            Answer::Skip => {}
            Answer::Entry(directory) => choice.directory = Some(directory),
            Answer::Dismiss => return None,
        }
    }

    Some(choice)
}

fn question<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    title: &str,
    options: &[String],
    free_form: bool,
) -> Answer {
    if options.is_empty() && !free_form {
        return Answer::Skip;
    }

    say(out, format_args!("{}:\n", title));
    for (i, option) in options.iter().enumerate() {
        say(out, format_args!("  {}) {}\n", i + 1, option));
    }

    loop {
        say(out, format_args!("{} [number, empty to skip, q to cancel]: ", title));

        let line = match read_line(input) {
            Some(line) => line,
            None => return Answer::Dismiss,
        };
        match line.as_str() {
            "" => return Answer::Skip,
            "q" => return Answer::Dismiss,
            _ => {}
        }

        if let Some(option) = pick(&line, options) {
            return Answer::Entry(option.clone());
        }
        if free_form {
            return Answer::Entry(line);
        }
        say(out, format_args!("Not in the list: {}\n", line));
    }
}

/// Let the user pick a server. `None` on end of input or `q`.
pub fn pick_server<R: BufRead, W: Write>(input: &mut R, out: &mut W, servers: &[ServerDescriptor]) -> Option<usize> {
    say(out, format_args!("Upload to:\n"));
    for (i, server) in servers.iter().enumerate() {
        say(out, format_args!("  {}) {}\n", i + 1, server.display_name()));
    }

    loop {
        say(out, format_args!("Server [number, q to cancel]: "));

        let line = read_line(input)?;
        if line == "q" {
            return None;
        }
        match line.parse::<usize>() {
            Ok(n) if (1..=servers.len()).contains(&n) => return Some(n - 1),
            _ => say(out, format_args!("Not in the list: {}\n", line)),
        }
    }
}

/// Write and flush prompt text. A closed terminal only costs the prompt.
fn say<W: Write>(out: &mut W, args: fmt::Arguments<'_>) {
    if let Err(e) = out.write_fmt(args).and_then(|()| out.flush()) {
        tracing::debug!(error = %e, "Could not write prompt");
    }
}

/// `1`-based pick from `options`.
fn pick<'a>(line: &str, options: &'a [String]) -> Option<&'a String> {
    let n = line.parse::<usize>().ok()?;
    options.get(n.checked_sub(1)?)
}

fn read_line<R: BufRead>(input: &mut R) -> Option<String> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}
