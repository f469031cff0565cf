use clap::{Parser, Subcommand};

use crate::activities::{
    command::{parse_command, Incoming},
    entities::Frequency,
};

/// One line typed into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    Request(Request),
    /// Command in its JSON wire form.
    Wire(Incoming),
    /// Line that couldn't be understood, with the reason.
    Invalid(String),
}

#[derive(Parser, Debug)]
#[command(name = "habitual", no_binary_name = true, disable_version_flag = true)]
struct RequestLine {
    #[command(subcommand)]
    request: Request,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Request {
    #[command(about = "Show today's dashboard", visible_alias = "list")]
    Today,
    #[command(about = "Show the weekly completion grid")]
    Week {
        #[arg(
            long,
            default_value_t = 0,
            allow_negative_numbers = true,
            help = "Weeks relative to the current one, -1 is last week"
        )]
        offset: i32,
        #[arg(long = "only", help = "Show only these activity ids. Can be repeated")]
        only: Vec<String>,
    },
    #[command(about = "Add a new activity")]
    Add {
        #[arg(required = true, num_args = 1.., help = "Activity name")]
        name: Vec<String>,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, value_enum, default_value_t)]
        frequency: Frequency,
    },
    #[command(about = "Delete an activity together with its completions")]
    Delete { id: String },
    #[command(about = "Record a completion, even if one already exists for that day")]
    Complete {
        id: String,
        #[arg(long, help = "Day of the completion, e.g. \"yesterday\". Defaults to today")]
        on: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    #[command(about = "Complete an activity, or undo the completion if it's already done")]
    Toggle {
        id: String,
        #[arg(long, help = "Day to toggle. Defaults to today")]
        on: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    #[command(about = "Remove a completion by its id")]
    Uncomplete { completion_id: String },
    #[command(about = "Print commands applied in this session as JSON lines")]
    History,
    #[command(about = "Print the full state as JSON")]
    State,
    #[command(about = "End the session")]
    Quit,
}

/// Returns `None` for blank lines and `#` comments.
pub fn parse_line(line: &str) -> Option<SessionInput> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    if line.starts_with('{') {
        return Some(match parse_command(line) {
            Ok(incoming) => SessionInput::Wire(incoming),
            Err(e) => SessionInput::Invalid(e.to_string()),
        });
    }

    Some(match RequestLine::try_parse_from(split_words(line)) {
        Ok(v) => SessionInput::Request(v.request),
        Err(e) => SessionInput::Invalid(e.render().to_string()),
    })
}

/// Splits on whitespace, keeping double-quoted parts together. A backslash makes the next
/// character literal, so `\"` and `\\` can be typed anywhere.
fn split_words(line: &str) -> Vec<String> {
    let mut words = vec![];
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.extend(chars.next());
                pending = true;
            }
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    words.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        words.push(current);
    }
    words
}
