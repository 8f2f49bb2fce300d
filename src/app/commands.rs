//! Line-oriented command parsing for the terminal front end.
//!
//! Each input line maps to at most one [`Event`]. Parsing is purely
//! syntactic: whether a filter field exists or a page is in range is decided
//! later by the query coordinators.

use crate::app::{Event, ViewMode};
use crate::domain::{NewMovie, NewReview};
use thiserror::Error;

/// Text printed by `help`.
pub const HELP: &str = "\
view catalog|search|dashboard  switch view
set <field> <value>          edit a filter (catalog applies after a pause)
unset <field>                remove a filter
search                       apply the filters now
page <n> | next | prev       move between pages
clear                        reset filters and results
refresh                      refetch the current page
show <id> | close            open or close a movie with its reviews
add <title>|<year>|<genre>|<rating>|<director>[|<description>]
edit <id> <title>|<year>|<genre>|<rating>|<director>[|<description>]
delete <id>                  delete a movie
review <id> <author> <rating> <comment>
help | quit";

/// Why a line could not be turned into an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("{0}")]
    InvalidView(String),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns a [`CommandError`] describing the expected syntax.
///
/// # Example
///
/// ```rust
/// use moviematch::app::{parse_command, Event};
///
/// let event = parse_command("set director Nolan ").unwrap();
/// assert_eq!(
///     event,
///     Some(Event::SetFilter { field: "director".into(), value: "Nolan ".into() })
/// );
/// ```
pub fn parse_command(line: &str) -> std::result::Result<Option<Event>, CommandError> {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let args = rest.trim();

    let event = match command {
        "view" => Event::ShowView(args.parse::<ViewMode>().map_err(CommandError::InvalidView)?),
        "set" => {
            // The value keeps its whitespace: "Nolan " and "Nolan" are distinct filters.
            let (field, value) = rest.trim_start().split_once(' ').ok_or(CommandError::Usage("set <field> <value>"))?;
            Event::SetFilter { field: field.to_string(), value: value.to_string() }
        }
        "unset" if !args.is_empty() => Event::UnsetFilter { field: args.to_string() },
        "unset" => return Err(CommandError::Usage("unset <field>")),
        "search" => Event::Search,
        "page" => Event::GoToPage(number("page", args)?),
        "next" => Event::NextPage,
        "prev" => Event::PrevPage,
        "clear" => Event::Clear,
        "refresh" => Event::Refresh,
        "show" if !args.is_empty() => Event::ShowMovie { id: args.to_string() },
        "show" => return Err(CommandError::Usage("show <id>")),
        "close" => Event::CloseDetail,
        "delete" if !args.is_empty() => Event::DeleteMovie { id: args.to_string() },
        "delete" => return Err(CommandError::Usage("delete <id>")),
        "add" => Event::AddMovie(new_movie(args)?),
        "edit" => {
            let (id, fields) = args
                .split_once(' ')
                .ok_or(CommandError::Usage("edit <id> <title>|<year>|<genre>|<rating>|<director>"))?;
            Event::EditMovie { id: id.to_string(), movie: new_movie(fields.trim())? }
        }
        "review" => parse_review(args)?,
        "help" => Event::Help,
        "quit" | "exit" => Event::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(event))
}

fn number<T: std::str::FromStr>(field: &'static str, value: &str) -> std::result::Result<T, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::NotANumber { field, value: value.to_string() })
}

fn new_movie(args: &str) -> std::result::Result<NewMovie, CommandError> {
    const USAGE: &str = "add <title>|<year>|<genre>|<rating>|<director>[|<description>]";

    let parts: Vec<&str> = args.split('|').map(str::trim).collect();
    let [title, year, genre, rating, director, rest @ ..] = parts.as_slice() else {
        return Err(CommandError::Usage(USAGE));
    };
    if title.is_empty() || rest.len() > 1 {
        return Err(CommandError::Usage(USAGE));
    }
    Ok(NewMovie {
        title: (*title).to_string(),
        year: number("year", year)?,
        genre: (*genre).to_string(),
        rating: number("rating", rating)?,
        director: (*director).to_string(),
        description: rest.first().filter(|d| !d.is_empty()).map(|d| (*d).to_string()),
    })
}

fn parse_review(args: &str) -> std::result::Result<Event, CommandError> {
    const USAGE: &str = "review <id> <author> <rating> <comment>";

    let mut parts = args.splitn(4, ' ');
    let (Some(movie_id), Some(author), Some(rating), Some(comment)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(CommandError::Usage(USAGE));
    };
    Ok(Event::AddReview {
        movie_id: movie_id.to_string(),
        review: NewReview {
            author: author.to_string(),
            rating: number("rating", rating)?,
            comment: comment.trim().to_string(),
        },
    })
}
