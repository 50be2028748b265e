//! Interactive prompt loop: each line is a guess unless it is a command.
use anyhow::Result;
use cinequiz_game::{KvStore, Quiz, SUGGESTION_LIMIT, suggest_titles};
use colored::Colorize;
use std::io::{BufRead, Write};

use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Guess(String),
    Hint,
    Reset,
    Suggest(String),
    Help,
    Quit,
    Blank,
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Blank;
    }
    if let Some(query) = trimmed.strip_prefix('?') {
        return Input::Suggest(query.trim().to_string());
    }
    match trimmed.to_ascii_lowercase().as_str() {
        ":hint" | ":h" => Input::Hint,
        ":reset" => Input::Reset,
        ":help" => Input::Help,
        ":quit" | ":q" | ":exit" => Input::Quit,
        _ => Input::Guess(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

fn help(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Type a movie title to guess. Commands:")?;
    writeln!(out, "  :hint    reveal a cast member (costs one attempt)")?;
    writeln!(out, "  :reset   start today's game over")?;
    writeln!(out, "  ?text    list matching titles")?;
    writeln!(out, "  :quit    leave (progress is saved)")
}

/// Drive `quiz` from `input` until the game ends, the player quits, or input closes.
pub fn run<S, R, W>(quiz: &mut Quiz<S>, input: R, out: &mut W) -> Result<()>
where
    S: KvStore,
    R: BufRead,
    W: Write,
{
    render::board(out, &quiz.view())?;
    if quiz.view().is_over() {
        return Ok(());
    }
    help(out)?;

    for line in input.lines() {
        let line = line?;
        match parse_input(&line) {
            Input::Blank => continue,
            Input::Quit => break,
            Input::Help => help(out)?,
            Input::Suggest(query) => {
                let titles = suggest_titles(quiz.catalog(), &query, SUGGESTION_LIMIT);
                render::suggestions(out, &titles)?;
                continue;
            }
            Input::Hint => {
                let outcome = quiz.reveal_hint();
                render::hint_result(out, &outcome)?;
            }
            Input::Reset => {
                if let Err(err) = quiz.reset() {
                    writeln!(out, "{}", err.to_string().red())?;
                    continue;
                }
                writeln!(out, "{}", "Started over.".yellow())?;
            }
            Input::Guess(text) => {
                let outcome = quiz.submit_guess(&text);
                render::guess_result(out, outcome)?;
            }
        }
        writeln!(out)?;
        render::board(out, &quiz.view())?;
        if quiz.view().is_over() {
            break;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cinequiz_game::{Catalog, MemoryStore, Movie, Outcome};
    use std::io::Cursor;

    fn quiz() -> Quiz<MemoryStore> {
        let catalog = Catalog::from_movies(vec![Movie::new(
            "Alien",
            1979,
            ["Horror", "Sci-Fi"],
            ["Sigourney Weaver", "Tom Skerritt"],
        )]);
        Quiz::initialize(
            MemoryStore::new(),
            catalog,
            NaiveDate::from_ymd_opt(2025, 4, 4).unwrap(),
        )
        .unwrap()
    }

    fn play(quiz: &mut Quiz<MemoryStore>, script: &str) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        run(quiz, Cursor::new(script.to_string()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_commands_and_guesses() {
        assert_eq!(parse_input("   "), Input::Blank);
        assert_eq!(parse_input(":HINT"), Input::Hint);
        assert_eq!(parse_input("?god"), Input::Suggest("god".to_string()));
        assert_eq!(parse_input(":q"), Input::Quit);
        assert_eq!(
            parse_input(" The Thing \r\n"),
            Input::Guess(" The Thing ".to_string())
        );
    }

    #[test]
    fn scripted_game_ends_on_win() {
        let mut quiz = quiz();
        let text = play(&mut quiz, "Aliens\n:hint\n?ali\nalien\nignored after win\n");
        assert_eq!(quiz.session().outcome, Outcome::Won);
        assert_eq!(quiz.session().guesses, vec!["Aliens", "alien"]);
        assert!(text.contains("Cast member: Sigourney Weaver"));
        assert!(text.contains("  Alien"));
        assert!(text.contains("Congratulations!"));
    }

    #[test]
    fn quit_keeps_progress() {
        let mut quiz = quiz();
        play(&mut quiz, "Predator\n:quit\nAlien\n");
        assert_eq!(quiz.session().outcome, Outcome::InProgress);
        assert_eq!(quiz.session().attempts_remaining, 5);
    }
}
