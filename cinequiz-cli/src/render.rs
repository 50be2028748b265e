use cinequiz_game::{GuessOutcome, HintOutcome, Outcome, SessionView};
use colored::Colorize;
use std::io::{self, Write};

pub fn banner(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "🎬 Cinequiz: Daily Movie Quiz".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())
}

pub fn board(out: &mut impl Write, view: &SessionView) -> io::Result<()> {
    writeln!(out, "{} {}", "Date:".bold(), view.date)?;
    writeln!(out, "{} {}", "Year:".bold(), view.clues.year)?;
    writeln!(out, "{} {}", "Genres:".bold(), view.clues.genres.join(", "))?;
    if !view.revealed_cast.is_empty() {
        writeln!(
            out,
            "{} {}",
            "Revealed cast:".bold(),
            view.revealed_cast.join(", ").bright_magenta()
        )?;
    }

    let attempts = format!("{}/{}", view.attempts_remaining, view.attempt_budget);
    let attempts = if view.attempts_remaining <= 2 {
        attempts.red()
    } else {
        attempts.green()
    };
    writeln!(out, "{} {attempts}", "Attempts left:".bold())?;
    if !view.is_over() {
        writeln!(out, "{} {}", "Hints left:".bold(), view.hints_remaining)?;
    }

    if !view.guesses.is_empty() {
        writeln!(out, "{}", "Your guesses:".bold())?;
        for guess in &view.guesses {
            if guess.correct {
                writeln!(out, "  {} {}", "✓".green(), guess.text)?;
            } else {
                writeln!(out, "  {} {}", "✗".red(), guess.text)?;
            }
        }
    }

    if let Some(answer) = &view.answer {
        writeln!(out)?;
        match view.outcome {
            Outcome::Won => writeln!(
                out,
                "{} You guessed the movie: {}",
                "Congratulations!".green().bold(),
                answer.title.bold()
            )?,
            _ => writeln!(
                out,
                "{} The movie was: {}",
                "Game over.".red().bold(),
                answer.title.bold()
            )?,
        }
        writeln!(out, "{} {}", "Cast:".bold(), answer.cast.join(", "))?;
        writeln!(out, "Come back tomorrow for a new movie to guess!")?;
    }
    Ok(())
}

pub fn guess_result(out: &mut impl Write, outcome: GuessOutcome) -> io::Result<()> {
    match outcome {
        GuessOutcome::Correct => writeln!(out, "{}", "✓ Correct!".green().bold()),
        GuessOutcome::Incorrect { attempts_remaining } => writeln!(
            out,
            "{} {attempts_remaining} attempts left",
            "✗ Incorrect.".red()
        ),
        GuessOutcome::Ignored => writeln!(out, "{}", "Today's game is already over.".yellow()),
    }
}

pub fn hint_result(out: &mut impl Write, outcome: &HintOutcome) -> io::Result<()> {
    match outcome {
        HintOutcome::Revealed {
            name,
            attempts_remaining,
        } => writeln!(
            out,
            "{} {} ({attempts_remaining} attempts left)",
            "Cast member:".bold(),
            name.bright_magenta()
        ),
        HintOutcome::Ignored => writeln!(out, "{}", "No hint available.".yellow()),
    }
}

pub fn suggestions(out: &mut impl Write, titles: &[&str]) -> io::Result<()> {
    if titles.is_empty() {
        return writeln!(out, "{}", "No matching titles.".yellow());
    }
    for title in titles {
        writeln!(out, "  {title}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cinequiz_game::{Movie, Session};

    fn render(session: &Session) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        board(&mut buf, &SessionView::from_session(session)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn session() -> Session {
        Session::new(
            Movie::new("Se7en", 1995, ["Crime", "Mystery"], ["Morgan Freeman", "Brad Pitt"]),
            NaiveDate::from_ymd_opt(2025, 11, 11).unwrap(),
        )
    }

    #[test]
    fn board_shows_clues_but_not_title_mid_game() {
        let mut session = session();
        session.submit_guess("Zodiac");
        session.reveal_hint();
        let text = render(&session);
        assert!(text.contains("Year: 1995"));
        assert!(text.contains("Genres: Crime, Mystery"));
        assert!(text.contains("Revealed cast: Morgan Freeman"));
        assert!(text.contains("Attempts left: 4/6"));
        assert!(text.contains("✗ Zodiac"));
        assert!(!text.contains("Se7en"));
    }

    #[test]
    fn board_reveals_answer_when_lost() {
        let mut session = session();
        for _ in 0..6 {
            session.submit_guess("Zodiac");
        }
        let text = render(&session);
        assert!(text.contains("Game over. The movie was: Se7en"));
        assert!(text.contains("Come back tomorrow"));
    }
}
